use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

pub const CODE_INTERNAL: &str = "FSN-500";
pub const CODE_BAD_REQUEST: &str = "FSN-400";
pub const CODE_PAYLOAD_TOO_LARGE: &str = "FSN-413";

pub const CODE_UPLOAD_MISSING_FILE: &str = "FSN-UPL-400";

pub fn internal_error_json(details: &str) -> Value {
    error_json(CODE_INTERNAL, "Internal error", Some(details))
}

pub fn bad_request_json(details: &str) -> Value {
    error_json(CODE_BAD_REQUEST, "Invalid request", Some(details))
}

pub fn payload_too_large_json(details: &str) -> Value {
    error_json(CODE_PAYLOAD_TOO_LARGE, "Payload too large", Some(details))
}

pub fn missing_file_json(field: &str) -> Value {
    let details = format!("multipart field '{}' is required", field);
    error_json(CODE_UPLOAD_MISSING_FILE, "File is required", Some(&details))
}

/// 统一错误信封；release 构建只暴露安全文本
pub fn error_json(code: &str, safe_message: &str, details: Option<&str>) -> Value {
    let message = if cfg!(debug_assertions) {
        details.unwrap_or(safe_message)
    } else {
        safe_message
    };
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

pub fn error_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_status_code_and_message() {
        let value = bad_request_json("boundary missing");
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], CODE_BAD_REQUEST);
        assert!(value["message"].is_string());
    }

    #[test]
    fn missing_file_names_the_field() {
        let value = missing_file_json("file");
        assert_eq!(value["code"], CODE_UPLOAD_MISSING_FILE);
        if cfg!(debug_assertions) {
            assert_eq!(value["message"], "multipart field 'file' is required");
        } else {
            assert_eq!(value["message"], "File is required");
        }
    }
}
