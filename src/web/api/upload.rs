use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::BytesMut;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::detection::{detect, UploadResponse, UploadedFile};
use crate::web::state::AppState;
use crate::web::utils::errors::{
    bad_request_json, error_response, internal_error_json, missing_file_json,
    payload_too_large_json,
};

/// 上传文件所在的 multipart 字段名
pub const FILE_FIELD: &str = "file";

/// multipart 表单结构（仅用于 OpenAPI 文档）
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid multipart body: {0}")]
    InvalidMultipart(String),
    #[error("upload exceeds the configured limit: {0}")]
    TooLarge(String),
    #[error("multipart field '{0}' is missing")]
    MissingFile(&'static str),
    #[error("classification task failed: {0}")]
    Task(String),
}

impl From<MultipartRejection> for UploadError {
    fn from(rejection: MultipartRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge(rejection.body_text())
        } else {
            UploadError::InvalidMultipart(rejection.body_text())
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge(err.body_text())
        } else {
            UploadError::InvalidMultipart(err.body_text())
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        tracing::warn!("[Upload] Rejected: {}", self);
        match self {
            UploadError::InvalidMultipart(details) => {
                error_response(StatusCode::BAD_REQUEST, bad_request_json(&details))
            }
            UploadError::TooLarge(details) => error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                payload_too_large_json(&details),
            ),
            UploadError::MissingFile(field) => {
                error_response(StatusCode::BAD_REQUEST, missing_file_json(field))
            }
            UploadError::Task(details) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_error_json(&details),
            ),
        }
    }
}

/// 文件类型识别接口
///
/// 读取 `file` 字段，按配置的块大小逐块识别，第一块有结果即返回。
#[utoipa::path(
    post,
    path = "/upload",
    tag = "detection",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Detection result", body = UploadResponse),
        (status = 400, description = "Malformed multipart body or missing file field"),
        (status = 413, description = "Upload exceeds the configured limit")
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut multipart = multipart?;
    let file = read_file_field(&mut multipart).await?;

    let file_name = file.file_name.clone().unwrap_or_else(|| "-".to_string());
    let declared_type = file.content_type.clone().unwrap_or_else(|| "-".to_string());
    let classifier = state.classifier.clone();
    let chunk_size = state.config.upload.chunk_size();

    // 识别属于 CPU 密集操作，放到阻塞线程
    let detection =
        tokio::task::spawn_blocking(move || detect(classifier.as_ref(), &file, chunk_size))
            .await
            .map_err(|e| UploadError::Task(e.to_string()))?;

    tracing::info!(
        "[Upload] name={} declared_type={} size={} chunks_classified={} detected={}",
        file_name,
        declared_type,
        detection.size,
        detection.chunks_classified,
        detection
            .classification
            .as_ref()
            .map(|c| c.label.as_str())
            .unwrap_or("none")
    );

    Ok(Json(detection.into_payload()))
}

/// 找到 `file` 字段并读入内存，其余字段直接跳过
async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            data.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile {
            file_name,
            content_type,
            data: data.freeze(),
        });
    }

    Err(UploadError::MissingFile(FILE_FIELD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};

    const BOUNDARY: &str = "upload-unit-boundary";

    fn multipart_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn reads_file_field_with_declared_metadata() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nskip me\r\n\
--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
Content-Type: text/plain\r\n\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let mut multipart = Multipart::from_request(multipart_request(body), &())
            .await
            .expect("multipart");

        let file = read_file_field(&mut multipart).await.expect("file");
        assert_eq!(file.file_name.as_deref(), Some("notes.txt"));
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(file.data.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn missing_file_field_is_reported() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nonly text\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let mut multipart = Multipart::from_request(multipart_request(body), &())
            .await
            .expect("multipart");

        let err = read_file_field(&mut multipart).await.expect_err("missing");
        assert!(matches!(err, UploadError::MissingFile(FILE_FIELD)));
    }
}
