use axum::Json;

pub const GREETING: &str = "Hello world";

/// 问候接口，兼作存活探针
#[utoipa::path(
    get,
    path = "/hello",
    tag = "meta",
    responses((status = 200, description = "Greeting", body = String))
)]
pub async fn hello_handler() -> Json<&'static str> {
    Json(GREETING)
}
