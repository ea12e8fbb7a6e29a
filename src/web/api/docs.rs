use axum::{extract::State, Json};
use std::sync::Arc;
use utoipa::openapi::{server::Server, OpenApi as OpenApiDoc};
use utoipa::OpenApi;

use crate::detection::UploadResponse;
use crate::web::api::{greeting, upload};
use crate::web::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "filesniff", description = "Content-based file type detection"),
    paths(greeting::hello_handler, upload::upload_handler),
    components(schemas(UploadResponse, upload::UploadForm)),
    tags(
        (name = "meta", description = "Service liveness"),
        (name = "detection", description = "File type detection")
    )
)]
pub struct ApiDoc;

/// 生成 OpenAPI 文档，服务地址指向实际挂载前缀
///
/// 同时供 `/openapi.json` 与 Scalar 文档页使用。
pub fn api_doc(api_prefix: &str) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi();
    let base = if api_prefix.is_empty() { "/" } else { api_prefix };
    doc.servers = Some(vec![Server::new(base)]);
    doc
}

pub async fn openapi_handler(State(state): State<Arc<AppState>>) -> Json<OpenApiDoc> {
    Json(api_doc(&state.config.server.api_prefix))
}

#[cfg(test)]
mod tests {
    use super::api_doc;

    #[test]
    fn documents_both_routes() {
        let doc = api_doc("/api");
        assert!(doc.paths.paths.contains_key("/hello"));
        assert!(doc.paths.paths.contains_key("/upload"));
        let servers = doc.servers.expect("servers");
        assert_eq!(servers[0].url, "/api");
    }
}
