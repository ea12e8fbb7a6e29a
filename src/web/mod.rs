pub mod api;
pub mod state;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa_scalar::{Scalar, Servable};

use crate::web::api::{docs, greeting, upload};
use crate::web::state::AppState;

/// 构建完整路由
///
/// API 路由挂载在 `server.api_prefix` 下，`/health` 始终在根路径。
pub fn router(state: Arc<AppState>) -> Router {
    let prefix = state.config.server.api_prefix.clone();

    let api = Router::new()
        .route("/hello", get(greeting::hello_handler))
        .route("/upload", post(upload::upload_handler))
        .route("/openapi.json", get(docs::openapi_handler))
        .merge(Scalar::with_url("/docs", docs::api_doc(&prefix)))
        .layer(DefaultBodyLimit::max(state.config.upload.max_upload_bytes()));

    let app = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    app.route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
