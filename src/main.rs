use std::sync::Arc;
use tracing::info;

use filesniff::classifier::{Classifier, ContentClassifier};
use filesniff::config::Settings;
use filesniff::web::{self, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filesniff=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("[Startup] filesniff initializing...");

    let settings = Settings::new()?;
    info!(
        "[Config] Binding at {}:{} (api_prefix='{}', chunk_size={}, max_upload_mb={})",
        settings.server.host,
        settings.server.port,
        settings.server.api_prefix,
        settings.upload.chunk_size,
        settings.upload.max_upload_mb
    );

    // 识别器进程内单例
    let classifier: Arc<dyn Classifier> = Arc::new(ContentClassifier::new());
    let state = Arc::new(AppState::new(classifier, settings.clone()));
    let app = web::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[Startup] Service ready at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
