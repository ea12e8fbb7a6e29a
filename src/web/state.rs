use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::Settings;

/// Web 应用全局状态
///
/// 职责：持有跨请求共享的只读对象，通过 Arc 注入到 Axum 的 Handler 中。
/// 识别器在启动时构造一次，所有请求复用同一实例。
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub config: Settings,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>, config: Settings) -> Self {
        Self { classifier, config }
    }
}
