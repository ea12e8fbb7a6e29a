mod content;
mod text;

pub use content::{ContentClassifier, UNKNOWN_BINARY_LABEL, UNKNOWN_BINARY_MIME};

use serde::Serialize;
use std::fmt;

/// 一次识别的结果：类型标签 + MIME
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: String,
    pub mime_type: String,
}

impl Classification {
    pub fn new(label: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File Type is {} with Mime Type {}",
            self.label, self.mime_type
        )
    }
}

/// 内容识别器
///
/// 职责：对一段字节给出尽力而为的类型判断。
/// 实现必须是纯函数（同样输入同样输出），且对任意输入不得 panic；
/// 无法判断时返回 `None`。实例在进程内共享，跨请求并发调用。
pub trait Classifier: Send + Sync {
    fn identify(&self, bytes: &[u8]) -> Option<Classification>;
}
