use super::text::{self, TextKind};
use super::{Classification, Classifier};

/// 无法查到 MIME 时的文本兜底
const TEXT_FALLBACK_MIME: &str = "text/plain";

/// 无签名、非文本内容的标签与 MIME
pub const UNKNOWN_BINARY_LABEL: &str = "unknown";
pub const UNKNOWN_BINARY_MIME: &str = "application/octet-stream";

/// 默认识别器
///
/// 二进制格式交给 `infer` 按魔数判断；没有命中时再按文本嗅探细分。
/// 两者都不认识的非空内容归为 `unknown` / `application/octet-stream`，
/// 只有空输入返回 `None`。
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentClassifier;

impl ContentClassifier {
    pub fn new() -> Self {
        Self
    }

    fn classify_text(kind: TextKind) -> Classification {
        let mime = mime_guess::from_ext(kind.extension())
            .first_raw()
            .unwrap_or(TEXT_FALLBACK_MIME);
        Classification::new(kind.label(), mime)
    }
}

impl Classifier for ContentClassifier {
    fn identify(&self, bytes: &[u8]) -> Option<Classification> {
        if bytes.is_empty() {
            return None;
        }

        if let Some(kind) = infer::get(bytes) {
            return Some(Classification::new(kind.extension(), kind.mime_type()));
        }

        let classification = match text::sniff(bytes) {
            Some(kind) => Self::classify_text(kind),
            None => Classification::new(UNKNOWN_BINARY_LABEL, UNKNOWN_BINARY_MIME),
        };
        Some(classification)
    }
}
