use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use utoipa::ToSchema;

use crate::classifier::{Classification, Classifier};

/// 未识别时返回的类型文本
pub const UNKNOWN_FILE_TYPE: &str = "Unknown";

/// 单次请求上传的文件
///
/// 由 HTTP 层在请求内构造，只被识别流程消费一次。
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 按固定大小切块，最后一块可能更短；空文件不产生任何块
    pub fn chunks(&self, chunk_size: NonZeroUsize) -> std::slice::Chunks<'_, u8> {
        self.data.chunks(chunk_size.get())
    }
}

/// 识别流程的内部结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub classification: Option<Classification>,
    /// 实际送入识别器的块数
    pub chunks_classified: usize,
    pub size: u64,
}

impl Detection {
    pub fn is_detected(&self) -> bool {
        self.classification.is_some()
    }

    /// 映射为对外响应；未识别时 Size 固定为 0
    pub fn into_payload(self) -> UploadResponse {
        match self.classification {
            Some(classification) => UploadResponse {
                detected_file_type: classification.to_string(),
                size: self.size,
            },
            None => UploadResponse::unknown(),
        }
    }
}

/// `/upload` 的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[serde(rename = "Detected File Type")]
    #[schema(example = "File Type is txt with Mime Type text/plain")]
    pub detected_file_type: String,
    #[serde(rename = "Size")]
    pub size: u64,
}

impl UploadResponse {
    pub fn unknown() -> Self {
        Self {
            detected_file_type: UNKNOWN_FILE_TYPE.to_string(),
            size: 0,
        }
    }
}

/// 分块识别
///
/// 按顺序逐块调用识别器，第一块有结果即停止，后续块不再识别。
pub fn detect<C>(classifier: &C, file: &UploadedFile, chunk_size: NonZeroUsize) -> Detection
where
    C: Classifier + ?Sized,
{
    let mut chunks_classified = 0;
    for chunk in file.chunks(chunk_size) {
        chunks_classified += 1;
        if let Some(classification) = classifier.identify(chunk) {
            return Detection {
                classification: Some(classification),
                chunks_classified,
                size: file.len(),
            };
        }
    }

    Detection {
        classification: None,
        chunks_classified,
        size: file.len(),
    }
}
