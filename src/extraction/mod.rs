//! 小票字段抽取: 外部 Document AI 调用 + 实体归一化

pub mod document_ai;
pub mod normalize;

use crate::models::Document;
use futures::future::BoxFuture;

pub use document_ai::DocumentAiClient;
pub use normalize::{normalize_document, normalize_entities};

/// 上传的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("upload")
    }
}

/// 文档抽取接口, 便于在测试中替换外部服务
pub trait DocumentExtractor: Send + Sync {
    /// 返回 None 表示响应中没有 document
    fn extract<'a>(
        &'a self,
        content: &'a [u8],
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>, ExtractionError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("document AI request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("document AI returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("failed to obtain access token: {0}")]
    Auth(String),
}
