use super::{DocumentExtractor, ExtractionError};
use crate::config::DocumentAiConfig;
use crate::models::{Document, ProcessResponse};
use base64::Engine as _;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// 只需要实体列表
const FIELD_MASK: &str = "entities";

/// 访问令牌来源
enum TokenSource {
    /// DOCUMENTAI_ACCESS_TOKEN (例如 `gcloud auth print-access-token`)
    Static(String),
    /// Cloud Run / GCE 的 metadata server
    Metadata,
}

/// Document AI REST 客户端 (processors/*:process)
pub struct DocumentAiClient {
    http: reqwest::Client,
    process_url: String,
    token: TokenSource,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    raw_document: RawDocument<'a>,
    field_mask: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl DocumentAiClient {
    pub fn new(config: &DocumentAiConfig) -> Result<Self, ExtractionError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let token = match &config.access_token {
            Some(token) => TokenSource::Static(token.clone()),
            None => TokenSource::Metadata,
        };

        Ok(Self {
            http,
            process_url: format!("{}/v1/{}:process", config.base_url(), config.processor_path()),
            token,
        })
    }

    pub fn process_url(&self) -> &str {
        &self.process_url
    }

    async fn access_token(&self) -> Result<String, ExtractionError> {
        match &self.token {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Metadata => {
                let response = self
                    .http
                    .get(METADATA_TOKEN_URL)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| ExtractionError::Auth(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(ExtractionError::Auth(format!(
                        "metadata server returned {}",
                        response.status()
                    )));
                }

                let token: MetadataToken = response
                    .json()
                    .await
                    .map_err(|e| ExtractionError::Auth(e.to_string()))?;
                Ok(token.access_token)
            }
        }
    }

    /// 调用 processDocument
    pub async fn process(
        &self,
        content: &[u8],
        mime_type: &str,
    ) -> Result<Option<Document>, ExtractionError> {
        let token = self.access_token().await?;
        let request = ProcessRequest {
            raw_document: RawDocument {
                content: base64::engine::general_purpose::STANDARD.encode(content),
                mime_type,
            },
            field_mask: FIELD_MASK,
        };

        tracing::debug!("Sending {} bytes ({}) to Document AI", content.len(), mime_type);
        let start_time = std::time::Instant::now();

        let response = self
            .http
            .post(&self.process_url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Upstream { status, body });
        }

        let body: ProcessResponse = response.json().await?;
        tracing::debug!("Document AI responded in {:?}", start_time.elapsed());
        Ok(body.document)
    }
}

impl DocumentExtractor for DocumentAiClient {
    fn extract<'a>(
        &'a self,
        content: &'a [u8],
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>, ExtractionError>> {
        Box::pin(self.process(content, mime_type))
    }
}
