use super::defaults::resolve_defaults;
use crate::db::{export_to_csv, ReceiptStore, StoreError};
use crate::extraction::{normalize_document, DocumentExtractor, ExtractionError, UploadedFile};
use crate::models::{Receipt, ReceiptUpdate};
use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("no files uploaded")]
    NoFiles,
    #[error("extraction failed for {file}: {source}")]
    Extraction {
        file: String,
        #[source]
        source: ExtractionError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
}

/// 小票服务: 抽取 -> 归一化 -> 补默认值 -> 入库
pub struct ReceiptService {
    store: ReceiptStore,
    extractor: Arc<dyn DocumentExtractor>,
}

impl ReceiptService {
    pub fn new(store: ReceiptStore, extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self { store, extractor }
    }

    /// 处理一批上传文件
    ///
    /// 先抽取全部文件, 任一文件失败则整批失败 (不返回部分结果);
    /// 没有 document 或实体的文件不产生记录. 返回顺序与上传顺序一致.
    pub async fn read_receipts(&self, files: &[UploadedFile]) -> Result<Vec<Receipt>, ServiceError> {
        if files.is_empty() {
            return Err(ServiceError::NoFiles);
        }

        // 1. 并发抽取
        let documents = try_join_all(files.iter().map(|file| async move {
            self.extractor
                .extract(&file.bytes, &file.mime_type)
                .await
                .map_err(|source| ServiceError::Extraction {
                    file: file.display_name().to_string(),
                    source,
                })
        }))
        .await?;

        // 2. 归一化并入库
        let today = Utc::now().date_naive();
        let mut saved = Vec::with_capacity(files.len());
        for (file, document) in files.iter().zip(documents) {
            let Some(extracted) = normalize_document(document) else {
                tracing::debug!("{} has no document entities, skipping", file.display_name());
                continue;
            };

            let receipt = resolve_defaults(extracted, today);
            let row = self
                .store
                .insert(&receipt.merchant, &receipt.total, receipt.purchase_date)
                .await?;
            tracing::info!("Receipt {} saved from {}", row.id, file.display_name());
            saved.push(row);
        }

        Ok(saved)
    }

    pub async fn list_all(&self) -> Result<Vec<Receipt>, ServiceError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn list_by_month(&self, month: u32, year: i32) -> Result<Vec<Receipt>, ServiceError> {
        Ok(self.store.list_by_month(month, year).await?)
    }

    pub async fn update(
        &self,
        id: i64,
        update: &ReceiptUpdate,
    ) -> Result<Option<Receipt>, ServiceError> {
        Ok(self.store.update(id, update).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Receipt>, ServiceError> {
        Ok(self.store.delete(id).await?)
    }

    /// 导出某月小票为 CSV
    pub async fn export_month_csv(&self, month: u32, year: i32) -> Result<Vec<u8>, ServiceError> {
        let receipts = self.store.list_by_month(month, year).await?;
        Ok(export_to_csv(&receipts)?)
    }
}
