use super::error::ApiError;
use crate::extraction::UploadedFile;
use crate::models::{Receipt, ReceiptUpdate};
use crate::service::ReceiptService;
use axum::{
    extract::{Json, Multipart, Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

/// multipart 中的文件字段名
const FILES_FIELD: &str = "files";

/// 健康检查
pub async fn health_check() -> &'static str {
    "Online"
}

/// 上传小票并识别入库
pub async fn read_receipt(
    State(service): State<Arc<ReceiptService>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await?;

        files.push(UploadedFile {
            file_name,
            mime_type,
            bytes: bytes.to_vec(),
        });
    }

    tracing::info!("Received {} file(s) for extraction", files.len());

    let receipts = service
        .read_receipts(&files)
        .await
        .map_err(|e| ApiError::from_service("Error processing document.", e))?;
    Ok(Json(receipts))
}

/// 全部小票
pub async fn list_receipts(
    State(service): State<Arc<ReceiptService>>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    let receipts = service
        .list_all()
        .await
        .map_err(|e| ApiError::from_service("Error fetching receipts.", e))?;
    Ok(Json(receipts))
}

/// 指定年月的小票
pub async fn list_receipts_by_month(
    State(service): State<Arc<ReceiptService>>,
    Path((month, year)): Path<(u32, i32)>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    let receipts = service
        .list_by_month(month, year)
        .await
        .map_err(|e| ApiError::from_service("Error fetching receipts by month.", e))?;
    Ok(Json(receipts))
}

/// 导出指定年月的小票 (CSV)
pub async fn export_receipts_by_month(
    State(service): State<Arc<ReceiptService>>,
    Path((month, year)): Path<(u32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = service
        .export_month_csv(month, year)
        .await
        .map_err(|e| ApiError::from_service("Error exporting receipts.", e))?;
    let disposition = format!("attachment; filename=\"receipts-{year}-{month:02}.csv\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// 删除小票
pub async fn delete_receipt(
    State(service): State<Arc<ReceiptService>>,
    Path(id): Path<i64>,
) -> Result<Json<Receipt>, ApiError> {
    let deleted = service
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service("Error deleting receipt.", e))?;
    match deleted {
        Some(receipt) => {
            tracing::info!("Receipt {} deleted", id);
            Ok(Json(receipt))
        }
        None => Err(ApiError::NotFound("Receipt not found.".into())),
    }
}

/// 部分更新小票
pub async fn update_receipt(
    State(service): State<Arc<ReceiptService>>,
    Path(id): Path<i64>,
    Json(update): Json<ReceiptUpdate>,
) -> Result<Json<Receipt>, ApiError> {
    let updated = service
        .update(id, &update)
        .await
        .map_err(|e| ApiError::from_service("Error updating receipt.", e))?;
    updated
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Receipt not found.".into()))
}
