pub mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::*;

use crate::service::ReceiptService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 上传大小上限 20 MiB
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// 构建路由
pub fn router(service: Arc<ReceiptService>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/readReceipt", post(read_receipt))
        .route("/receipts", get(list_receipts))
        .route("/receipts/:month/:year", get(list_receipts_by_month))
        .route("/receipts/:month/:year/export", get(export_receipts_by_month))
        .route("/receipt/:id", put(update_receipt).delete(delete_receipt))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(service)
}
