pub mod api;
pub mod config;
pub mod db;
pub mod extraction;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{create_pool, ensure_schema, ReceiptStore};
pub use extraction::{DocumentAiClient, DocumentExtractor};
pub use service::ReceiptService;
