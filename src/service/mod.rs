pub mod defaults;
pub mod receipt_service;

pub use defaults::{resolve_defaults, UNKNOWN_MERCHANT};
pub use receipt_service::{ReceiptService, ServiceError};
