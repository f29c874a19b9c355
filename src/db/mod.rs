pub mod export;
pub mod pool;
pub mod store;

pub use export::export_to_csv;
pub use pool::{connect_options, create_pool, ensure_schema};
pub use store::{ReceiptStore, StoreError};
