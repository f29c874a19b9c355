pub mod document;
pub mod extracted;
pub mod receipt;

pub use document::{DateValue, Document, Entity, MoneyValue, NormalizedValue, ProcessResponse};
pub use extracted::{ExtractedReceipt, ExtractedTotal};
pub use receipt::{NewReceipt, Receipt, ReceiptUpdate};
