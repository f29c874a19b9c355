use crate::models::Receipt;
use csv::Writer;

/// 导出小票为 CSV (含表头)
pub fn export_to_csv(receipts: &[Receipt]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["id", "merchant", "total", "purchase_date"])?;

    for receipt in receipts {
        writer.write_record(&[
            receipt.id.to_string(),
            receipt.merchant.clone(),
            receipt.total.to_string(),
            receipt.purchase_date.format("%Y-%m-%d").to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}
