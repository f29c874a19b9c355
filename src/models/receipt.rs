use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 小票表 (receipts)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i64,
    pub merchant: String,
    pub total: BigDecimal,
    pub purchase_date: NaiveDate,
}

/// 待插入的小票 (默认值已补齐)
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub merchant: String,
    pub total: BigDecimal,
    pub purchase_date: NaiveDate,
}

/// 部分更新: 缺省或 null 的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptUpdate {
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub total: Option<BigDecimal>,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
}

impl ReceiptUpdate {
    pub fn is_empty(&self) -> bool {
        self.merchant.is_none() && self.total.is_none() && self.purchase_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn receipt_serializes_date_as_iso_day() {
        let receipt = Receipt {
            id: 7,
            merchant: "Acme".into(),
            total: BigDecimal::from_str("12.5").unwrap(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["merchant"], "Acme");
        assert_eq!(json["purchase_date"], "2024-03-01");
    }

    #[test]
    fn update_treats_null_and_missing_alike() {
        let update: ReceiptUpdate =
            serde_json::from_str(r#"{"merchant": null, "total": 3.25}"#).unwrap();
        assert!(update.merchant.is_none());
        assert_eq!(update.total, Some(BigDecimal::from_str("3.25").unwrap()));
        assert!(update.purchase_date.is_none());
        assert!(!update.is_empty());

        let empty: ReceiptUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
