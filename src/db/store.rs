use crate::models::{Receipt, ReceiptUpdate};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no fields to update")]
    NoFieldsToUpdate,
    #[error("invalid month {month}/{year}")]
    InvalidMonth { month: u32, year: i32 },
}

/// receipts 表的参数化 CRUD
///
/// 不使用事务, 也没有并发控制: 同一 id 的并发更新以最后一次写入为准.
/// id 与 total 统一 cast, 兼容 SERIAL/整型金额的旧表.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    pool: PgPool,
}

impl ReceiptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 关闭连接池 (停机时调用)
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// 插入一条小票, 返回含 id 的完整行
    pub async fn insert(
        &self,
        merchant: &str,
        total: &BigDecimal,
        purchase_date: NaiveDate,
    ) -> Result<Receipt, StoreError> {
        tracing::debug!("Insert receipt values: [{}, {}, {}]", merchant, total, purchase_date);

        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            INSERT INTO receipts (merchant, total, purchase_date)
            VALUES ($1, $2, $3)
            RETURNING id::BIGINT AS id, merchant, total::NUMERIC AS total, purchase_date
            "#
        )
        .bind(merchant)
        .bind(total)
        .bind(purchase_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// 全部小票 (id 降序, 最新在前)
    pub async fn list_all(&self) -> Result<Vec<Receipt>, StoreError> {
        let receipts = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id::BIGINT AS id, merchant, total::NUMERIC AS total, purchase_date
            FROM receipts
            ORDER BY id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    /// 指定年月的小票 (按日期升序)
    pub async fn list_by_month(&self, month: u32, year: i32) -> Result<Vec<Receipt>, StoreError> {
        let (start, end) = month_range(month, year).ok_or(StoreError::InvalidMonth { month, year })?;

        let receipts = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id::BIGINT AS id, merchant, total::NUMERIC AS total, purchase_date
            FROM receipts
            WHERE purchase_date >= $1
              AND purchase_date < $2
            ORDER BY purchase_date ASC, id ASC
            "#
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    /// 删除小票; 不存在时返回 None
    pub async fn delete(&self, id: i64) -> Result<Option<Receipt>, StoreError> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            DELETE FROM receipts
            WHERE id = $1
            RETURNING id::BIGINT AS id, merchant, total::NUMERIC AS total, purchase_date
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// 只更新传入的字段; 不存在时返回 None
    pub async fn update(
        &self,
        id: i64,
        update: &ReceiptUpdate,
    ) -> Result<Option<Receipt>, StoreError> {
        let mut query_builder = update_query(id, update)?;
        let receipt = query_builder
            .build_query_as::<Receipt>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(receipt)
    }
}

/// [月初, 下月初)
fn month_range(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// 构建 UPDATE 语句, 仅包含有值的字段
fn update_query(id: i64, update: &ReceiptUpdate) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    if update.is_empty() {
        return Err(StoreError::NoFieldsToUpdate);
    }

    let mut query_builder = QueryBuilder::<Postgres>::new("UPDATE receipts SET ");
    {
        let mut fields = query_builder.separated(", ");
        if let Some(merchant) = &update.merchant {
            fields.push("merchant = ").push_bind_unseparated(merchant.clone());
        }
        if let Some(total) = &update.total {
            fields.push("total = ").push_bind_unseparated(total.clone());
        }
        if let Some(purchase_date) = update.purchase_date {
            fields.push("purchase_date = ").push_bind_unseparated(purchase_date);
        }
    }
    query_builder
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING id::BIGINT AS id, merchant, total::NUMERIC AS total, purchase_date");

    Ok(query_builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn month_range_is_half_open() {
        let (start, end) = month_range(3, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

        let (start, end) = month_range(12, 2023).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn month_range_rejects_out_of_range_months() {
        assert!(month_range(0, 2024).is_none());
        assert!(month_range(13, 2024).is_none());
    }

    #[test]
    fn update_sets_only_supplied_fields() {
        let update = ReceiptUpdate {
            total: Some(BigDecimal::from_str("9.99").unwrap()),
            ..Default::default()
        };
        let query_builder = update_query(42, &update).unwrap();
        assert_eq!(
            query_builder.sql(),
            "UPDATE receipts SET total = $1 WHERE id = $2 RETURNING id::BIGINT AS id, merchant, total::NUMERIC AS total, purchase_date"
        );
    }

    #[test]
    fn update_with_all_fields_numbers_binds_in_order() {
        let update = ReceiptUpdate {
            merchant: Some("Acme".into()),
            total: Some(BigDecimal::from(1)),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 2),
        };
        let query_builder = update_query(1, &update).unwrap();
        assert!(query_builder
            .sql()
            .starts_with("UPDATE receipts SET merchant = $1, total = $2, purchase_date = $3 WHERE id = $4"));
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(
            update_query(1, &ReceiptUpdate::default()),
            Err(StoreError::NoFieldsToUpdate)
        ));
    }
}
