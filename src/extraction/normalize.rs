use crate::models::{Document, Entity, ExtractedReceipt, ExtractedTotal};

pub const SUPPLIER_NAME: &str = "supplier_name";
pub const TOTAL_AMOUNT: &str = "total_amount";
pub const RECEIPT_DATE: &str = "receipt_date";

/// 将 Document AI 实体映射为扁平的小票记录
///
/// 每种实体只写自己对应的字段; 同类型实体出现多次时后者覆盖前者,
/// 未识别的类型直接忽略.
pub fn normalize_entities(entities: &[Entity]) -> ExtractedReceipt {
    let mut receipt = ExtractedReceipt::default();

    for entity in entities {
        let normalized = entity.normalized_value.as_ref();
        match entity.entity_type.as_str() {
            SUPPLIER_NAME => {
                let merchant = normalized
                    .and_then(|v| v.text.as_deref())
                    .filter(|text| !text.is_empty())
                    .unwrap_or(entity.mention_text.as_str());
                receipt.merchant = Some(merchant.to_string());
            }
            TOTAL_AMOUNT => {
                receipt.total = Some(match normalized.and_then(|v| v.money_value.as_ref()) {
                    Some(money) => ExtractedTotal::Amount(money.as_f64()),
                    None => ExtractedTotal::Raw(entity.mention_text.clone()),
                });
            }
            RECEIPT_DATE => {
                receipt.date = Some(match normalized.and_then(|v| v.date_value.as_ref()) {
                    Some(d) => format!("{}-{}-{}", d.year, d.month, d.day),
                    None => entity.mention_text.clone(),
                });
            }
            _ => {}
        }
    }

    receipt
}

/// 没有 document 或没有实体时返回 None (该文件不产生记录)
pub fn normalize_document(document: Option<Document>) -> Option<ExtractedReceipt> {
    let document = document?;
    if document.entities.is_empty() {
        return None;
    }
    Some(normalize_entities(&document.entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateValue, MoneyValue, NormalizedValue};

    fn entity(entity_type: &str, mention: &str, value: Option<NormalizedValue>) -> Entity {
        Entity {
            entity_type: entity_type.to_string(),
            mention_text: mention.to_string(),
            normalized_value: value,
        }
    }

    fn money(units: i64, nanos: i32) -> Option<NormalizedValue> {
        Some(NormalizedValue {
            money_value: Some(MoneyValue {
                currency_code: Some("USD".into()),
                units,
                nanos,
            }),
            ..Default::default()
        })
    }

    #[test]
    fn money_value_becomes_units_plus_nanos() {
        let entities = [entity(TOTAL_AMOUNT, "$10.50", money(10, 500_000_000))];
        let receipt = normalize_entities(&entities);
        assert_eq!(receipt.total, Some(ExtractedTotal::Amount(10.5)));
        assert_eq!(receipt.merchant, None);
        assert_eq!(receipt.date, None);
    }

    #[test]
    fn money_property_holds_for_assorted_values() {
        for (units, nanos) in [(0, 0), (3, 990_000_000), (1234, 50_000_000), (-5, -250_000_000)] {
            let receipt = normalize_entities(&[entity(TOTAL_AMOUNT, "x", money(units, nanos))]);
            let expected = units as f64 + nanos as f64 / 1e9;
            assert_eq!(receipt.total, Some(ExtractedTotal::Amount(expected)));
        }
    }

    #[test]
    fn mention_text_used_verbatim_without_normalized_value() {
        let entities = [
            entity(SUPPLIER_NAME, "  Joe's Diner ", None),
            entity(TOTAL_AMOUNT, "$1,204.99", None),
            entity(RECEIPT_DATE, "03/01/24", None),
        ];
        let receipt = normalize_entities(&entities);
        assert_eq!(receipt.merchant.as_deref(), Some("  Joe's Diner "));
        assert_eq!(receipt.total, Some(ExtractedTotal::Raw("$1,204.99".into())));
        assert_eq!(receipt.date.as_deref(), Some("03/01/24"));
    }

    #[test]
    fn supplier_prefers_normalized_text() {
        let value = Some(NormalizedValue {
            text: Some("Acme Corp".into()),
            ..Default::default()
        });
        let receipt = normalize_entities(&[entity(SUPPLIER_NAME, "ACME CORP #12", value)]);
        assert_eq!(receipt.merchant.as_deref(), Some("Acme Corp"));

        let empty = Some(NormalizedValue {
            text: Some(String::new()),
            ..Default::default()
        });
        let receipt = normalize_entities(&[entity(SUPPLIER_NAME, "ACME CORP #12", empty)]);
        assert_eq!(receipt.merchant.as_deref(), Some("ACME CORP #12"));
    }

    #[test]
    fn date_value_is_formatted_without_padding() {
        let value = Some(NormalizedValue {
            date_value: Some(DateValue { year: 2024, month: 3, day: 1 }),
            ..Default::default()
        });
        let receipt = normalize_entities(&[entity(RECEIPT_DATE, "Mar 1, 2024", value)]);
        assert_eq!(receipt.date.as_deref(), Some("2024-3-1"));
    }

    #[test]
    fn total_amount_does_not_touch_date() {
        let entities = [
            entity(RECEIPT_DATE, "2024-03-01", None),
            entity(TOTAL_AMOUNT, "$4.00", money(4, 0)),
        ];
        let receipt = normalize_entities(&entities);
        assert_eq!(receipt.date.as_deref(), Some("2024-03-01"));
        assert_eq!(receipt.total, Some(ExtractedTotal::Amount(4.0)));
    }

    #[test]
    fn unknown_types_are_ignored_and_later_entities_win() {
        let entities = [
            entity("net_amount", "$9.00", money(9, 0)),
            entity("line_item", "coffee", None),
            entity(SUPPLIER_NAME, "First", None),
            entity(SUPPLIER_NAME, "Second", None),
        ];
        let receipt = normalize_entities(&entities);
        assert_eq!(receipt.total, None);
        assert_eq!(receipt.merchant.as_deref(), Some("Second"));
    }

    #[test]
    fn documents_without_entities_yield_nothing() {
        assert!(normalize_document(None).is_none());
        assert!(normalize_document(Some(Document::default())).is_none());

        let document = Document {
            entities: vec![entity("line_item", "coffee", None)],
        };
        assert_eq!(normalize_document(Some(document)), Some(ExtractedReceipt::default()));
    }
}
