//! Document AI `process` 接口返回结构 (仅保留小票归一化需要的字段)

use serde::{Deserialize, Deserializer};

/// processDocument 响应体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// 抽取出的单个字段: 类型标签 + 原文 + 可选的归一化值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default)]
    pub mention_text: String,
    #[serde(default)]
    pub normalized_value: Option<NormalizedValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedValue {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub money_value: Option<MoneyValue>,
    #[serde(default)]
    pub date_value: Option<DateValue>,
}

/// google.type.Money: units 为 int64, JSON 中以字符串编码
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyValue {
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default, deserialize_with = "int64_from_string_or_number")]
    pub units: i64,
    #[serde(default)]
    pub nanos: i32,
}

/// google.type.Date
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

impl MoneyValue {
    /// units + nanos / 1e9
    pub fn as_f64(&self) -> f64 {
        self.units as f64 + f64::from(self.nanos) / 1e9
    }
}

fn int64_from_string_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
