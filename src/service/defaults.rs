use crate::models::{ExtractedReceipt, ExtractedTotal, NewReceipt};
use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// 原文日期可能出现的格式, 依次尝试
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// 为未识别的字段补默认值: 商户 "Unknown Merchant", 金额 0, 日期 today
pub fn resolve_defaults(extracted: ExtractedReceipt, today: NaiveDate) -> NewReceipt {
    let merchant = extracted
        .merchant
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string());

    let total = match extracted.total {
        Some(ExtractedTotal::Amount(value)) => amount_from_f64(value).unwrap_or_else(|| {
            tracing::warn!("Non-finite total {}, using 0", value);
            BigDecimal::zero()
        }),
        Some(ExtractedTotal::Raw(raw)) => parse_amount(&raw).unwrap_or_else(|| {
            tracing::warn!("Unparseable total {:?}, using 0", raw);
            BigDecimal::zero()
        }),
        None => BigDecimal::zero(),
    };

    let purchase_date = match extracted.date {
        Some(raw) => parse_date(&raw).unwrap_or_else(|| {
            tracing::warn!("Unparseable receipt date {:?}, using {}", raw, today);
            today
        }),
        None => today,
    };

    NewReceipt {
        merchant,
        total,
        purchase_date,
    }
}

fn amount_from_f64(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

/// 宽松解析金额原文: 去掉货币符号/空白, 识别千分位与小数分隔符
///
/// 同时出现 `.` 和 `,` 时靠后的是小数点; 只有一种分隔符时, 后面跟 1-2 位
/// 的是小数点, 单个 `.` 也按小数点, 符合三位分组的是千分位.
/// 其余情况无法判断, 返回 None.
fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            let (integer, fraction) = cleaned.rsplit_once(decimal)?;
            if integer.contains(decimal) || !is_grouped(integer, grouping) {
                return None;
            }
            format!("{}.{}", integer.replace(grouping, ""), fraction)
        }
        (Some(_), None) => single_separator(&cleaned, '.')?,
        (None, Some(_)) => single_separator(&cleaned, ',')?,
        (None, None) => cleaned,
    };

    BigDecimal::from_str(&normalized).ok()
}

/// 只出现一种分隔符时判断它是小数点还是千分位
fn single_separator(cleaned: &str, separator: char) -> Option<String> {
    let (integer, fraction) = cleaned.rsplit_once(separator)?;
    if !integer.contains(separator) && (1..=2).contains(&fraction.len()) {
        return Some(format!("{}.{}", integer, fraction));
    }
    if separator == '.' && !integer.contains('.') {
        // 单个点按普通小数处理 (如 "1.234", "0.5000")
        return Some(cleaned.to_string());
    }
    if is_grouped(cleaned, separator) {
        return Some(cleaned.replace(separator, ""));
    }
    None
}

/// 1-3 位开头, 其后每组恰好 3 位 (没有分隔符也算)
fn is_grouped(number: &str, separator: char) -> bool {
    let mut groups = number.trim_start_matches('-').split(separator);
    let head_ok = groups
        .next()
        .map_or(false, |head| (1..=3).contains(&head.len()) || !number.contains(separator));
    head_ok && groups.all(|group| group.len() == 3)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        // %Y 也会吃下两位年份, 交给 %y 处理
        .find(|date| (1900..3000).contains(&date.year()))
}
