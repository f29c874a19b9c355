/// 单个文件归一化后的抽取结果, 未识别的字段为 None
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedReceipt {
    pub merchant: Option<String>,
    pub total: Option<ExtractedTotal>,
    pub date: Option<String>,
}

/// 金额: 结构化金额或原始文本 (无 moneyValue 时)
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedTotal {
    Amount(f64),
    Raw(String),
}
