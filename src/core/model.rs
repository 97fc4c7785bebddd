use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::geometry::Region;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FlyerType {
    Weekly,
    Holiday,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    MultiAd,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PromotionKind {
    Percentage,
    Flat,
    BuyNGetOneFree,
    BuyOneGetNPercentOff,
    BuyOneGetNAmountOff,
}

/// Amount attached to a promotion. Its shape depends on the promotion kind:
/// a count for buy-N offers, cents for flat discounts, text such as `"20%"` otherwise.
///
/// Serialized with the variant as the key, e.g. `{"cents": 200}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum PromotionAmount {
    Count(u32),
    Cents(i64),
    Text(String),
}

impl fmt::Display for PromotionAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionAmount::Count(n) => write!(f, "{n}"),
            PromotionAmount::Cents(cents) => write!(f, "{}", format_cents(*cents)),
            PromotionAmount::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    pub kind: PromotionKind,
    pub amount: PromotionAmount,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quantity {
    pub measurement: String,
    /// Amount as printed, e.g. `"4"`, `"2.5"` or a range such as `"2-3"`.
    pub amount: String,
    pub text: String,
}

impl Quantity {
    /// Numeric value of the amount; for ranges, the lower bound.
    pub fn amount_value(&self) -> Option<f64> {
        self.amount
            .split(['-', 'x', 'X'])
            .next()
            .and_then(|s| s.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductCategory {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price_cents: Option<i64>,
    pub price_unit: Option<String>,
    pub quantity: Option<Quantity>,
    pub category: Option<ProductCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdBlock {
    pub product: Product,
    pub promotion: Option<Promotion>,
    pub bounds: Region,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_data: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub number: u32,
    pub file_name: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub ad_blocks: Vec<AdBlock>,
    pub has_holiday_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flyer {
    #[serde(rename = "type")]
    pub flyer_type: FlyerType,
    pub name: String,
    pub pages: Vec<Page>,
}

impl Flyer {
    pub fn ad_block_count(&self) -> usize {
        self.pages.iter().map(|page| page.ad_blocks.len()).sum()
    }
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_as_dollars() {
        assert_eq!(format_cents(399), "$3.99");
        assert_eq!(format_cents(50), "$0.50");
        assert_eq!(format_cents(10000), "$100.00");
    }

    #[test]
    fn quantity_range_uses_lower_bound() {
        let quantity = Quantity {
            measurement: "lb".to_string(),
            amount: "2-3".to_string(),
            text: "2-3 lb".to_string(),
        };
        assert_eq!(quantity.amount_value(), Some(2.0));
    }

    #[test]
    fn serializes_enums_in_kebab_case() {
        let json = serde_json::to_string(&PromotionKind::BuyNGetOneFree).unwrap();
        assert_eq!(json, "\"buy-n-get-one-free\"");
        let json = serde_json::to_string(&PageType::MultiAd).unwrap();
        assert_eq!(json, "\"multi-ad\"");
    }

    #[test]
    fn promotion_amount_keeps_its_variant() {
        let cents = PromotionAmount::Cents(200);
        let json = serde_json::to_string(&cents).unwrap();
        assert_eq!(json, r#"{"cents":200}"#);
        assert_eq!(serde_json::from_str::<PromotionAmount>(&json).unwrap(), cents);

        let count: PromotionAmount = serde_json::from_str(r#"{"count":2}"#).unwrap();
        assert_eq!(count, PromotionAmount::Count(2));
        let text: PromotionAmount = serde_json::from_str(r#"{"text":"20%"}"#).unwrap();
        assert_eq!(text, PromotionAmount::Text("20%".to_string()));
    }
}
