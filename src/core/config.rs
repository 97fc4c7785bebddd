use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{FlyerError, Result};
use crate::extract::rules::ExtractionRules;

pub const ENV_PRODUCT_CODE_REGEX: &str = "FLYER_PRODUCT_CODE_REGEX";
pub const ENV_IGNORE_IN_PRODUCT_NAME: &str = "FLYER_IGNORE_IN_PRODUCT_NAME";
pub const ENV_PROMOTION_WORDS: &str = "FLYER_PROMOTION_WORDS";
pub const ENV_HOLIDAY_WORDS: &str = "FLYER_HOLIDAY_WORDS";

/// Valid price window and the cutoffs used when normalizing printed prices to cents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriceLimits {
    pub min_cents: i64,
    pub max_cents: i64,
    /// Integer values below this are read as whole dollars.
    pub dollar_threshold: i64,
    /// Multi-buy offers ("N for $M") need `N` below this.
    pub max_multi_buy: u32,
}

impl Default for PriceLimits {
    fn default() -> Self {
        Self {
            min_cents: 50,
            max_cents: 10_000,
            dollar_threshold: 99,
            max_multi_buy: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlyerConfig {
    pub product_code_regex: String,
    /// Merchant boilerplate patterns removed before product-name detection.
    pub ignore_in_product_name: Vec<String>,
    pub measurement_words: Vec<String>,
    pub package_words: Vec<String>,
    pub promotion_words: Vec<String>,
    pub holiday_words: Vec<String>,
    pub price: PriceLimits,
    pub max_quantity_amount: f64,
}

impl Default for FlyerConfig {
    fn default() -> Self {
        Self {
            product_code_regex: r"\b\d{5,8}\b".to_string(),
            ignore_in_product_name: Vec::new(),
            measurement_words: to_strings(&["lb", "lbs", "oz", "kg", "ml", "g", "l", "unit"]),
            package_words: to_strings(&["pkg", "pack", "package", "bag", "box", "case", "tray"]),
            promotion_words: to_strings(&[
                "save",
                "off",
                "sale",
                "deal",
                "special",
                "discount",
                "clearance",
                "bonus",
                "free",
                "rollback",
            ]),
            holiday_words: to_strings(&[
                "christmas",
                "xmas",
                "easter",
                "thanksgiving",
                "halloween",
                "valentine",
                "valentine's",
                "hanukkah",
                "diwali",
                "holiday",
                "holidays",
                "new year",
                "mother's day",
                "father's day",
                "boxing day",
            ]),
            price: PriceLimits::default(),
            max_quantity_amount: 10_000.0,
        }
    }
}

impl FlyerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Overlays values from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Overlays values from any key lookup. List values are `;`-separated.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(pattern) = lookup(ENV_PRODUCT_CODE_REGEX).filter(|s| !s.trim().is_empty()) {
            self.product_code_regex = pattern;
        }
        if let Some(list) = lookup(ENV_IGNORE_IN_PRODUCT_NAME) {
            self.ignore_in_product_name = split_list(&list);
        }
        if let Some(list) = lookup(ENV_PROMOTION_WORDS) {
            self.promotion_words = split_list(&list);
        }
        if let Some(list) = lookup(ENV_HOLIDAY_WORDS) {
            self.holiday_words = split_list(&list);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let price = &self.price;
        if price.min_cents < 0 || price.min_cents > price.max_cents {
            return Err(FlyerError::InvalidConfig(format!(
                "price window {}..{} is empty",
                price.min_cents, price.max_cents
            )));
        }
        if price.max_multi_buy < 2 {
            return Err(FlyerError::InvalidConfig(
                "max_multi_buy must be at least 2".to_string(),
            ));
        }
        if self.measurement_words.iter().all(|w| w.trim().is_empty()) {
            return Err(FlyerError::InvalidConfig(
                "measurement_words must not be empty".to_string(),
            ));
        }
        if self.max_quantity_amount.is_nan() || self.max_quantity_amount <= 0.0 {
            return Err(FlyerError::InvalidConfig(
                "max_quantity_amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn compile(&self) -> Result<ExtractionRules> {
        self.validate()?;
        ExtractionRules::compile(self)
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_replace_configured_lists() {
        let config = FlyerConfig::default().with_overrides_from(|key| match key {
            ENV_PRODUCT_CODE_REGEX => Some(r"#\d{4}".to_string()),
            ENV_IGNORE_IN_PRODUCT_NAME => Some("our brand; club price ;".to_string()),
            _ => None,
        });
        assert_eq!(config.product_code_regex, r"#\d{4}");
        assert_eq!(config.ignore_in_product_name, vec!["our brand", "club price"]);
        assert_eq!(config.promotion_words, FlyerConfig::default().promotion_words);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: FlyerConfig =
            serde_json::from_str(r#"{"price": {"dollar_threshold": 20}}"#).unwrap();
        assert_eq!(config.price.dollar_threshold, 20);
        assert_eq!(config.price.min_cents, 50);
        assert_eq!(config.measurement_words, FlyerConfig::default().measurement_words);
    }

    #[test]
    fn rejects_empty_price_window() {
        let mut config = FlyerConfig::default();
        config.price.min_cents = 500;
        config.price.max_cents = 100;
        assert!(matches!(config.compile(), Err(FlyerError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_product_code_pattern() {
        let config = FlyerConfig {
            product_code_regex: "(".to_string(),
            ..FlyerConfig::default()
        };
        assert!(matches!(
            config.compile(),
            Err(FlyerError::InvalidPattern { .. })
        ));
    }
}
