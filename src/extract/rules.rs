use regex::Regex;

use crate::core::config::{FlyerConfig, PriceLimits};
use crate::core::errors::{FlyerError, Result};

const NUMBER: &str = r"\d[\d,]*(?:\.\d+)?";

/// Every pattern the extraction rules need, compiled once from a [`FlyerConfig`].
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    pub price: PriceLimits,
    pub max_quantity_amount: f64,
    pub product_code: Regex,
    pub ignore_in_name: Vec<Regex>,
    pub product_of: Regex,
    pub multi_buy: Regex,
    pub price_per_unit: Regex,
    pub dollar_amount: Regex,
    pub bare_number: Regex,
    pub package_quantity: Option<Regex>,
    pub measured_quantity: Regex,
    pub bogo: Regex,
    pub percent_amount: Regex,
    pub flat_amount: Regex,
    pub promotion_words: Option<Regex>,
    pub holiday_words: Option<Regex>,
    /// Words that never start or continue a product-name phrase.
    pub non_name_words: Vec<String>,
}

impl ExtractionRules {
    pub fn compile(config: &FlyerConfig) -> Result<Self> {
        let code = config.product_code_regex.as_str();
        let product_code = compile(
            "product_code_regex",
            &format!(r"(?:{code})(?:[-/ ](?:{code}))?"),
        )?;

        let ignore_in_name = config
            .ignore_in_product_name
            .iter()
            .map(|pattern| compile("ignore_in_product_name", &format!("(?i){pattern}")))
            .collect::<Result<Vec<_>>>()?;

        let measurements = alternation(&config.measurement_words);
        let packages = alternation(&config.package_words);

        let package_quantity = if packages.is_empty() {
            None
        } else {
            Some(compile(
                "package_words",
                &format!(r"(?i)\b({packages})s?\.?\s+of\s+(\d+)\b"),
            )?)
        };

        let mut non_name_words: Vec<String> = config
            .measurement_words
            .iter()
            .chain(&config.package_words)
            .chain(&config.promotion_words)
            .map(|w| w.to_lowercase())
            .collect();
        non_name_words.sort();
        non_name_words.dedup();

        Ok(Self {
            price: config.price.clone(),
            max_quantity_amount: config.max_quantity_amount,
            product_code,
            ignore_in_name,
            product_of: compile("product_of", r"(?i)\bproduct\s+of\s+")?,
            multi_buy: compile(
                "multi_buy",
                &format!(r"(?i)\b(\d+)\s?(?:for|/)\s?\$?\s?({NUMBER})"),
            )?,
            price_per_unit: compile(
                "price_per_unit",
                &format!(r"(?i)\$?\s?({NUMBER})\s?/\s?([a-z]+)\b"),
            )?,
            dollar_amount: compile("dollar_amount", &format!(r"\$\s?({NUMBER})"))?,
            bare_number: compile(
                "bare_number",
                &format!(r"^\$?\s?({NUMBER})(?:\s?¢)?(?:\s|$)"),
            )?,
            package_quantity,
            measured_quantity: compile(
                "measurement_words",
                &format!(
                    r"(?i)\b(\d+(?:\.\d+)?)(?:\s?([-x])\s?(\d+(?:\.\d+)?))?\s?({measurements})\b"
                ),
            )?,
            bogo: compile(
                "bogo",
                r"(?i)\bbuy\s+(\d|one)\s+(?:and\s+)?get\s+(?:1|one)(?:\s+free)?\b|\bbogo\b",
            )?,
            percent_amount: compile(
                "percent_amount",
                r"(\d+(?:\.\d+)?)\s?%(?:\s?-\s?(\d+(?:\.\d+)?)\s?%)?",
            )?,
            flat_amount: compile("flat_amount", &format!(r"\$?({NUMBER})"))?,
            promotion_words: word_list("promotion_words", &config.promotion_words)?,
            holiday_words: word_list("holiday_words", &config.holiday_words)?,
            non_name_words,
        })
    }

    pub fn is_promotional(&self, text: &str) -> bool {
        self.promotion_words
            .as_ref()
            .is_some_and(|re| re.is_match(text))
    }

    pub fn is_holiday(&self, text: &str) -> bool {
        self.holiday_words
            .as_ref()
            .is_some_and(|re| re.is_match(text))
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| FlyerError::invalid_pattern(name, source))
}

/// Escaped alternation, longest words first so `lbs` wins over `lb`.
fn alternation(words: &[String]) -> String {
    let mut escaped: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(&w.to_lowercase()).replace(' ', r"\s+"))
        .collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    escaped.join("|")
}

/// Case-insensitive whole-word matcher, `None` when the list is empty.
fn word_list(name: &str, words: &[String]) -> Result<Option<Regex>> {
    let alternatives = alternation(words);
    if alternatives.is_empty() {
        return Ok(None);
    }
    compile(name, &format!(r"(?i)\b(?:{alternatives})\b")).map(Some)
}
