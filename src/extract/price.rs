use crate::core::config::PriceLimits;
use crate::extract::{BlockText, ComponentExtractor, ComponentValue};

/// Price in cents. Multi-buy offers win over per-unit prices, which win over a
/// plain dollar amount.
pub fn extract_price(
    extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    let rules = extractor.rules();
    let text = block.text.as_str();

    if let Some((count, total)) = multi_buy(extractor, text) {
        let each = (total as f64 / count as f64).round() as i64;
        return Some(ComponentValue::ProductPrice(each));
    }

    if let Some(caps) = rules.price_per_unit.captures(text) {
        if let Some(cents) = string_to_price(&caps[1], &rules.price) {
            return Some(ComponentValue::ProductPrice(cents));
        }
    }

    if let Some(caps) = rules.dollar_amount.captures(text) {
        return string_to_price(&caps[1], &rules.price).map(ComponentValue::ProductPrice);
    }

    let caps = rules.bare_number.captures(text)?;
    if is_leading_quantity(extractor, text, &caps[1]) {
        return None;
    }
    string_to_price(&caps[1], &rules.price).map(ComponentValue::ProductPrice)
}

/// A leading whole number that is the amount of a measurement ("4 lb")
/// rather than a price.
fn is_leading_quantity(extractor: &ComponentExtractor, text: &str, number: &str) -> bool {
    !number.contains('.')
        && extractor
            .rules()
            .measured_quantity
            .find(text)
            .is_some_and(|m| m.start() == 0)
}

pub fn extract_price_unit(
    extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    let text = block.text.as_str();

    let last_word = text
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_lowercase();
    let priced_each = (last_word == "ea" || last_word == "each")
        && text.split_whitespace().count() <= 2;
    if priced_each || multi_buy(extractor, text).is_some() {
        return Some(ComponentValue::ProductPriceUnit("each".to_string()));
    }

    extractor
        .rules()
        .price_per_unit
        .captures(text)
        .map(|caps| ComponentValue::ProductPriceUnit(caps[2].to_lowercase()))
}

/// First "N for $M" offer with a usable count and total, as `(N, M in cents)`.
fn multi_buy(extractor: &ComponentExtractor, text: &str) -> Option<(u32, i64)> {
    let rules = extractor.rules();
    rules.multi_buy.captures_iter(text).find_map(|caps| {
        let count: u32 = caps[1].parse().ok()?;
        if count == 0 || count >= rules.price.max_multi_buy {
            return None;
        }
        let total = string_to_price(&caps[2], &rules.price)?;
        Some((count, total))
    })
}

/// Normalizes a matched price string to cents.
///
/// Values with a decimal point are dollars. Whole numbers under the dollar
/// threshold are dollars too, anything else is already cents. Results outside
/// the configured window are rejected.
pub fn string_to_price(raw: &str, limits: &PriceLimits) -> Option<i64> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '¢') && !c.is_whitespace())
        .collect();
    if digits.is_empty() {
        return None;
    }

    let cents = if digits.contains('.') {
        match digits.parse::<f64>() {
            Ok(dollars) if dollars.is_finite() => (dollars * 100.0).round() as i64,
            _ => {
                tracing::warn!(value = raw, "malformed decimal price");
                return None;
            }
        }
    } else {
        match digits.parse::<i64>() {
            Ok(value) if value < limits.dollar_threshold => value * 100,
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(value = raw, error = %err, "malformed price");
                return None;
            }
        }
    };

    if cents < limits.min_cents || cents > limits.max_cents {
        tracing::debug!(value = raw, cents, "price outside accepted window");
        return None;
    }
    Some(cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{block, block_text, extractor};
    use pretty_assertions::assert_eq;

    fn price(text: &str) -> Option<i64> {
        let annotation = block(text);
        match extract_price(&extractor(), &block_text(&annotation)) {
            Some(ComponentValue::ProductPrice(cents)) => Some(cents),
            _ => None,
        }
    }

    fn unit(text: &str) -> Option<String> {
        let annotation = block(text);
        match extract_price_unit(&extractor(), &block_text(&annotation)) {
            Some(ComponentValue::ProductPriceUnit(unit)) => Some(unit),
            _ => None,
        }
    }

    #[test]
    fn multi_buy_divides_total() {
        assert_eq!(price("2 for $3"), Some(150));
        assert_eq!(price("3/$10"), Some(333));
        assert_eq!(unit("2 for $3"), Some("each".to_string()));
    }

    #[test]
    fn multi_buy_count_must_be_small() {
        // falls through to the plain dollar amount
        assert_eq!(price("12 for $5"), Some(500));
    }

    #[test]
    fn price_per_unit() {
        assert_eq!(price("$1.99/lb"), Some(199));
        assert_eq!(unit("$1.99/lb"), Some("lb".to_string()));
        assert_eq!(unit("3.49 / KG"), Some("kg".to_string()));
    }

    #[test]
    fn bare_numbers() {
        assert_eq!(price("4.99"), Some(499));
        assert_eq!(price("0.10"), None);
        assert_eq!(price("$5"), Some(500));
        assert_eq!(price("Apples 4.99"), None);
    }

    #[test]
    fn leading_number_with_trailing_unit() {
        assert_eq!(price("2.99 lb"), Some(299));
        assert_eq!(price("4.99 ea"), Some(499));
        assert_eq!(price("3.49 each"), Some(349));
        assert_eq!(price("$1.29 ea."), Some(129));
        assert_eq!(unit("3.49 each"), Some("each".to_string()));
        assert_eq!(unit("4.99 ea"), Some("each".to_string()));
    }

    #[test]
    fn leading_quantity_is_not_a_price() {
        assert_eq!(price("4 lb"), None);
        assert_eq!(price("2 kg bag"), None);
        assert_eq!(price("4.99ea"), None);
    }

    #[test]
    fn each_literal() {
        assert_eq!(unit("ea."), Some("each".to_string()));
        assert_eq!(unit("EACH"), Some("each".to_string()));
        assert_eq!(unit("$4.99"), None);
    }

    #[test]
    fn dollar_threshold_boundaries() {
        let limits = PriceLimits::default();
        assert_eq!(string_to_price("98", &limits), Some(9800));
        assert_eq!(string_to_price("99", &limits), Some(99));
        assert_eq!(string_to_price("100", &limits), Some(100));
        assert_eq!(string_to_price("1", &limits), Some(100));
    }

    #[test]
    fn price_window() {
        let limits = PriceLimits::default();
        assert_eq!(string_to_price("0.50", &limits), Some(50));
        assert_eq!(string_to_price("0.49", &limits), None);
        assert_eq!(string_to_price("100.00", &limits), Some(10000));
        assert_eq!(string_to_price("100.01", &limits), None);
        assert_eq!(string_to_price("1,299", &limits), Some(1299));
        assert_eq!(string_to_price("12,999", &limits), None);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let limits = PriceLimits::default();
        assert_eq!(string_to_price("1.2.3", &limits), None);
        assert_eq!(string_to_price("", &limits), None);
    }
}
