use crate::core::model::Quantity;
use crate::extract::{BlockText, ComponentExtractor, ComponentValue};

/// Package counts ("pkg of 6") take precedence over measured amounts ("2.5 lb", "2-3 kg").
pub fn extract_quantity(
    extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    let rules = extractor.rules();
    let text = block.text.as_str();

    if let Some(caps) = rules
        .package_quantity
        .as_ref()
        .and_then(|re| re.captures(text))
    {
        return Some(ComponentValue::Quantity(Quantity {
            measurement: caps[1].to_lowercase(),
            amount: caps[2].to_string(),
            text: text.to_string(),
        }));
    }

    let caps = rules.measured_quantity.captures(text)?;
    let amount = match (caps.get(2), caps.get(3)) {
        (Some(separator), Some(upper)) => format!(
            "{}{}{}",
            &caps[1],
            separator.as_str().to_lowercase(),
            upper.as_str()
        ),
        _ => caps[1].to_string(),
    };
    let quantity = Quantity {
        measurement: caps[4].to_lowercase(),
        amount,
        text: text.to_string(),
    };

    match quantity.amount_value() {
        Some(value) if value < rules.max_quantity_amount => {
            Some(ComponentValue::Quantity(quantity))
        }
        Some(value) => {
            tracing::debug!(value, text, "quantity amount out of range");
            None
        }
        None => {
            tracing::warn!(amount = %quantity.amount, "malformed quantity amount");
            None
        }
    }
}
