use crate::core::model::{Promotion, PromotionAmount, PromotionKind};
use crate::extract::price::string_to_price;
use crate::extract::{BlockText, ComponentExtractor, ComponentValue};

const MAX_BOGO_COUNT: u32 = 9;

pub fn extract_promotion(
    extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    let rules = extractor.rules();
    let text = block.text.as_str();

    if let Some(caps) = rules.bogo.captures(text) {
        let count = caps
            .get(1)
            .and_then(|n| match n.as_str().to_lowercase().as_str() {
                "one" => Some(1),
                digits => digits.parse::<u32>().ok(),
            })
            .unwrap_or(1)
            .clamp(1, MAX_BOGO_COUNT);
        return Some(promotion(
            PromotionKind::BuyNGetOneFree,
            PromotionAmount::Count(count),
            text,
        ));
    }

    if !rules.is_promotional(text) {
        return None;
    }

    if let Some(caps) = rules.percent_amount.captures(text) {
        let amount = match caps.get(2) {
            Some(upper) => format!("{}%-{}%", &caps[1], upper.as_str()),
            None => format!("{}%", &caps[1]),
        };
        return Some(promotion(
            PromotionKind::Percentage,
            PromotionAmount::Text(amount),
            text,
        ));
    }

    let caps = rules.flat_amount.captures(text)?;
    let amount = match string_to_price(&caps[1], &rules.price) {
        Some(cents) => PromotionAmount::Cents(cents),
        None => PromotionAmount::Text(caps[0].to_string()),
    };
    Some(promotion(PromotionKind::Flat, amount, text))
}

fn promotion(kind: PromotionKind, amount: PromotionAmount, text: &str) -> ComponentValue {
    ComponentValue::Promotion(Promotion {
        kind,
        amount,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{block, block_text, extractor};
    use pretty_assertions::assert_eq;

    fn promo(text: &str) -> Option<Promotion> {
        let annotation = block(text);
        match extract_promotion(&extractor(), &block_text(&annotation)) {
            Some(ComponentValue::Promotion(promotion)) => Some(promotion),
            _ => None,
        }
    }

    #[test]
    fn buy_one_get_one() {
        let found = promo("Buy one get one FREE").unwrap();
        assert_eq!(found.kind, PromotionKind::BuyNGetOneFree);
        assert_eq!(found.amount, PromotionAmount::Count(1));

        assert_eq!(promo("BOGO").unwrap().amount, PromotionAmount::Count(1));
        assert_eq!(promo("buy 2 get 1 free").unwrap().amount, PromotionAmount::Count(2));
    }

    #[test]
    fn bogo_count_is_clamped() {
        assert_eq!(promo("buy 0 get 1").unwrap().amount, PromotionAmount::Count(1));
    }

    #[test]
    fn percentage_needs_promotion_word() {
        let found = promo("Save 20% today").unwrap();
        assert_eq!(found.kind, PromotionKind::Percentage);
        assert_eq!(found.amount, PromotionAmount::Text("20%".to_string()));
        assert_eq!(promo("20% more"), None);
    }

    #[test]
    fn percentage_range() {
        let found = promo("save 25% - 50% off").unwrap();
        assert_eq!(found.amount, PromotionAmount::Text("25%-50%".to_string()));
    }

    #[test]
    fn flat_amount_in_cents() {
        let found = promo("SAVE $2 on any two").unwrap();
        assert_eq!(found.kind, PromotionKind::Flat);
        assert_eq!(found.amount, PromotionAmount::Cents(200));
        assert_eq!(found.text, "SAVE $2 on any two");
    }

    #[test]
    fn promotion_word_without_amount() {
        assert_eq!(promo("Hot deal of the week"), None);
    }
}
