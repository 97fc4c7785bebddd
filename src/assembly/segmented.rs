use crate::assembly::apply_component;
use crate::core::geometry::Region;
use crate::core::model::AdBlock;
use crate::extract::{AdBlockComponent, AdBlockComponentType, ComponentMap};
use crate::ocr::annotation::normalize_whitespace;

/// Kinds where the first candidate wins and later ones are kept as additional data.
const FIRST_WINS: [AdBlockComponentType; 4] = [
    AdBlockComponentType::ProductCode,
    AdBlockComponentType::ProductPriceUnit,
    AdBlockComponentType::Quantity,
    AdBlockComponentType::Promotion,
];

/// Merges every component found inside one detector region into a single ad block.
///
/// The largest name wins and the other names join the description. The largest
/// price wins. Code, unit, quantity and promotion keep their first candidate.
/// Whatever loses, plus unclassified text, ends up in `additional_data`. The
/// block is built even when the region holds no price, and its bounds are the
/// region itself.
pub fn merge_region_components(region: &Region, components: &ComponentMap) -> AdBlock {
    let mut ad_block = AdBlock {
        bounds: region.clone(),
        ..AdBlock::default()
    };

    let names = components.get(AdBlockComponentType::ProductName);
    let name_winner = largest(names);
    if let Some(winner) = name_winner {
        apply_component(&mut ad_block, &names[winner].value);
    }

    let description_parts: Vec<String> = names
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != name_winner)
        .map(|(_, component)| component)
        .chain(components.get(AdBlockComponentType::ProductDescription))
        .map(|component| component.value.to_string())
        .collect();
    let description = normalize_whitespace(&description_parts.join(" "));
    if !description.is_empty() {
        ad_block.product.description = Some(description);
    }

    let prices = components.get(AdBlockComponentType::ProductPrice);
    let price_winner = largest(prices);
    for (idx, price) in prices.iter().enumerate() {
        if Some(idx) == price_winner {
            apply_component(&mut ad_block, &price.value);
        } else {
            ad_block.additional_data.push(price.value.to_string());
        }
    }

    for kind in FIRST_WINS {
        let mut candidates = components.get(kind).iter();
        if let Some(first) = candidates.next() {
            apply_component(&mut ad_block, &first.value);
        }
        ad_block
            .additional_data
            .extend(candidates.map(|c| c.value.to_string()));
    }

    ad_block.additional_data.extend(
        components
            .get(AdBlockComponentType::Unknown)
            .iter()
            .map(|c| c.value.to_string())
            .filter(|text| !text.is_empty()),
    );

    ad_block
}

/// Index of the candidate with the largest area; the first one on ties.
fn largest(candidates: &[AdBlockComponent]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let area = candidate.area();
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((idx, area));
        }
    }
    best.map(|(idx, _)| idx)
}
