use crate::assembly::apply_component;
use crate::core::geometry::bounding_region;
use crate::core::model::AdBlock;
use crate::extract::{AdBlockComponent, AdBlockComponentType, ComponentMap};

/// Kinds gathered around each price anchor.
const GATHERED: [AdBlockComponentType; 6] = [
    AdBlockComponentType::ProductName,
    AdBlockComponentType::ProductDescription,
    AdBlockComponentType::ProductCode,
    AdBlockComponentType::ProductPriceUnit,
    AdBlockComponentType::Quantity,
    AdBlockComponentType::Promotion,
];

/// One ad block per price anchor, built from the nearest component of every
/// other kind. A page without prices yields no ad blocks.
pub fn assemble_by_nearest(components: &ComponentMap) -> Vec<AdBlock> {
    components
        .get(AdBlockComponentType::ProductPrice)
        .iter()
        .map(|anchor| assemble_anchor(anchor, components))
        .collect()
}

fn assemble_anchor(anchor: &AdBlockComponent, components: &ComponentMap) -> AdBlock {
    let selected: Vec<&AdBlockComponent> = GATHERED
        .iter()
        .filter_map(|kind| nearest(anchor, components.get(*kind)))
        .collect();

    let mut ad_block = AdBlock {
        bounds: bounding_region(
            std::iter::once(&anchor.bounds).chain(selected.iter().map(|c| &c.bounds)),
        ),
        ..AdBlock::default()
    };
    apply_component(&mut ad_block, &anchor.value);
    for component in selected {
        apply_component(&mut ad_block, &component.value);
    }
    ad_block
}

/// Closest candidate by region distance. Ties keep the earlier candidate;
/// candidates at infinite distance (empty bounds) are never chosen.
pub fn nearest<'a>(
    anchor: &AdBlockComponent,
    candidates: &'a [AdBlockComponent],
) -> Option<&'a AdBlockComponent> {
    let mut best: Option<(f64, &AdBlockComponent)> = None;
    for candidate in candidates {
        let d = anchor.bounds.distance(&candidate.bounds);
        if !d.is_finite() {
            continue;
        }
        if best.map_or(true, |(best_d, _)| d < best_d) {
            best = Some((d, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Region, Vertex};
    use crate::extract::ComponentValue;
    use pretty_assertions::assert_eq;

    fn component(value: ComponentValue, bounds: Region) -> AdBlockComponent {
        AdBlockComponent::new(value, bounds)
    }

    fn name(text: &str, bounds: Region) -> AdBlockComponent {
        component(ComponentValue::ProductName(text.to_string()), bounds)
    }

    #[test]
    fn picks_nearest_name_for_each_price() {
        let components: ComponentMap = vec![
            name("Fresh Lemons", Region::rect(0, 0, 50, 10)),
            name("Green Grapes", Region::rect(200, 0, 250, 10)),
            component(ComponentValue::ProductPrice(399), Region::rect(0, 20, 40, 30)),
            component(ComponentValue::ProductPrice(299), Region::rect(200, 20, 240, 30)),
        ]
        .into_iter()
        .collect();

        let ad_blocks = assemble_by_nearest(&components);
        assert_eq!(ad_blocks.len(), 2);
        assert_eq!(ad_blocks[0].product.name.as_deref(), Some("Fresh Lemons"));
        assert_eq!(ad_blocks[0].product.price_cents, Some(399));
        assert_eq!(ad_blocks[1].product.name.as_deref(), Some("Green Grapes"));
        assert_eq!(ad_blocks[1].product.price_cents, Some(299));
    }

    #[test]
    fn bounds_enclose_anchor_and_selection() {
        let components: ComponentMap = vec![
            name("Fresh Lemons", Region::rect(0, 0, 50, 10)),
            component(ComponentValue::ProductPrice(399), Region::rect(10, 20, 60, 30)),
        ]
        .into_iter()
        .collect();

        let ad_blocks = assemble_by_nearest(&components);
        assert_eq!(
            ad_blocks[0].bounds.vertices,
            vec![
                Vertex::new(0, 0),
                Vertex::new(0, 30),
                Vertex::new(60, 30),
                Vertex::new(60, 0),
            ]
        );
    }

    #[test]
    fn ties_keep_first_candidate() {
        let anchor = component(ComponentValue::ProductPrice(100), Region::rect(50, 0, 60, 10));
        let candidates = vec![
            name("Left Side", Region::rect(0, 0, 40, 10)),
            name("Right Side", Region::rect(70, 0, 110, 10)),
        ];
        let chosen = nearest(&anchor, &candidates).unwrap();
        assert_eq!(chosen.value, ComponentValue::ProductName("Left Side".to_string()));
    }

    #[test]
    fn no_price_no_ad_blocks() {
        let components: ComponentMap = vec![name("Fresh Lemons", Region::rect(0, 0, 50, 10))]
            .into_iter()
            .collect();
        assert!(assemble_by_nearest(&components).is_empty());
    }

    #[test]
    fn empty_bounds_are_never_nearest() {
        let anchor = component(ComponentValue::ProductPrice(100), Region::rect(0, 0, 10, 10));
        let candidates = vec![name("Nowhere", Region::default())];
        assert!(nearest(&anchor, &candidates).is_none());
    }
}
