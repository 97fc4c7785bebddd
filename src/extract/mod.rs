pub mod grammar;
pub mod price;
pub mod product;
pub mod promotion;
pub mod quantity;
pub mod rules;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::geometry::Region;
use crate::core::model::{format_cents, Promotion, Quantity};
use crate::extract::grammar::{HeuristicChunker, PhraseChunker};
use crate::extract::rules::ExtractionRules;
use crate::ocr::annotation::HierarchicalAnnotation;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum AdBlockComponentType {
    Unknown,
    ProductName,
    ProductDescription,
    ProductPrice,
    ProductCode,
    ProductPriceUnit,
    Quantity,
    Promotion,
}

impl AdBlockComponentType {
    pub const ALL: [AdBlockComponentType; 8] = [
        AdBlockComponentType::Unknown,
        AdBlockComponentType::ProductName,
        AdBlockComponentType::ProductDescription,
        AdBlockComponentType::ProductPrice,
        AdBlockComponentType::ProductCode,
        AdBlockComponentType::ProductPriceUnit,
        AdBlockComponentType::Quantity,
        AdBlockComponentType::Promotion,
    ];
}

/// Payload of a component. The variant fixes the component type.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Unknown(Box<HierarchicalAnnotation>),
    ProductName(String),
    ProductDescription(String),
    ProductPrice(i64),
    ProductCode(String),
    ProductPriceUnit(String),
    Quantity(Quantity),
    Promotion(Promotion),
}

impl ComponentValue {
    pub fn kind(&self) -> AdBlockComponentType {
        match self {
            ComponentValue::Unknown(_) => AdBlockComponentType::Unknown,
            ComponentValue::ProductName(_) => AdBlockComponentType::ProductName,
            ComponentValue::ProductDescription(_) => AdBlockComponentType::ProductDescription,
            ComponentValue::ProductPrice(_) => AdBlockComponentType::ProductPrice,
            ComponentValue::ProductCode(_) => AdBlockComponentType::ProductCode,
            ComponentValue::ProductPriceUnit(_) => AdBlockComponentType::ProductPriceUnit,
            ComponentValue::Quantity(_) => AdBlockComponentType::Quantity,
            ComponentValue::Promotion(_) => AdBlockComponentType::Promotion,
        }
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentValue::Unknown(annotation) => f.write_str(&annotation.normalized_text()),
            ComponentValue::ProductName(text)
            | ComponentValue::ProductDescription(text)
            | ComponentValue::ProductCode(text)
            | ComponentValue::ProductPriceUnit(text) => f.write_str(text),
            ComponentValue::ProductPrice(cents) => f.write_str(&format_cents(*cents)),
            ComponentValue::Quantity(quantity) => {
                write!(f, "{} {}", quantity.amount, quantity.measurement)
            }
            ComponentValue::Promotion(promotion) => f.write_str(&promotion.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdBlockComponent {
    pub value: ComponentValue,
    pub bounds: Region,
}

impl AdBlockComponent {
    pub fn new(value: ComponentValue, bounds: Region) -> Self {
        Self { value, bounds }
    }

    pub fn kind(&self) -> AdBlockComponentType {
        self.value.kind()
    }

    pub fn area(&self) -> f64 {
        self.bounds.area()
    }
}

/// Components of one page (or one detector region) grouped by type.
/// Every type has an entry, possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMap {
    groups: BTreeMap<AdBlockComponentType, Vec<AdBlockComponent>>,
}

impl Default for ComponentMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentMap {
    pub fn new() -> Self {
        let groups = AdBlockComponentType::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        Self { groups }
    }

    pub fn push(&mut self, component: AdBlockComponent) {
        self.groups
            .entry(component.kind())
            .or_default()
            .push(component);
    }

    pub fn get(&self, kind: AdBlockComponentType) -> &[AdBlockComponent] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<AdBlockComponent> for ComponentMap {
    fn extend<T: IntoIterator<Item = AdBlockComponent>>(&mut self, iter: T) {
        for component in iter {
            self.push(component);
        }
    }
}

impl FromIterator<AdBlockComponent> for ComponentMap {
    fn from_iter<T: IntoIterator<Item = AdBlockComponent>>(iter: T) -> Self {
        let mut map = ComponentMap::new();
        map.extend(iter);
        map
    }
}

/// A block prepared for the rules: the node itself and its whitespace-normalized text.
pub struct BlockText<'a> {
    pub block: &'a HierarchicalAnnotation,
    pub text: String,
}

impl<'a> BlockText<'a> {
    pub fn new(block: &'a HierarchicalAnnotation) -> Self {
        Self {
            block,
            text: block.normalized_text(),
        }
    }
}

type RuleFn = fn(&ComponentExtractor, &BlockText<'_>) -> Option<ComponentValue>;

struct Rule {
    kind: AdBlockComponentType,
    /// The rule is skipped once any of these types matched for the block.
    suppressed_by: &'static [AdBlockComponentType],
    apply: RuleFn,
}

const RULES: &[Rule] = &[
    Rule {
        kind: AdBlockComponentType::ProductName,
        suppressed_by: &[],
        apply: product::extract_product_name,
    },
    Rule {
        kind: AdBlockComponentType::ProductCode,
        suppressed_by: &[],
        apply: product::extract_product_code,
    },
    Rule {
        kind: AdBlockComponentType::ProductPrice,
        suppressed_by: &[],
        apply: price::extract_price,
    },
    Rule {
        kind: AdBlockComponentType::ProductPriceUnit,
        suppressed_by: &[],
        apply: price::extract_price_unit,
    },
    Rule {
        kind: AdBlockComponentType::Quantity,
        suppressed_by: &[],
        apply: quantity::extract_quantity,
    },
    Rule {
        kind: AdBlockComponentType::Promotion,
        suppressed_by: &[],
        apply: promotion::extract_promotion,
    },
    Rule {
        kind: AdBlockComponentType::ProductDescription,
        suppressed_by: &[
            AdBlockComponentType::ProductName,
            AdBlockComponentType::Promotion,
        ],
        apply: product::extract_product_description,
    },
];

/// Runs the ordered rule list over single blocks. Stateless between calls.
#[derive(Clone)]
pub struct ComponentExtractor {
    rules: Arc<ExtractionRules>,
    chunker: Arc<dyn PhraseChunker>,
}

impl ComponentExtractor {
    pub fn new(rules: Arc<ExtractionRules>, chunker: Arc<dyn PhraseChunker>) -> Self {
        Self { rules, chunker }
    }

    /// Uses the [`HeuristicChunker`] seeded with the configured non-name words.
    pub fn with_default_chunker(rules: Arc<ExtractionRules>) -> Self {
        let chunker = HeuristicChunker::new().with_stop_words(rules.non_name_words.clone());
        Self::new(rules, Arc::new(chunker))
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    pub fn chunker(&self) -> &dyn PhraseChunker {
        self.chunker.as_ref()
    }

    /// All components found in one block, in rule order. A block that matches
    /// no rule yields a single `Unknown` component carrying the block itself.
    pub fn extract_components(&self, block: &HierarchicalAnnotation) -> Vec<AdBlockComponent> {
        let text = BlockText::new(block);
        let mut components: Vec<AdBlockComponent> = Vec::new();

        for rule in RULES {
            let suppressed = rule
                .suppressed_by
                .iter()
                .any(|kind| components.iter().any(|c| c.kind() == *kind));
            if suppressed {
                continue;
            }
            if let Some(value) = (rule.apply)(self, &text) {
                debug_assert_eq!(value.kind(), rule.kind);
                components.push(AdBlockComponent::new(value, block.bounds.clone()));
            }
        }

        if components.is_empty() {
            components.push(AdBlockComponent::new(
                ComponentValue::Unknown(Box::new(block.clone())),
                block.bounds.clone(),
            ));
        }

        tracing::debug!(
            text = %text.text,
            kinds = ?components.iter().map(AdBlockComponent::kind).collect::<Vec<_>>(),
            "classified block"
        );

        components
    }

    /// Components of every given block, grouped by type in encounter order.
    pub fn extract_all<'a>(
        &self,
        blocks: impl IntoIterator<Item = &'a HierarchicalAnnotation>,
    ) -> ComponentMap {
        blocks
            .into_iter()
            .flat_map(|block| self.extract_components(block))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::core::config::FlyerConfig;
    use crate::core::geometry::Region;
    use crate::ocr::annotation::{AnnotationLevel, HierarchicalAnnotation};

    use super::{BlockText, ComponentExtractor};

    pub fn extractor() -> ComponentExtractor {
        let rules = FlyerConfig::default().compile().unwrap();
        ComponentExtractor::with_default_chunker(Arc::new(rules))
    }

    pub fn block(text: &str) -> HierarchicalAnnotation {
        HierarchicalAnnotation::leaf(AnnotationLevel::Block, Region::rect(0, 0, 100, 20), text)
    }

    pub fn block_text(block: &HierarchicalAnnotation) -> BlockText<'_> {
        BlockText::new(block)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{block, extractor};
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<AdBlockComponentType> {
        extractor()
            .extract_components(&block(text))
            .iter()
            .map(AdBlockComponent::kind)
            .collect()
    }

    #[test]
    fn name_and_price_from_one_block() {
        assert_eq!(
            kinds("Lisa's Lemons $3.99/lb"),
            vec![
                AdBlockComponentType::ProductName,
                AdBlockComponentType::ProductPrice,
                AdBlockComponentType::ProductPriceUnit,
            ]
        );
    }

    #[test]
    fn unmatched_block_is_unknown() {
        let components = extractor().extract_components(&block("@@ ##"));
        assert_eq!(components.len(), 1);
        match &components[0].value {
            ComponentValue::Unknown(annotation) => assert_eq!(annotation.text, "@@ ##"),
            other => panic!("expected unknown component, got {other:?}"),
        }
    }

    #[test]
    fn description_is_suppressed_by_name() {
        let found = kinds("Crisp Gala Apples grown in local orchards");
        assert!(found.contains(&AdBlockComponentType::ProductName));
        assert!(!found.contains(&AdBlockComponentType::ProductDescription));
    }

    #[test]
    fn description_when_no_name_or_promotion() {
        assert_eq!(
            kinds("all at or up to 4 per day"),
            vec![AdBlockComponentType::ProductDescription]
        );
    }

    #[test]
    fn description_is_suppressed_by_promotion() {
        assert_eq!(
            kinds("save 20% on any two or more"),
            vec![AdBlockComponentType::Promotion]
        );
    }

    #[test]
    fn leading_price_with_unit_word() {
        assert_eq!(
            kinds("4.99 ea"),
            vec![
                AdBlockComponentType::ProductPrice,
                AdBlockComponentType::ProductPriceUnit,
            ]
        );
    }

    #[test]
    fn component_map_has_every_type() {
        let map = ComponentMap::new();
        for kind in AdBlockComponentType::ALL {
            assert!(map.get(kind).is_empty());
        }
        assert!(map.is_empty());
    }
}
