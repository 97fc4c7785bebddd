pub mod classifier;
pub mod finalize;
pub mod nearest;
pub mod segmented;

use std::sync::Arc;

use crate::core::geometry::Region;
use crate::core::model::AdBlock;
use crate::extract::{ComponentExtractor, ComponentValue};
use crate::ocr::annotation::HierarchicalAnnotation;

pub use classifier::{NoopClassifier, ProductClassifier};

/// Turns one page's annotation tree into ad blocks.
#[derive(Clone)]
pub struct FlyerAssembler {
    extractor: ComponentExtractor,
    classifier: Arc<dyn ProductClassifier>,
}

impl FlyerAssembler {
    pub fn new(extractor: ComponentExtractor, classifier: Arc<dyn ProductClassifier>) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    pub fn extractor(&self) -> &ComponentExtractor {
        &self.extractor
    }

    /// Nearest-neighbour assembly around every price on the page.
    pub fn assemble_page(&self, page: &HierarchicalAnnotation) -> Vec<AdBlock> {
        let components = self.extractor.extract_all(page.blocks());
        let mut ad_blocks = nearest::assemble_by_nearest(&components);
        self.categorize(&mut ad_blocks);
        ad_blocks
    }

    /// One ad block per detector region, built from the blocks that intersect it.
    pub fn assemble_segmented_page(
        &self,
        page: &HierarchicalAnnotation,
        regions: &[Region],
    ) -> Vec<AdBlock> {
        let blocks = page.blocks();
        let mut ad_blocks: Vec<AdBlock> = regions
            .iter()
            .map(|region| {
                let inside = blocks
                    .iter()
                    .copied()
                    .filter(|block| block.bounds.intersects(region));
                let components = self.extractor.extract_all(inside);
                segmented::merge_region_components(region, &components)
            })
            .collect();
        self.categorize(&mut ad_blocks);
        ad_blocks
    }

    fn categorize(&self, ad_blocks: &mut [AdBlock]) {
        for ad_block in ad_blocks.iter_mut() {
            let Some(name) = ad_block.product.name.as_deref() else {
                continue;
            };
            ad_block.product.category = match self.classifier.classify(name) {
                Ok(category) => category,
                Err(err) => {
                    tracing::warn!(name, error = %err, "product classification failed");
                    None
                }
            };
        }
    }
}

/// Copies a component's payload into the matching ad block field.
pub(crate) fn apply_component(ad_block: &mut AdBlock, value: &ComponentValue) {
    let product = &mut ad_block.product;
    match value {
        ComponentValue::ProductName(name) => product.name = Some(name.clone()),
        ComponentValue::ProductDescription(text) => product.description = Some(text.clone()),
        ComponentValue::ProductPrice(cents) => product.price_cents = Some(*cents),
        ComponentValue::ProductCode(code) => product.code = Some(code.clone()),
        ComponentValue::ProductPriceUnit(unit) => product.price_unit = Some(unit.clone()),
        ComponentValue::Quantity(quantity) => product.quantity = Some(quantity.clone()),
        ComponentValue::Promotion(promotion) => ad_block.promotion = Some(promotion.clone()),
        ComponentValue::Unknown(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ProductCategory;
    use crate::extract::test_support::extractor;
    use crate::ocr::annotation::AnnotationLevel;
    use pretty_assertions::assert_eq;

    struct FailingClassifier;

    impl ProductClassifier for FailingClassifier {
        fn classify(&self, _name: &str) -> anyhow::Result<Option<ProductCategory>> {
            anyhow::bail!("model unavailable")
        }
    }

    struct FixedClassifier;

    impl ProductClassifier for FixedClassifier {
        fn classify(&self, _name: &str) -> anyhow::Result<Option<ProductCategory>> {
            Ok(Some(ProductCategory {
                label: "produce".to_string(),
                confidence: 0.9,
            }))
        }
    }

    fn page(blocks: Vec<(Region, &str)>) -> HierarchicalAnnotation {
        let children = blocks
            .into_iter()
            .map(|(bounds, text)| HierarchicalAnnotation::leaf(AnnotationLevel::Block, bounds, text))
            .collect();
        HierarchicalAnnotation::with_children(AnnotationLevel::Page, Region::rect(0, 0, 500, 500), children)
    }

    #[test]
    fn unsegmented_page_uses_price_anchors() {
        let assembler = FlyerAssembler::new(extractor(), Arc::new(NoopClassifier));
        let page = page(vec![
            (Region::rect(0, 0, 100, 20), "Navel Oranges"),
            (Region::rect(0, 25, 100, 45), "$2.49"),
        ]);
        let ad_blocks = assembler.assemble_page(&page);
        assert_eq!(ad_blocks.len(), 1);
        assert_eq!(ad_blocks[0].product.name.as_deref(), Some("Navel Oranges"));
        assert_eq!(ad_blocks[0].product.price_cents, Some(249));
        assert_eq!(ad_blocks[0].product.category, None);
    }

    #[test]
    fn segmented_page_ignores_blocks_outside_region() {
        let assembler = FlyerAssembler::new(extractor(), Arc::new(FixedClassifier));
        let page = page(vec![
            (Region::rect(0, 0, 100, 20), "Navel Oranges $2.49"),
            (Region::rect(300, 300, 400, 320), "Green Grapes $3.99"),
        ]);
        let ad_blocks = assembler.assemble_segmented_page(&page, &[Region::rect(0, 0, 150, 50)]);
        assert_eq!(ad_blocks.len(), 1);
        assert_eq!(ad_blocks[0].product.name.as_deref(), Some("Navel Oranges"));
        assert_eq!(ad_blocks[0].product.price_cents, Some(249));
        assert_eq!(
            ad_blocks[0].product.category.as_ref().map(|c| c.label.as_str()),
            Some("produce")
        );
    }

    #[test]
    fn classifier_failure_leaves_category_empty() {
        let assembler = FlyerAssembler::new(extractor(), Arc::new(FailingClassifier));
        let page = page(vec![(Region::rect(0, 0, 100, 20), "Navel Oranges $2.49")]);
        let ad_blocks = assembler.assemble_page(&page);
        assert_eq!(ad_blocks.len(), 1);
        assert_eq!(ad_blocks[0].product.category, None);
    }
}
