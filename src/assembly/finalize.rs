use crate::core::model::{AdBlock, Flyer, FlyerType, Page, PageType};
use crate::extract::rules::ExtractionRules;
use crate::ocr::annotation::HierarchicalAnnotation;

pub fn build_page(
    number: u32,
    file_name: impl Into<String>,
    ad_blocks: Vec<AdBlock>,
    page_annotation: &HierarchicalAnnotation,
    rules: &ExtractionRules,
) -> Page {
    let page_type = if ad_blocks.len() > 1 {
        PageType::MultiAd
    } else {
        PageType::Other
    };
    Page {
        number,
        file_name: file_name.into(),
        page_type,
        ad_blocks,
        has_holiday_content: rules.is_holiday(&page_annotation.text),
    }
}

/// Pages are ordered by page number; pages sharing a number keep their order.
pub fn build_flyer(mut pages: Vec<Page>, name: impl Into<String>) -> Flyer {
    pages.sort_by_key(|page| page.number);
    let flyer_type = if pages.iter().any(|page| page.has_holiday_content) {
        FlyerType::Holiday
    } else {
        FlyerType::Weekly
    };
    Flyer {
        flyer_type,
        name: name.into(),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FlyerConfig;
    use crate::core::geometry::Region;
    use crate::ocr::annotation::AnnotationLevel;
    use pretty_assertions::assert_eq;

    fn annotation(text: &str) -> HierarchicalAnnotation {
        HierarchicalAnnotation::leaf(AnnotationLevel::Page, Region::rect(0, 0, 10, 10), text)
    }

    #[test]
    fn page_type_depends_on_ad_block_count() {
        let rules = FlyerConfig::default().compile().unwrap();
        let one = build_page(1, "p1.jpg", vec![AdBlock::default()], &annotation(""), &rules);
        assert_eq!(one.page_type, PageType::Other);

        let two = build_page(
            2,
            "p2.jpg",
            vec![AdBlock::default(), AdBlock::default()],
            &annotation(""),
            &rules,
        );
        assert_eq!(two.page_type, PageType::MultiAd);
    }

    #[test]
    fn holiday_page_makes_holiday_flyer() {
        let rules = FlyerConfig::default().compile().unwrap();
        let weekly = build_page(1, "p1.jpg", Vec::new(), &annotation("Fresh\nproduce"), &rules);
        let holiday = build_page(2, "p2.jpg", Vec::new(), &annotation("Merry\nCHRISTMAS\n"), &rules);
        assert!(!weekly.has_holiday_content);
        assert!(holiday.has_holiday_content);

        assert_eq!(build_flyer(vec![weekly.clone()], "w").flyer_type, FlyerType::Weekly);
        assert_eq!(build_flyer(vec![weekly, holiday], "h").flyer_type, FlyerType::Holiday);
    }

    #[test]
    fn flyer_pages_follow_page_number() {
        let rules = FlyerConfig::default().compile().unwrap();
        let second = build_page(2, "p2.jpg", Vec::new(), &annotation(""), &rules);
        let first = build_page(1, "p1.jpg", Vec::new(), &annotation(""), &rules);

        let flyer = build_flyer(vec![second, first], "w");

        let files: Vec<&str> = flyer.pages.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(files, vec!["p1.jpg", "p2.jpg"]);
    }
}
