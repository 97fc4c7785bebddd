use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::model::Flyer;
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, flyer: &Flyer) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}.json", flyer.name));
        let data = serde_json::to_string_pretty(flyer)?;
        fs::write(&path, data).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote flyer json");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Region;
    use crate::core::model::{AdBlock, FlyerType, Page, PageType, Product};

    #[test]
    fn serializes_enums_and_regions() -> Result<()> {
        let flyer = Flyer {
            flyer_type: FlyerType::Weekly,
            name: "weekly".to_string(),
            pages: vec![Page {
                number: 1,
                file_name: "p1.jpg".to_string(),
                page_type: PageType::MultiAd,
                ad_blocks: vec![AdBlock {
                    product: Product {
                        name: Some("Lisa's Lemons".to_string()),
                        price_cents: Some(399),
                        ..Product::default()
                    },
                    bounds: Region::rect(0, 0, 10, 5),
                    ..AdBlock::default()
                }],
                has_holiday_content: false,
            }],
        };

        let value = serde_json::to_value(&flyer)?;
        assert_eq!(value["type"], "weekly");
        assert_eq!(value["pages"][0]["type"], "multi-ad");
        assert_eq!(value["pages"][0]["ad_blocks"][0]["product"]["price_cents"], 399);
        assert_eq!(value["pages"][0]["ad_blocks"][0]["bounds"][2]["x"], 10);
        assert!(value["pages"][0]["ad_blocks"][0].get("additional_data").is_none());
        Ok(())
    }
}
