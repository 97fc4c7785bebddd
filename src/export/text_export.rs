use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::model::{format_cents, AdBlock, Flyer};
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn format_ad_block(ad_block: &AdBlock) -> String {
        let product = &ad_block.product;
        let mut parts: Vec<String> = vec![product
            .name
            .clone()
            .unwrap_or_else(|| "(unnamed)".to_string())];

        if let Some(cents) = product.price_cents {
            match &product.price_unit {
                Some(unit) => parts.push(format!("{}/{}", format_cents(cents), unit)),
                None => parts.push(format_cents(cents)),
            }
        }
        if let Some(quantity) = &product.quantity {
            parts.push(format!("{} {}", quantity.amount, quantity.measurement));
        }
        if let Some(promotion) = &ad_block.promotion {
            parts.push(format!("[{}]", promotion.text));
        }
        parts.join(" | ")
    }

    pub fn render(flyer: &Flyer) -> String {
        let mut text = format!("# {} ({:?})\n\n", flyer.name, flyer.flyer_type);
        for page in &flyer.pages {
            text.push_str(&format!("=== Page {} ({}) ===\n", page.number, page.file_name));
            for ad_block in &page.ad_blocks {
                text.push_str(&Self::format_ad_block(ad_block));
                text.push('\n');
            }
            text.push('\n');
        }
        text
    }
}

impl Exporter for TextExporter {
    fn export(&self, flyer: &Flyer) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}.txt", flyer.name));
        fs::write(&path, Self::render(flyer)).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote flyer text");
        Ok(())
    }
}
