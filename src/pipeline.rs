use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assembly::finalize::{build_flyer, build_page};
use crate::assembly::{FlyerAssembler, NoopClassifier, ProductClassifier};
use crate::core::config::FlyerConfig;
use crate::core::errors::{self, FlyerError};
use crate::core::geometry::Region;
use crate::core::model::{AdBlock, Flyer, Page};
use crate::export::json_export::JsonExporter;
use crate::export::text_export::TextExporter;
use crate::export::{ExportFormat, Exporter};
use crate::extract::grammar::PhraseChunker;
use crate::extract::rules::ExtractionRules;
use crate::extract::ComponentExtractor;
use crate::ocr::annotation::HierarchicalAnnotation;

/// One page of OCR output, as handed to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSource {
    pub number: u32,
    pub file_name: String,
    pub annotation: HierarchicalAnnotation,
}

impl PageSource {
    pub fn new(number: u32, file_name: impl Into<String>, annotation: HierarchicalAnnotation) -> Self {
        Self {
            number,
            file_name: file_name.into(),
            annotation,
        }
    }
}

/// Extraction and assembly for whole flyers. Pages are processed in parallel
/// and come back ordered by page number.
#[derive(Clone)]
pub struct FlyerPipeline {
    rules: Arc<ExtractionRules>,
    assembler: FlyerAssembler,
}

impl FlyerPipeline {
    pub fn new(
        rules: Arc<ExtractionRules>,
        chunker: Arc<dyn PhraseChunker>,
        classifier: Arc<dyn ProductClassifier>,
    ) -> Self {
        let extractor = ComponentExtractor::new(rules.clone(), chunker);
        Self {
            rules,
            assembler: FlyerAssembler::new(extractor, classifier),
        }
    }

    /// Default chunker and no classifier.
    pub fn from_config(config: &FlyerConfig) -> errors::Result<Self> {
        let rules = Arc::new(config.compile()?);
        let extractor = ComponentExtractor::with_default_chunker(rules.clone());
        Ok(Self {
            rules,
            assembler: FlyerAssembler::new(extractor, Arc::new(NoopClassifier)),
        })
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ProductClassifier>) -> Self {
        self.assembler = FlyerAssembler::new(self.assembler.extractor().clone(), classifier);
        self
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    pub fn extractor(&self) -> &ComponentExtractor {
        self.assembler.extractor()
    }

    pub fn process_flyer(&self, pages: &[PageSource], name: &str) -> Flyer {
        let pages: Vec<Page> = pages
            .par_iter()
            .map(|source| {
                let ad_blocks = self.assembler.assemble_page(&source.annotation);
                self.finish_page(source, ad_blocks)
            })
            .collect();
        tracing::info!(name, pages = pages.len(), "assembled flyer");
        build_flyer(pages, name)
    }

    /// Like [`process_flyer`](Self::process_flyer), guided by one list of
    /// detector regions per page.
    pub fn process_segmented_flyer(
        &self,
        pages: &[PageSource],
        segmentations: &[Vec<Region>],
        name: &str,
    ) -> errors::Result<Flyer> {
        if pages.len() != segmentations.len() {
            return Err(FlyerError::SegmentationMismatch {
                pages: pages.len(),
                segmentations: segmentations.len(),
            });
        }

        let pages: Vec<Page> = pages
            .par_iter()
            .zip(segmentations.par_iter())
            .map(|(source, regions)| {
                let ad_blocks = self
                    .assembler
                    .assemble_segmented_page(&source.annotation, regions);
                self.finish_page(source, ad_blocks)
            })
            .collect();
        tracing::info!(name, pages = pages.len(), "assembled segmented flyer");
        Ok(build_flyer(pages, name))
    }

    fn finish_page(&self, source: &PageSource, ad_blocks: Vec<AdBlock>) -> Page {
        tracing::debug!(
            page = source.number,
            ad_blocks = ad_blocks.len(),
            "assembled page"
        );
        build_page(
            source.number,
            source.file_name.clone(),
            ad_blocks,
            &source.annotation,
            &self.rules,
        )
    }
}

pub fn export_flyer(flyer: &Flyer, output: &Path, formats: &[ExportFormat]) -> Result<()> {
    for format in formats {
        match format {
            ExportFormat::Json => JsonExporter::new(output.to_path_buf()).export(flyer)?,
            ExportFormat::Text => TextExporter::new(output.to_path_buf()).export(flyer)?,
        }
    }
    Ok(())
}
