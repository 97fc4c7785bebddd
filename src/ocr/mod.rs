pub mod annotation;
pub mod vision;

use std::path::Path;

use crate::core::errors::Result;

pub use annotation::{Annotation, AnnotationLevel, HierarchicalAnnotation};

/// Source of per-page annotation trees.
pub trait OcrSource {
    fn load_pages(&self, path: &Path) -> Result<Vec<HierarchicalAnnotation>>;
}

/// Reads saved Cloud Vision responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisionJsonSource;

impl OcrSource for VisionJsonSource {
    fn load_pages(&self, path: &Path) -> Result<Vec<HierarchicalAnnotation>> {
        let response = vision::load_vision_response(path)?;
        let pages = vision::response_to_pages(&response);
        tracing::debug!(path = %path.display(), pages = pages.len(), "loaded vision response");
        Ok(pages)
    }
}
