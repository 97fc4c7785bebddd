use anyhow::Result;

use crate::core::model::ProductCategory;

/// Category lookup for an assembled product name.
pub trait ProductClassifier: Send + Sync {
    fn classify(&self, name: &str) -> Result<Option<ProductCategory>>;
}

/// Leaves every product uncategorized.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassifier;

impl ProductClassifier for NoopClassifier {
    fn classify(&self, _name: &str) -> Result<Option<ProductCategory>> {
        Ok(None)
    }
}
