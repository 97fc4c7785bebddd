pub mod json_export;
pub mod text_export;

use anyhow::Result;

use crate::core::model::Flyer;

pub use json_export::JsonExporter;
pub use text_export::TextExporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

pub trait Exporter {
    fn export(&self, flyer: &Flyer) -> Result<()>;
}
