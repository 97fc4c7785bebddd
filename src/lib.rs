pub mod assembly;
pub mod core;
pub mod export;
pub mod extract;
pub mod ocr;
pub mod pipeline;

pub use crate::core::config::FlyerConfig;
pub use crate::core::errors::FlyerError;
pub use crate::core::model::{AdBlock, Flyer, Page, Product};
pub use pipeline::{FlyerPipeline, PageSource};
