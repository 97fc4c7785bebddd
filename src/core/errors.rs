use thiserror::Error;

/// Caller-visible failures. Rule-level misses never become errors; they are
/// reported as absent components instead.
#[derive(Debug, Error)]
pub enum FlyerError {
    #[error("invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("got {segmentations} segmentation lists for {pages} pages")]
    SegmentationMismatch { pages: usize, segmentations: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FlyerError {
    pub fn invalid_pattern(name: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlyerError>;
