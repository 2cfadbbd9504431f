use std::path::PathBuf;
use thiserror::Error;

/// The main error type for annofeed operations.
#[derive(Debug, Error)]
pub enum AnnofeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset layout at {path}: {message}")]
    VocLayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to parse annotation XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to parse flat annotation file {path}: {source}")]
    FlatCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
