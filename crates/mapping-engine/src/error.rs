use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole mapping call
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Mapping file not found for dictionary '{dictionary}' in {}", dir.display())]
    NotFound { dictionary: String, dir: PathBuf },

    #[error("Malformed mapping table {}: {reason}", path.display())]
    MalformedTable { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid code pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A raw value that does not read as a whole amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot parse '{raw}' as an integer amount")]
pub struct ValueParseError {
    pub raw: String,
}

#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Unexpected recognizer reply: {0}")]
    MalformedReply(String),

    #[error("Recognizer reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recognizer call failed: {0}")]
    Service(String),
}

/// Failures while driving a whole document through the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Pdf(#[from] shared_pdf::PdfError),

    #[error("Page {page}: {source}")]
    Recognizer {
        page: u32,
        #[source]
        source: RecognizerError,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}
