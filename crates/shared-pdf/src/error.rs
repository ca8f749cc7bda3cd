use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("PDF conversion tools not installed: {0}")]
    ToolNotAvailable(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
