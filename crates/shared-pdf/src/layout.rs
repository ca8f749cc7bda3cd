//! Layout text extraction
//!
//! The recognizer reads digits from page images well but loses formatting
//! cues such as parentheses. The text layer of the source PDF keeps them, so
//! the mapping core asks for the plain text of each page through
//! [`LayoutTextSource`].

use crate::error::PdfError;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

/// Supplies the plain text of one page of a source document
pub trait LayoutTextSource {
    /// Text of `page` (1-indexed), or an empty string when none is available
    fn extract_text(&self, document: &Path, page: u32) -> String;
}

/// Layout text read from the PDF text layer with lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLayoutText;

impl PdfLayoutText {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`LayoutTextSource::extract_text`] but keeps the failure
    pub fn try_extract_text(&self, document: &Path, page: u32) -> Result<String, PdfError> {
        if page == 0 {
            return Err(PdfError::InvalidPageSelection(
                "Page numbers must be >= 1".into(),
            ));
        }

        let doc = Document::load(document).map_err(|e| PdfError::ParseError(e.to_string()))?;
        let page_total = doc.get_pages().len() as u32;
        if page > page_total {
            return Err(PdfError::InvalidPageSelection(format!(
                "Page {} does not exist (document has {} pages)",
                page, page_total
            )));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::OperationError(format!("Text extraction failed: {}", e)))
    }
}

impl LayoutTextSource for PdfLayoutText {
    fn extract_text(&self, document: &Path, page: u32) -> String {
        match self.try_extract_text(document, page) {
            Ok(text) => {
                debug!(page, chars = text.len(), "Extracted layout text");
                text
            }
            Err(e) => {
                warn!(page, error = %e, document = %document.display(), "Layout text unavailable");
                String::new()
            }
        }
    }
}

/// Number of pages in a PDF file
pub fn page_count(document: &Path) -> Result<u32, PdfError> {
    let doc = Document::load(document).map_err(|e| PdfError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}
