//! Page rasterization
//!
//! The recognizer works on page images. [`PdftocairoRasterizer`] drives the
//! poppler `pdftocairo` binary one page at a time so the images come back in
//! the order the pages were requested.

use crate::error::PdfError;
use crate::layout::page_count;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{error, info};

/// Renders document pages to image files
pub trait Rasterizer {
    /// One image per page, in the order of `pages`. `None` renders every page.
    fn render(&self, document: &Path, pages: Option<&[u32]>) -> Result<Vec<PathBuf>, PdfError>;
}

/// Rasterizer backed by poppler's `pdftocairo`
#[derive(Debug, Clone)]
pub struct PdftocairoRasterizer {
    binary: PathBuf,
    output_dir: PathBuf,
    dpi: u32,
}

impl PdftocairoRasterizer {
    /// Default resolution; high enough for the recognizer to read small print
    pub const DEFAULT_DPI: u32 = 300;

    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("pdftocairo"),
            output_dir: output_dir.into(),
            dpi: Self::DEFAULT_DPI,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Use a specific `pdftocairo` executable instead of the one on `PATH`
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    fn render_page(&self, document: &Path, page: u32) -> Result<PathBuf, PdfError> {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        let prefix = self.output_dir.join(format!("{}_page_{}", stem, page));
        let page_arg = page.to_string();

        let output = Command::new(&self.binary)
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg(document)
            .arg(&prefix)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => PdfError::ToolNotAvailable(format!(
                    "{} not found; please install poppler",
                    self.binary.display()
                )),
                _ => PdfError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(page, status = ?output.status, stderr = %stderr.trim(), "pdftocairo failed");
            return Err(PdfError::OperationError(format!(
                "pdftocairo failed on page {}: {}",
                page,
                stderr.trim()
            )));
        }

        Ok(prefix.with_extension("png"))
    }
}

impl Rasterizer for PdftocairoRasterizer {
    fn render(&self, document: &Path, pages: Option<&[u32]>) -> Result<Vec<PathBuf>, PdfError> {
        info!(document = %document.display(), ?pages, "Converting PDF to images");

        let total = page_count(document)?;
        let selected: Vec<u32> = match pages {
            Some(pages) if !pages.is_empty() => pages.to_vec(),
            _ => (1..=total).collect(),
        };

        for &page in &selected {
            if page == 0 || page > total {
                return Err(PdfError::InvalidPageSelection(format!(
                    "Page {} does not exist (document has {} pages)",
                    page, total
                )));
            }
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let mut images = Vec::with_capacity(selected.len());
        for page in selected {
            images.push(self.render_page(document, page)?);
        }

        info!(count = images.len(), "Generated images from PDF");
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_pdf;

    #[test]
    fn test_rejects_pages_outside_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "two.pdf", &[vec!["a"], vec!["b"]]);
        let rasterizer = PdftocairoRasterizer::new(dir.path().join("out"));

        let result = rasterizer.render(&path, Some(&[1, 3]));
        assert!(matches!(result, Err(PdfError::InvalidPageSelection(_))));

        let result = rasterizer.render(&path, Some(&[0]));
        assert!(matches!(result, Err(PdfError::InvalidPageSelection(_))));
    }

    #[test]
    fn test_missing_binary_reports_tool_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "one.pdf", &[vec!["a"]]);
        let rasterizer = PdftocairoRasterizer::new(dir.path().join("out"))
            .with_binary("/nonexistent/bin/pdftocairo");

        let result = rasterizer.render(&path, None);
        assert!(matches!(result, Err(PdfError::ToolNotAvailable(_))));
    }

    #[test]
    fn test_unreadable_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = PdftocairoRasterizer::new(dir.path());
        let result = rasterizer.render(&dir.path().join("missing.pdf"), None);
        assert!(matches!(result, Err(PdfError::ParseError(_))));
    }
}
