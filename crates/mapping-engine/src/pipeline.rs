//! Document pipeline
//!
//! Drives one document end to end: rasterize, recognize, correct signs from
//! the layout text, merge pages, map. Pages are handled one at a time and
//! merged strictly in the order they were requested, so a code reported on
//! two pages always takes the later page's value.

use crate::config::PipelineConfig;
use crate::error::{MappingError, PipelineError};
use crate::extractors::{ParentheticalResolver, ValueNormalizer};
use crate::merge::merge_pages;
use crate::recognizer::Recognizer;
use crate::MappingEngine;
use shared_pdf::{LayoutTextSource, Rasterizer};
use shared_types::{MappingReport, MergedExtraction, PageExtraction};
use std::path::Path;
use tracing::{debug, info};

/// Recognizer output for one page plus that page's layout text
#[derive(Debug, Clone, Default)]
pub struct PageInput {
    /// 1-indexed page number in the source document
    pub page_number: u32,
    pub raw: PageExtraction,
    /// `None` (or empty) when the layout text could not be read
    pub layout_text: Option<String>,
}

impl PageInput {
    pub fn new(page_number: u32, raw: PageExtraction) -> Self {
        Self {
            page_number,
            raw,
            layout_text: None,
        }
    }

    pub fn with_layout_text(mut self, text: impl Into<String>) -> Self {
        self.layout_text = Some(text.into());
        self
    }
}

pub struct Pipeline {
    resolver: ParentheticalResolver,
    normalizer: ValueNormalizer,
    engine: MappingEngine,
}

impl Pipeline {
    pub fn new(
        engine: MappingEngine,
        resolver: ParentheticalResolver,
        normalizer: ValueNormalizer,
    ) -> Self {
        Self {
            resolver,
            normalizer,
            engine,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, MappingError> {
        config.validate()?;
        Ok(Self::new(
            MappingEngine::from_config(config),
            config.resolver()?,
            config.normalizer(),
        ))
    }

    pub fn engine(&self) -> &MappingEngine {
        &self.engine
    }

    /// Apply the page's parenthetical evidence to its raw values
    pub fn normalize_page(&self, page: &PageInput) -> PageExtraction {
        let flags = page
            .layout_text
            .as_deref()
            .map(|text| self.resolver.resolve(text))
            .unwrap_or_default();
        debug!(
            page = page.page_number,
            parenthetical = flags.len(),
            "Found parenthetical values"
        );
        self.normalizer.normalize_page(&page.raw, &flags)
    }

    /// Normalize each page, then merge in the order given
    pub fn merge(&self, pages: &[PageInput]) -> MergedExtraction {
        let normalized: Vec<PageExtraction> =
            pages.iter().map(|page| self.normalize_page(page)).collect();
        merge_pages(&normalized)
    }

    /// Normalize, merge and map already-recognized pages
    pub fn process_pages(
        &self,
        pages: &[PageInput],
        dictionary: &str,
    ) -> Result<MappingReport, MappingError> {
        let merged = self.merge(pages);
        self.engine.process_document(&merged, dictionary)
    }

    /// Run a source document through rasterizer, recognizer and mapping.
    ///
    /// `pages` selects 1-indexed pages; `None` means the whole document. A
    /// recognizer failure stops the document; skipping bad pages is up to a
    /// caller that drives [`Pipeline::process_pages`] itself.
    pub fn run_document<R, C, L>(
        &self,
        rasterizer: &R,
        recognizer: &C,
        layout: &L,
        document: &Path,
        pages: Option<&[u32]>,
        dictionary: &str,
    ) -> Result<MappingReport, PipelineError>
    where
        R: Rasterizer + ?Sized,
        C: Recognizer + ?Sized,
        L: LayoutTextSource + ?Sized,
    {
        info!(
            document = %document.display(),
            ?pages,
            dictionary = %dictionary,
            "Processing document"
        );
        let images = rasterizer.render(document, pages)?;

        let mut inputs = Vec::with_capacity(images.len());
        for (idx, image) in images.iter().enumerate() {
            let page_number = pages
                .and_then(|p| p.get(idx).copied())
                .unwrap_or(idx as u32 + 1);

            let raw = recognizer
                .recognize(image)
                .map_err(|source| PipelineError::Recognizer {
                    page: page_number,
                    source,
                })?;
            info!(page = page_number, items = raw.len(), "Extracted data from page image");

            let text = layout.extract_text(document, page_number);
            inputs.push(PageInput::new(page_number, raw).with_layout_text(text));
        }

        Ok(self.process_pages(&inputs, dictionary)?)
    }
}
