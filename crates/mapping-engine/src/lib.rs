//! Code-to-cell mapping for extracted financial statements
//!
//! Recognizer output is normalized page by page (parenthetical sign
//! correction), merged into one document table, then resolved through a
//! named mapping table into destination cell ids. Codes with no cell become
//! warnings unless they are on the safe list.

pub mod cache;
pub mod codes;
pub mod config;
pub mod error;
pub mod extractors;
pub mod merge;
pub mod patterns;
pub mod pipeline;
pub mod recognizer;
pub mod safe_list;
pub mod table;

pub use cache::TableCache;
pub use config::PipelineConfig;
pub use error::{MappingError, PipelineError, RecognizerError, ValueParseError};
pub use extractors::{
    normalize_value, resolve_parentheticals, ParentheticalFlags, ParentheticalResolver,
    SignExceptions, ValueNormalizer,
};
pub use merge::merge_pages;
pub use pipeline::{PageInput, Pipeline};
pub use recognizer::{parse_recognizer_reply, Recognizer};
pub use safe_list::SafeList;
pub use table::{MappingTable, TableLoader, TableSchema};

use indexmap::IndexMap;
use shared_types::{MappingReport, MergedExtraction};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Resolves merged extractions through mapping tables
#[derive(Debug, Clone)]
pub struct MappingEngine {
    loader: TableLoader,
    safe_list: SafeList,
    cache: Option<Arc<TableCache>>,
    strict_collisions: bool,
}

impl MappingEngine {
    pub fn new(loader: TableLoader) -> Self {
        Self {
            loader,
            safe_list: SafeList::default(),
            cache: None,
            strict_collisions: false,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.table_loader())
            .with_safe_list(config.safe_list())
            .with_strict_collisions(config.strict_collisions)
    }

    pub fn with_safe_list(mut self, safe_list: SafeList) -> Self {
        self.safe_list = safe_list;
        self
    }

    /// Reuse loaded tables across calls
    pub fn with_cache(mut self, cache: Arc<TableCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Also warn when a code overwrites a cell another code already set
    pub fn with_strict_collisions(mut self, strict: bool) -> Self {
        self.strict_collisions = strict;
        self
    }

    pub fn loader(&self) -> &TableLoader {
        &self.loader
    }

    pub fn safe_list(&self) -> &SafeList {
        &self.safe_list
    }

    pub fn load_table(&self, dictionary: &str) -> Result<Arc<MappingTable>, MappingError> {
        match &self.cache {
            Some(cache) => cache.get_or_load(&self.loader, dictionary),
            None => self.loader.load(dictionary).map(Arc::new),
        }
    }

    /// Map every code to its cell.
    ///
    /// Returns cell id -> value in emission order, plus warnings in the order
    /// codes were encountered. Only a table that cannot be loaded is an error.
    pub fn map_to_cells(
        &self,
        merged: &MergedExtraction,
        dictionary: &str,
    ) -> Result<(IndexMap<String, String>, Vec<String>), MappingError> {
        info!(
            dictionary = %dictionary,
            "Mapping {} extracted items to cell IDs",
            merged.len()
        );
        let table = self.load_table(dictionary)?;

        let mut mapped = IndexMap::new();
        let mut warnings = Vec::new();
        let mut writers: HashMap<String, String> = HashMap::new();

        for (code, value) in merged.iter() {
            let code = code.trim();
            if value.trim().is_empty() {
                continue;
            }
            match table.get(code) {
                Some(cell_id) => {
                    if let Some(previous) = writers.insert(cell_id.to_string(), code.to_string()) {
                        if previous != code {
                            warn!(
                                cell = %cell_id,
                                code = %code,
                                previous = %previous,
                                "Cell overwritten"
                            );
                            if self.strict_collisions {
                                warnings.push(format!(
                                    "Code {} overwrote cell {} previously set by code {}.",
                                    code, cell_id, previous
                                ));
                            }
                        }
                    }
                    mapped.insert(cell_id.to_string(), value.to_string());
                }
                None if self.safe_list.is_safe_listed(code) => continue,
                None => {
                    warnings.push(format!("Code {} not found in {} mapping.", code, dictionary));
                }
            }
        }

        Ok((mapped, warnings))
    }

    /// Map a document and package the result
    pub fn process_document(
        &self,
        merged: &MergedExtraction,
        dictionary: &str,
    ) -> Result<MappingReport, MappingError> {
        let (mapped, warnings) = self.map_to_cells(merged, dictionary)?;
        info!(
            dictionary = %dictionary,
            mapped = mapped.len(),
            warnings = warnings.len(),
            "Mapped items to cell IDs"
        );

        let mut report = MappingReport::new(dictionary);
        report.mapped = mapped;
        report.warnings = warnings;
        Ok(report)
    }
}
