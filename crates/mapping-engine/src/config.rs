//! TOML configuration for the extraction pipeline
//!
//! Every field has a default, so an empty file (or no file) gives the GIFI
//! setup: tables in `./mapping`, four-digit codes, the maintained safe list
//! and sign exceptions.
//!
//! ```toml
//! mapping_dir = "/srv/taxmap/mapping"
//! default_dictionary = "GIFI"
//! strict_collisions = true
//!
//! [schema]
//! cell_id_column = 0
//! code_column = 1
//!
//! [rasterizer]
//! dpi = 300
//! ```

use crate::error::MappingError;
use crate::extractors::{ParentheticalResolver, SignExceptions, ValueNormalizer};
use crate::patterns::DEFAULT_CODE_PATTERN;
use crate::safe_list::SafeList;
use crate::table::{TableLoader, TableSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding `<NAME>_map.csv` tables
    pub mapping_dir: PathBuf,
    /// Dictionary used when the caller names none
    pub default_dictionary: String,
    /// Warn when two codes write the same cell
    pub strict_collisions: bool,
    /// Regex fragment matching a line-item code in layout text
    pub code_pattern: String,
    pub schema: TableSchema,
    /// Replaces the built-in safe list when set
    pub safe_list: Option<Vec<String>>,
    /// Replaces the built-in sign exceptions when set
    pub sign_exceptions: Option<Vec<String>>,
    pub rasterizer: RasterizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mapping_dir: PathBuf::from("mapping"),
            default_dictionary: "GIFI".to_string(),
            strict_collisions: false,
            code_pattern: DEFAULT_CODE_PATTERN.to_string(),
            schema: TableSchema::default(),
            safe_list: None,
            sign_exceptions: None,
            rasterizer: RasterizerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    pub dpi: u32,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self { dpi: 300 }
    }
}

impl FromStr for PipelineConfig {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: PipelineConfig =
            toml::from_str(s).map_err(|e| MappingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MappingError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        content.parse()
    }

    pub fn validate(&self) -> Result<(), MappingError> {
        self.schema.validate()?;
        if self.default_dictionary.trim().is_empty() {
            return Err(MappingError::Config(
                "default_dictionary cannot be empty".into(),
            ));
        }
        if self.rasterizer.dpi == 0 {
            return Err(MappingError::Config("rasterizer.dpi must be > 0".into()));
        }
        ParentheticalResolver::new(&self.code_pattern)?;
        Ok(())
    }

    pub fn table_loader(&self) -> TableLoader {
        TableLoader::new(&self.mapping_dir).with_schema(self.schema)
    }

    pub fn safe_list(&self) -> SafeList {
        match &self.safe_list {
            Some(codes) => SafeList::new(codes),
            None => SafeList::default(),
        }
    }

    pub fn sign_exceptions(&self) -> SignExceptions {
        match &self.sign_exceptions {
            Some(codes) => SignExceptions::new(codes),
            None => SignExceptions::default(),
        }
    }

    pub fn normalizer(&self) -> ValueNormalizer {
        ValueNormalizer::new(self.sign_exceptions())
    }

    pub fn resolver(&self) -> Result<ParentheticalResolver, MappingError> {
        ParentheticalResolver::new(&self.code_pattern)
    }
}
