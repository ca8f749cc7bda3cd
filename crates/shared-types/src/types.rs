use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Code -> raw value pairs read from a single page (or a single text unit).
///
/// Codes are trimmed on insert. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageExtraction {
    entries: IndexMap<String, String>,
}

impl PageExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for a code, replacing any earlier value for the same code
    pub fn insert(&mut self, code: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(code.as_ref().trim().to_string(), value.into());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for PageExtraction {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut page = PageExtraction::new();
        for (code, value) in iter {
            page.insert(code, value);
        }
        page
    }
}

// Deserialized keys go through `insert` so they are trimmed like any other
impl<'de> Deserialize<'de> for PageExtraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Code -> value pairs for a whole document, merged across pages.
///
/// A code keeps the position where it was first seen; a later write for the
/// same code replaces the value only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MergedExtraction {
    entries: IndexMap<String, String>,
}

impl MergedExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(code.as_ref().trim().to_string(), value.into());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for MergedExtraction {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut merged = MergedExtraction::new();
        for (code, value) in iter {
            merged.insert(code, value);
        }
        merged
    }
}

impl<'de> Deserialize<'de> for MergedExtraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Result of mapping one document through a dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    pub dictionary: String,
    /// Cell id -> value, in emission order
    pub mapped: IndexMap<String, String>,
    pub warnings: Vec<String>,
}

impl MappingReport {
    pub fn new(dictionary: &str) -> Self {
        Self {
            dictionary: dictionary.to_string(),
            mapped: IndexMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Rows for the `cell_id,value` output file, in emission order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapped.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A mapping dictionary discovered on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryInfo {
    pub name: String,
    pub path: std::path::PathBuf,
    /// Contents of the sibling `<NAME>_map.txt`, empty when absent
    pub description: String,
}
