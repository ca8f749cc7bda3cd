//! Mapping tables: code -> destination cell id
//!
//! Tables live in a mapping directory as `<NAME>_map.csv` (or `.tsv`), with a
//! header row and an optional `<NAME>_map.txt` description beside them.
//! Dictionary names match file names case-insensitively.

use crate::error::MappingError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_types::DictionaryInfo;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MAP_SUFFIX: &str = "_map";

/// Which columns hold the cell id and the code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    pub cell_id_column: usize,
    pub code_column: usize,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            cell_id_column: 0,
            code_column: 1,
        }
    }
}

impl TableSchema {
    pub fn required_columns(&self) -> usize {
        self.cell_id_column.max(self.code_column) + 1
    }

    pub fn validate(&self) -> Result<(), MappingError> {
        if self.cell_id_column == self.code_column {
            return Err(MappingError::Config(format!(
                "cell id and code cannot share column {}",
                self.code_column
            )));
        }
        Ok(())
    }
}

/// A loaded dictionary. Codes are unique and both sides are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    name: String,
    entries: IndexMap<String, String>,
}

impl MappingTable {
    /// Build a table from (code, cell id) pairs; later pairs win on duplicate codes
    pub fn from_pairs<I, C, V>(name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = IndexMap::new();
        for (code, cell_id) in pairs {
            let code = code.as_ref().trim();
            let cell_id = cell_id.as_ref().trim();
            if code.is_empty() || cell_id.is_empty() {
                continue;
            }
            entries.insert(code.to_string(), cell_id.to_string());
        }
        Self {
            name: name.to_string(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell id for a code
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    /// (code, cell id) pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The table as a pretty-printed JSON object of code -> cell id
    pub fn to_json_pretty(&self) -> Result<String, MappingError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Finds and parses mapping tables in one directory
#[derive(Debug, Clone)]
pub struct TableLoader {
    dir: PathBuf,
    schema: TableSchema,
}

impl TableLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            schema: TableSchema::default(),
        }
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn schema(&self) -> TableSchema {
        self.schema
    }

    /// Path of the table file for a dictionary name
    pub fn resolve_path(&self, dictionary: &str) -> Result<PathBuf, MappingError> {
        let not_found = || MappingError::NotFound {
            dictionary: dictionary.to_string(),
            dir: self.dir.clone(),
        };

        let wanted = dictionary.trim();
        if wanted.is_empty() {
            return Err(not_found());
        }

        let mut candidates: Vec<PathBuf> = table_files(&self.dir)
            .map_err(|_| not_found())?
            .into_iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, path)| path)
            .collect();
        candidates.sort();

        candidates.into_iter().next().ok_or_else(not_found)
    }

    /// Load a dictionary by name
    pub fn load(&self, dictionary: &str) -> Result<MappingTable, MappingError> {
        let path = self.resolve_path(dictionary)?;
        self.load_path(dictionary, &path)
    }

    /// Load a dictionary from an already resolved path
    pub fn load_path(&self, dictionary: &str, path: &Path) -> Result<MappingTable, MappingError> {
        self.schema.validate()?;

        let delimiter = match extension_of(path).as_deref() {
            Some("tsv") => b'\t',
            _ => b',',
        };
        let file = fs::File::open(path)?;
        let table = parse_table(dictionary, file, delimiter, self.schema).map_err(|e| match e {
            MappingError::MalformedTable { reason, .. } => MappingError::MalformedTable {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        info!(
            dictionary = %dictionary,
            path = %path.display(),
            "Loaded {} mappings",
            table.len()
        );
        Ok(table)
    }

    /// Every dictionary in the mapping directory, sorted by name
    pub fn list_available(&self) -> Result<Vec<DictionaryInfo>, MappingError> {
        let mut dictionaries: Vec<DictionaryInfo> = table_files(&self.dir)?
            .into_iter()
            .map(|(name, path)| {
                let description = fs::read_to_string(path.with_extension("txt"))
                    .map(|d| d.trim().to_string())
                    .unwrap_or_default();
                DictionaryInfo {
                    name,
                    path,
                    description,
                }
            })
            .collect();
        dictionaries.sort_by(|a, b| a.name.cmp(&b.name));
        dictionaries.dedup_by(|a, b| a.name.eq_ignore_ascii_case(&b.name));
        Ok(dictionaries)
    }
}

/// Parse a delimited table with a header row
pub(crate) fn parse_table<R: Read>(
    dictionary: &str,
    reader: R,
    delimiter: u8,
    schema: TableSchema,
) -> Result<MappingTable, MappingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = rdr.headers()?.len();
    if columns < schema.required_columns() {
        return Err(MappingError::MalformedTable {
            path: PathBuf::from(dictionary),
            reason: format!(
                "expected at least {} columns (cell id, code), found {}",
                schema.required_columns(),
                columns
            ),
        });
    }

    let mut pairs = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let cell_id = record.get(schema.cell_id_column).unwrap_or("");
        let code = record.get(schema.code_column).unwrap_or("");
        if cell_id.is_empty() || code.is_empty() {
            skipped += 1;
            continue;
        }
        pairs.push((code.to_string(), cell_id.to_string()));
    }
    if skipped > 0 {
        debug!(dictionary = %dictionary, skipped, "Skipped incomplete mapping rows");
    }

    Ok(MappingTable::from_pairs(dictionary, pairs))
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// (dictionary name, path) for every `*_map.csv|tsv` file in `dir`
fn table_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, MappingError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if !matches!(extension_of(&path).as_deref(), Some("csv") | Some("tsv")) {
            continue;
        }
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let lower = stem.to_ascii_lowercase();
        if !lower.ends_with(MAP_SUFFIX) || lower.len() == MAP_SUFFIX.len() {
            continue;
        }
        let name = stem[..stem.len() - MAP_SUFFIX.len()].to_string();
        found.push((name, path));
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_takes_cell_then_code() {
        let csv = "Cell ID,GIFI Code\nA1,1000\nA2,2599\n";
        let table = parse_table("GIFI", csv.as_bytes(), b',', TableSchema::default()).unwrap();
        assert_eq!(table.get("1000"), Some("A1"));
        assert_eq!(table.get("2599"), Some("A2"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_skips_incomplete_rows_and_trims() {
        let csv = "cell,code\n A1 , 1000 \n,2000\nA3,\nA4\nA5,5000\n";
        let table = parse_table("GIFI", csv.as_bytes(), b',', TableSchema::default()).unwrap();
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![("1000", "A1"), ("5000", "A5")]);
    }

    #[test]
    fn test_parse_last_row_wins() {
        let csv = "cell,code\nA1,1000\nB7,1000\n";
        let table = parse_table("GIFI", csv.as_bytes(), b',', TableSchema::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("1000"), Some("B7"));
    }

    #[test]
    fn test_parse_rejects_single_column() {
        let csv = "A\n1\n2\n3\n";
        let result = parse_table("BAD", csv.as_bytes(), b',', TableSchema::default());
        assert!(matches!(result, Err(MappingError::MalformedTable { .. })));
    }

    #[test]
    fn test_parse_rejects_empty_source() {
        let result = parse_table("EMPTY", "".as_bytes(), b',', TableSchema::default());
        assert!(matches!(result, Err(MappingError::MalformedTable { .. })));
    }

    #[test]
    fn test_custom_schema_columns() {
        let schema = TableSchema {
            cell_id_column: 2,
            code_column: 0,
        };
        assert_eq!(schema.required_columns(), 3);
        let csv = "code,label,cell\n1000,Cash,A1\n";
        let table = parse_table("T2S1", csv.as_bytes(), b',', schema).unwrap();
        assert_eq!(table.get("1000"), Some("A1"));

        let narrow = "code,label\n1000,Cash\n";
        assert!(parse_table("T2S1", narrow.as_bytes(), b',', schema).is_err());
    }

    #[test]
    fn test_schema_rejects_shared_column() {
        let schema = TableSchema {
            cell_id_column: 1,
            code_column: 1,
        };
        assert!(matches!(schema.validate(), Err(MappingError::Config(_))));
    }

    #[test]
    fn test_load_matches_name_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GIFI_map.csv", "cell,code\nA1,1000\n");
        let loader = TableLoader::new(dir.path());

        let table = loader.load("gifi").unwrap();
        assert_eq!(table.name(), "gifi");
        assert_eq!(table.get("1000"), Some("A1"));
    }

    #[test]
    fn test_load_tab_separated() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "T661_map.tsv", "cell\tcode\nL100\t0100\n");
        let table = TableLoader::new(dir.path()).load("T661").unwrap();
        assert_eq!(table.get("0100"), Some("L100"));
    }

    #[test]
    fn test_load_unknown_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GIFI_map.csv", "cell,code\nA1,1000\n");
        let loader = TableLoader::new(dir.path());

        assert!(matches!(
            loader.load("DOES_NOT_EXIST"),
            Err(MappingError::NotFound { .. })
        ));
        assert!(matches!(loader.load(""), Err(MappingError::NotFound { .. })));
    }

    #[test]
    fn test_load_missing_directory_is_not_found() {
        let loader = TableLoader::new("/nonexistent/mapping");
        assert!(matches!(
            loader.load("GIFI"),
            Err(MappingError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_malformed_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "BAD_map.csv", "A\n1\n2\n");
        match TableLoader::new(dir.path()).load("BAD") {
            Err(MappingError::MalformedTable { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected MalformedTable, got {:?}", other),
        }
    }

    #[test]
    fn test_list_available_with_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "GIFI_map.csv", "cell,code\nA1,1000\n");
        write(dir.path(), "GIFI_map.txt", "  General Index of Financial Information\n");
        write(dir.path(), "T2S1_map.tsv", "cell\tcode\nB1\t0001\n");
        write(dir.path(), "notes.csv", "a,b\n");
        write(dir.path(), "_map.csv", "a,b\n");

        let available = TableLoader::new(dir.path()).list_available().unwrap();
        let names: Vec<_> = available.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["GIFI", "T2S1"]);
        assert_eq!(
            available[0].description,
            "General Index of Financial Information"
        );
        assert_eq!(available[1].description, "");
    }

    #[test]
    fn test_json_export() {
        let table = MappingTable::from_pairs("GIFI", [("1000", "A1"), ("2000", "B2")]);
        let json: serde_json::Value =
            serde_json::from_str(&table.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["1000"], "A1");
        assert_eq!(json["2000"], "B2");
    }
}
