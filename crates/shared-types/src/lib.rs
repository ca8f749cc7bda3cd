pub mod types;

pub use types::{DictionaryInfo, MappingReport, MergedExtraction, PageExtraction};
