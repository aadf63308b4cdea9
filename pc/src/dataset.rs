//! Reference dataset index
//!
//! Holds the records a lookup placeholder is resolved against. The index is
//! an explicit process-scoped cache: it reads its source file once, keeps the
//! result (possibly empty) and answers substring searches from memory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PromptError;

/// One entry of the reference dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub name: String,

    /// Grouping label such as a market; older dataset files call it `market`
    #[serde(default, alias = "market")]
    pub category: String,
}

impl Record {
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category: category.into(),
        }
    }

    /// Case-insensitive substring test against code or name.
    /// `needle` must already be lowercased.
    fn matches_lowered(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

/// Render a record the way it is inserted into a template: `{name}，{code}`
pub fn format_record(record: &Record) -> String {
    format!("{}，{}", record.name, record.code)
}

/// Read and parse a dataset file (a JSON array of records)
pub fn read_dataset(path: &Path) -> Result<Vec<Record>, PromptError> {
    debug!(?path, "read_dataset: called");
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => PromptError::NotFound {
            path: path.to_path_buf(),
            source,
        },
        _ => PromptError::Io(source),
    })?;

    serde_json::from_str(&content).map_err(|source| PromptError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Lazily loaded, read-only index over the dataset file
#[derive(Debug)]
pub struct DatasetIndex {
    source: PathBuf,
    records: Vec<Record>,
    loaded: bool,
    warning: Option<String>,
}

impl DatasetIndex {
    /// Create an unloaded index backed by `source`
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
            loaded: false,
            warning: None,
        }
    }

    /// Create an already-loaded index from in-memory records
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            source: PathBuf::new(),
            records,
            loaded: true,
            warning: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reason the last load came back empty, if it failed
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load the dataset on first call and return the cached records afterwards.
    ///
    /// A missing or malformed source yields an empty index and a warning; the
    /// failure is never returned to the caller and is not retried.
    pub fn load(&mut self) -> &[Record] {
        if self.loaded {
            return &self.records;
        }

        match read_dataset(&self.source) {
            Ok(records) => {
                info!(count = records.len(), source = %self.source.display(), "Loaded dataset");
                self.records = records;
            }
            Err(e) => {
                warn!(error = %e, "Dataset unavailable, continuing with an empty index");
                self.warning = Some(e.to_string());
                self.records = Vec::new();
            }
        }
        self.loaded = true;
        &self.records
    }

    /// Case-insensitive substring search over code and name.
    ///
    /// Matches keep dataset order and scanning stops once `limit` matches
    /// are collected. An empty query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Record> {
        debug!(%query, limit, "DatasetIndex::search: called");
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let mut results = Vec::new();
        for record in &self.records {
            if record.matches_lowered(&needle) {
                results.push(record);
                if results.len() >= limit {
                    break;
                }
            }
        }
        results
    }

    /// Find the record whose formatted form is exactly `text`
    pub fn find_formatted(&self, text: &str) -> Option<&Record> {
        self.records.iter().find(|r| format_record(r) == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn sample() -> DatasetIndex {
        DatasetIndex::from_records(vec![
            Record::new("AAPL", "苹果", "US"),
            Record::new("600519", "贵州茅台", "SH"),
            Record::new("00700", "腾讯控股", "HK"),
            Record::new("AMZN", "亚马逊", "US"),
            Record::new("MSFT", "微软", "US"),
        ])
    }

    #[test]
    fn test_format_record() {
        let record = Record::new("AAPL", "苹果", "US");
        assert_eq!(format_record(&record), "苹果，AAPL");
    }

    #[test]
    fn test_search_single_match() {
        let index = DatasetIndex::from_records(vec![Record::new("AAPL", "苹果", "US")]);
        let results = index.search("AAPL", 8);
        assert_eq!(results.len(), 1);
        assert_eq!(format_record(results[0]), "苹果，AAPL");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let index = sample();
        let results = index.search("aapl", 8);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "AAPL");
    }

    #[test]
    fn test_search_matches_name() {
        let index = sample();
        let results = index.search("茅台", 8);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "600519");
    }

    #[test]
    fn test_search_preserves_dataset_order() {
        let index = sample();
        let codes: Vec<&str> = index.search("a", 8).iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AAPL", "AMZN"]);
    }

    #[test]
    fn test_search_stops_at_limit() {
        let index = sample();
        let results = index.search("0", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "600519");
    }

    #[test]
    fn test_search_empty_query() {
        let index = sample();
        assert!(index.search("", 8).is_empty());
    }

    #[test]
    fn test_find_formatted() {
        let index = sample();
        assert_eq!(index.find_formatted("微软，MSFT").map(|r| r.code.as_str()), Some("MSFT"));
        assert!(index.find_formatted("微软").is_none());
    }

    #[test]
    fn test_load_reads_market_alias() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stocks.json");
        fs::write(&path, r#"[{"code": "AAPL", "name": "苹果", "market": "US"}, {"code": "X"}]"#).unwrap();

        let mut index = DatasetIndex::new(&path);
        assert!(!index.is_loaded());
        let records = index.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "US");
        assert_eq!(records[1].name, "");
        assert!(index.is_loaded());
        assert!(index.warning().is_none());
    }

    #[test]
    fn test_load_is_cached() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stocks.json");
        fs::write(&path, r#"[{"code": "AAPL", "name": "苹果", "category": "US"}]"#).unwrap();

        let mut index = DatasetIndex::new(&path);
        assert_eq!(index.load().len(), 1);

        fs::write(&path, "[]").unwrap();
        assert_eq!(index.load().len(), 1);
    }

    #[test]
    fn test_load_missing_file_degrades() {
        let temp = TempDir::new().unwrap();
        let mut index = DatasetIndex::new(temp.path().join("nope.json"));
        assert!(index.load().is_empty());
        assert!(index.is_loaded());
        assert!(index.warning().unwrap().contains("nope.json"));
    }

    #[test]
    fn test_load_malformed_file_degrades() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stocks.json");
        fs::write(&path, "{not json").unwrap();

        let mut index = DatasetIndex::new(&path);
        assert!(index.load().is_empty());
        assert!(index.warning().unwrap().starts_with("Malformed dataset"));
    }

    #[test]
    fn test_read_dataset_errors() {
        let temp = TempDir::new().unwrap();
        let missing = read_dataset(&temp.path().join("missing.json"));
        assert!(matches!(missing, Err(PromptError::NotFound { .. })));

        let path = temp.path().join("bad.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(read_dataset(&path), Err(PromptError::Malformed { .. })));
    }

    #[test]
    fn test_unreadable_dataset_is_not_reported_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stocks.json");
        fs::write(&path, [0xff, 0xfe, 0x5b]).unwrap();
        assert!(matches!(read_dataset(&path), Err(PromptError::Io(_))));

        let mut index = DatasetIndex::new(&path);
        assert!(index.load().is_empty());
        assert!(index.warning().unwrap().starts_with("IO error"));
    }

    proptest! {
        #[test]
        fn prop_search_respects_limit_and_matches(query in "[a-zA-Z0-9]{0,3}", limit in 0usize..6) {
            let index = sample();
            let results = index.search(&query, limit);
            prop_assert!(results.len() <= limit);
            let needle = query.to_lowercase();
            for r in results {
                prop_assert!(r.code.to_lowercase().contains(&needle) || r.name.to_lowercase().contains(&needle));
            }
        }
    }
}
