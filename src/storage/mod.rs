//! Dataset loading.
//!
//! The dataset is read once at startup and never written:
//! - `.jsonl`: one record per line
//! - `.json`: a single array of records

mod jsonl;

pub use jsonl::*;

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::ResultRecord;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Drop repeated entries for the same player, event and date, keeping the first.
pub fn dedup_records(records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    let mut seen = HashSet::new();
    let before = records.len();
    let unique: Vec<ResultRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.id()))
        .collect();
    if unique.len() < before {
        warn!("Dropped {} duplicate records", before - unique.len());
    }
    unique
}

/// Load and deduplicate the dataset at `path`.
pub fn load_records(path: &Path) -> Result<Vec<ResultRecord>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let records: Vec<ResultRecord> = match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") => JsonlReader::new(path.to_path_buf()).read_all()?,
        Some("json") => {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader)?
        }
        _ => return Err(StorageError::UnsupportedFormat(path.to_path_buf())),
    };

    let records = dedup_records(records);
    info!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const ROW: &str = r#"{"Date":"2024-03-02","Event":"Spring Open","EventType":"offline","Player":"Alice","Deck":"Red","Rank":1,"Wins":5,"Losses":0}"#;
    const OTHER: &str = r#"{"Date":"2024-03-02","Event":"Spring Open","EventType":"offline","Player":"Bob","Deck":"Red","Rank":2,"Wins":4,"Losses":1}"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        path
    }

    #[test]
    fn test_load_jsonl_dedups() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "results.jsonl", &format!("{}\n{}\n{}\n", ROW, OTHER, ROW));

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].player, "Alice");
    }

    #[test]
    fn test_load_json_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "results.json", &format!("[{},{}]", ROW, OTHER));

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_json_array_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "results.json", "[{]");
        assert!(matches!(load_records(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_load_missing_and_unsupported() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_records(&dir.path().join("missing.jsonl")),
            Err(StorageError::PathNotFound(_))
        ));

        let path = write(&dir, "results.csv", "Date,Event\n");
        assert!(matches!(
            load_records(&path),
            Err(StorageError::UnsupportedFormat(_))
        ));
    }
}
