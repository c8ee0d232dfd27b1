//! File ingestion: raw bytes to the tabular data model.
//!
//! Dispatch is by case-insensitive file extension: `csv` parses as
//! delimited text with the first row as header; `xlsx`/`xls` parse as a
//! workbook (first sheet only) with an injectable header strategy. The
//! whole file is buffered before parsing; there is no streaming path.

mod delimited;
mod header;
mod source;
mod workbook;

pub use header::{HeaderStrategy, DEFAULT_SENTINEL};
pub use source::SourceMetadata;

use std::fs;
use std::path::Path;

use log::debug;
use sha2::{Digest, Sha256};

use crate::dataset::{Cell, Dataset};
use crate::error::{LavoirError, Result};

/// Ingestion configuration.
#[derive(Debug, Clone, Default)]
pub struct IngestConfig {
    /// Header strategy for the workbook path. CSV always uses the first row.
    pub header: HeaderStrategy,
}

/// An ingested dataset plus its source metadata.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub dataset: Dataset,
    pub source: SourceMetadata,
}

/// Converts uploaded files into datasets.
pub struct Ingester {
    config: IngestConfig,
}

impl Ingester {
    /// Create an ingester with the default (sentinel) header strategy.
    pub fn new() -> Self {
        Self {
            config: IngestConfig::default(),
        }
    }

    /// Create an ingester with custom configuration.
    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Ingest a file from disk.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> Result<Ingested> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| LavoirError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.ingest_bytes(path, &bytes)
    }

    /// Ingest raw bytes under a file name; the extension picks the parser.
    pub fn ingest_bytes(&self, path: impl AsRef<Path>, bytes: &[u8]) -> Result<Ingested> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let (columns, rows, header_row) = match extension.as_str() {
            "csv" => {
                let (columns, rows) = delimited::parse(bytes, path)?;
                (columns, rows, 0)
            }
            "xlsx" | "xls" => workbook::parse(bytes, path, &self.config.header)?,
            other => return Err(LavoirError::UnsupportedFileType(other.to_string())),
        };

        debug!(
            "ingested '{}': header row {}, {} column(s), {} row(s)",
            path.display(),
            header_row,
            columns.len(),
            rows.len()
        );

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            bytes.len() as u64,
            extension,
            header_row,
            rows.len(),
            columns.len(),
        );

        let dataset = assemble(columns, rows);
        Ok(Ingested { dataset, source })
    }
}

impl Default for Ingester {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the dataset from an already-aligned header and rows.
fn assemble(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Dataset {
    let records = rows
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .cloned()
                .zip(row)
                .collect()
        })
        .collect();
    Dataset::new(columns, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_ingestion_matches_model() {
        let ingester = Ingester::new();
        let ingested = ingester.ingest_bytes("clients.csv", b"A,B\n1,2\n").unwrap();

        assert_eq!(ingested.dataset.columns, vec!["A", "B"]);
        assert_eq!(ingested.dataset.row_count(), 1);
        assert_eq!(ingested.dataset.get(0, "A"), Some(&Cell::text("1")));
        assert_eq!(ingested.dataset.get(0, "B"), Some(&Cell::text("2")));
        assert_eq!(ingested.source.format, "csv");
        assert_eq!(ingested.source.header_row, 0);
    }

    #[test]
    fn test_extension_dispatch_is_case_insensitive() {
        let ingester = Ingester::new();
        assert!(ingester.ingest_bytes("DATA.CSV", b"A\n1\n").is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let ingester = Ingester::new();
        let err = ingester.ingest_bytes("notes.txt", b"hello").unwrap_err();
        assert!(matches!(err, LavoirError::UnsupportedFileType(ext) if ext == "txt"));
    }

    #[test]
    fn test_metadata_hash_is_stable() {
        let ingester = Ingester::new();
        let a = ingester.ingest_bytes("a.csv", b"A\n1\n").unwrap();
        let b = ingester.ingest_bytes("b.csv", b"A\n1\n").unwrap();
        assert_eq!(a.source.hash, b.source.hash);
        assert!(a.source.hash.starts_with("sha256:"));
    }
}
