//! CSV ingestion.

use std::path::Path;

use crate::dataset::Cell;
use crate::error::{LavoirError, Result};

/// Parse CSV bytes into a trimmed header and data rows.
///
/// The first row is always the header; data rows are padded or truncated to
/// the header width so downstream code never sees ragged rows.
pub(crate) fn parse(bytes: &[u8], path: &Path) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(|s| s.trim().to_string()).collect(),
        Some(Err(e)) => {
            return Err(LavoirError::FileRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
        None => {
            return Err(LavoirError::FileRead {
                path: path.to_path_buf(),
                message: "file is empty".to_string(),
            });
        }
    };

    let expected_cols = header.len();
    let mut rows = Vec::new();

    for result in records {
        let record = result.map_err(|e| LavoirError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut row: Vec<Cell> = record.iter().map(Cell::text).collect();
        while row.len() < expected_cols {
            row.push(Cell::Empty);
        }
        row.truncate(expected_cols);
        rows.push(row);
    }

    Ok((header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse_str(content: &str) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
        parse(content.as_bytes(), &PathBuf::from("test.csv"))
    }

    #[test]
    fn test_parse_basic_csv() {
        let (header, rows) = parse_str("A,B\n1,2\n").unwrap();
        assert_eq!(header, vec!["A", "B"]);
        assert_eq!(rows, vec![vec![Cell::text("1"), Cell::text("2")]]);
    }

    #[test]
    fn test_header_cells_are_trimmed() {
        let (header, _) = parse_str(" A , B \nx,y\n").unwrap();
        assert_eq!(header, vec!["A", "B"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let (_, rows) = parse_str("A,B,C\n1\n").unwrap();
        assert_eq!(rows[0], vec![Cell::text("1"), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_long_rows_are_truncated() {
        let (_, rows) = parse_str("A,B\n1,2,3,4\n").unwrap();
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        assert!(parse_str("").is_err());
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let (header, rows) = parse_str("A,B\n").unwrap();
        assert_eq!(header.len(), 2);
        assert!(rows.is_empty());
    }
}
