//! Spreadsheet workbook ingestion (first sheet only).

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::dataset::Cell;
use crate::error::{LavoirError, Result};

use super::header::HeaderStrategy;

/// Parse workbook bytes into a trimmed header, data rows and the resolved
/// header row index.
pub(crate) fn parse(
    bytes: &[u8],
    path: &Path,
    strategy: &HeaderStrategy,
) -> Result<(Vec<String>, Vec<Vec<Cell>>, usize)> {
    let read_err = |message: String| LavoirError::FileRead {
        path: path.to_path_buf(),
        message,
    };

    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| read_err(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| read_err("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| read_err(e.to_string()))?;

    let raw_rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    let header_row = strategy
        .locate(&raw_rows)
        .ok_or_else(|| read_err(format!("no header row found in sheet '{}'", sheet_name)))?;

    let header: Vec<String> = raw_rows[header_row]
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let expected_cols = header.len();
    let rows: Vec<Vec<Cell>> = raw_rows[header_row + 1..]
        .iter()
        .map(|row| {
            let mut row = row.clone();
            while row.len() < expected_cols {
                row.push(Cell::Empty);
            }
            row.truncate(expected_cols);
            row
        })
        .collect();

    Ok((header, rows, header_row))
}

/// Map a calamine cell to the dataset scalar.
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::Text(naive.to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Cell::text(s.clone()),
        Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_scalars() {
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(
            convert_cell(&Data::String("Acme".to_string())),
            Cell::text("Acme")
        );
    }

    #[test]
    fn test_garbage_bytes_fail_as_file_read() {
        let err = parse(b"not a workbook", Path::new("x.xlsx"), &HeaderStrategy::FirstRow)
            .unwrap_err();
        assert!(matches!(err, LavoirError::FileRead { .. }));
    }
}
