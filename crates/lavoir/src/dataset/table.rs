//! The shared in-memory dataset and its two interchangeable shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// One row in record shape: column name to cell value, insertion order
/// significant.
pub type Record = IndexMap<String, Cell>;

/// Matrix shape: row 0 is the header (text cells), every subsequent row is
/// a sequence of cells aligned positionally to the header.
pub type Matrix = Vec<Vec<Cell>>;

/// The in-memory table shared by ingestion, rule application and display.
///
/// `columns` is the ordered header; `rows` hold one record per data row.
/// Duplicate column names are tolerated (lookups resolve to the first
/// match) and a record's key set is expected to be a subset of `columns`;
/// columns absent from a record read as empty cells. Both conversions
/// below fill missing cells with `Cell::Empty` rather than erroring, and
/// that fill is the documented contract for ragged input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Ordered data rows.
    pub rows: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from an explicit header and record list.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Build a dataset from matrix shape. Row 0 must be the header row;
    /// data rows shorter than the header are padded with empty cells and
    /// longer rows are truncated to the header width.
    pub fn from_matrix(matrix: &Matrix) -> Self {
        let Some(header) = matrix.first() else {
            return Self::default();
        };

        let columns: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();

        let rows = matrix[1..]
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| (name.clone(), row.get(idx).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Build a dataset from a record list, taking the column order from the
    /// first record. This is how backend replies are folded into the model.
    pub fn from_records(rows: Vec<Record>) -> Self {
        let columns = rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    /// Convert to matrix shape: header row followed by one row per record,
    /// each cell fetched by column name (missing key = empty cell).
    pub fn to_matrix(&self) -> Matrix {
        let header: Vec<Cell> = self.columns.iter().map(|c| Cell::text(c.clone())).collect();

        let mut matrix = Vec::with_capacity(self.rows.len() + 1);
        matrix.push(header);
        for record in &self.rows {
            matrix.push(
                self.columns
                    .iter()
                    .map(|name| record.get(name).cloned().unwrap_or_default())
                    .collect(),
            );
        }
        matrix
    }

    /// Number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row index and column name (first match on duplicate
    /// column names).
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Matrix {
        vec![
            vec![Cell::text("A"), Cell::text("B")],
            vec![Cell::text("1"), Cell::text("2")],
            vec![Cell::text("3"), Cell::text("4")],
        ]
    }

    #[test]
    fn test_from_matrix_basic() {
        let dataset = Dataset::from_matrix(&sample_matrix());
        assert_eq!(dataset.columns, vec!["A", "B"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.get(0, "A"), Some(&Cell::text("1")));
        assert_eq!(dataset.get(1, "B"), Some(&Cell::text("4")));
    }

    #[test]
    fn test_ragged_rows_fill_with_empty() {
        let matrix = vec![
            vec![Cell::text("A"), Cell::text("B"), Cell::text("C")],
            vec![Cell::text("1")],
        ];
        let dataset = Dataset::from_matrix(&matrix);
        assert_eq!(dataset.get(0, "B"), Some(&Cell::Empty));
        assert_eq!(dataset.get(0, "C"), Some(&Cell::Empty));
    }

    #[test]
    fn test_to_matrix_missing_key_is_empty() {
        let mut record = Record::new();
        record.insert("A".to_string(), Cell::text("1"));
        let dataset = Dataset::new(vec!["A".to_string(), "B".to_string()], vec![record]);

        let matrix = dataset.to_matrix();
        assert_eq!(matrix[1], vec![Cell::text("1"), Cell::Empty]);
    }

    #[test]
    fn test_round_trip_stability() {
        let dataset = Dataset::from_matrix(&sample_matrix());
        let round_tripped = Dataset::from_matrix(&dataset.to_matrix());
        assert_eq!(dataset, round_tripped);
    }

    #[test]
    fn test_from_records_takes_columns_from_first() {
        let mut record = Record::new();
        record.insert("name".to_string(), Cell::text("Alice"));
        record.insert("age".to_string(), Cell::Number(30.0));
        let dataset = Dataset::from_records(vec![record]);
        assert_eq!(dataset.columns, vec!["name", "age"]);
    }

    #[test]
    fn test_empty_matrix_yields_empty_dataset() {
        let dataset = Dataset::from_matrix(&Vec::new());
        assert!(dataset.columns.is_empty());
        assert!(dataset.is_empty());
    }
}
