//! Rule engine: applies one cleaning rule to one dataset in matrix shape,
//! synchronously and without external calls.

use std::collections::HashSet;

use log::debug;

use crate::dataset::Matrix;
use crate::error::{LavoirError, Result};

use super::rule::{CleaningRule, RuleKind};

/// Engine for applying cleaning rules to matrix-shaped data.
pub struct RuleEngine;

impl RuleEngine {
    /// Create a new rule engine.
    pub fn new() -> Self {
        Self
    }

    /// Apply `rule` to `matrix`, returning a new matrix (header row plus
    /// surviving rows). The input is never mutated.
    pub fn apply(&self, rule: &CleaningRule, matrix: &Matrix) -> Result<Matrix> {
        if rule.column.trim().is_empty() {
            return Err(LavoirError::MalformedRule(
                "rule has no target column".to_string(),
            ));
        }
        if matrix.is_empty() {
            return Err(LavoirError::EmptyDataset(
                "no rows to apply the rule to".to_string(),
            ));
        }

        match rule.kind {
            RuleKind::DeleteRows => self.delete_rows(rule, matrix),
            RuleKind::Deduplicate => self.deduplicate(rule, matrix),
            RuleKind::FormatColumn => Err(LavoirError::MalformedRule(
                "format_column rules are reserved and not executable".to_string(),
            )),
        }
    }

    fn delete_rows(&self, rule: &CleaningRule, matrix: &Matrix) -> Result<Matrix> {
        let value = match rule.value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_lowercase(),
            _ => {
                return Err(LavoirError::MalformedRule(
                    "delete_rows requires a comparison value".to_string(),
                ));
            }
        };

        let (header_index, column_index) = self.resolve_column(&rule.column, matrix)?;
        let header = matrix[header_index].clone();

        let kept: Vec<_> = matrix[header_index + 1..]
            .iter()
            .filter(|row| match row.get(column_index) {
                Some(cell) => cell.normalized() != value,
                // A row too short to carry the cell cannot match.
                None => true,
            })
            .cloned()
            .collect();

        debug!(
            "delete_rows on '{}': {} -> {} row(s)",
            rule.column,
            matrix.len() - header_index - 1,
            kept.len()
        );

        let mut result = Vec::with_capacity(kept.len() + 1);
        result.push(header);
        result.extend(kept);
        Ok(result)
    }

    fn deduplicate(&self, rule: &CleaningRule, matrix: &Matrix) -> Result<Matrix> {
        let (header_index, column_index) = self.resolve_column(&rule.column, matrix)?;
        let header = matrix[header_index].clone();

        let mut seen = HashSet::new();
        let kept: Vec<_> = matrix[header_index + 1..]
            .iter()
            .filter(|row| {
                let key = row
                    .get(column_index)
                    .map(|cell| cell.normalized())
                    .unwrap_or_default();
                seen.insert(key)
            })
            .cloned()
            .collect();

        debug!(
            "deduplicate on '{}': {} -> {} row(s)",
            rule.column,
            matrix.len() - header_index - 1,
            kept.len()
        );

        let mut result = Vec::with_capacity(kept.len() + 1);
        result.push(header);
        result.extend(kept);
        Ok(result)
    }

    /// Locate the effective header row and the target column within it.
    ///
    /// Every row is scanned, not just row 0: noisy source files sometimes
    /// carry a title row above the header, so the first row containing a
    /// cell equal to the target column name (normalized) is the header.
    fn resolve_column(&self, column: &str, matrix: &Matrix) -> Result<(usize, usize)> {
        let target = column.trim().to_lowercase();

        let header_index = matrix
            .iter()
            .position(|row| row.iter().any(|cell| cell.normalized() == target))
            .ok_or_else(|| LavoirError::ColumnNotFound {
                column: column.to_string(),
                headers: matrix
                    .first()
                    .map(|row| row.iter().map(|c| c.to_string()).collect())
                    .unwrap_or_default(),
            })?;

        // The scan above guarantees the cell exists in this row.
        let column_index = matrix[header_index]
            .iter()
            .position(|cell| cell.normalized() == target)
            .expect("header row contains the target column");

        Ok((header_index, column_index))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::text(*c)).collect()
    }

    fn supplier_matrix() -> Matrix {
        vec![
            row(&["FOURNISSEUR", "EMAIL"]),
            row(&["Acme", "a@acme.fr"]),
            row(&["TEST", "t@test.fr"]),
            row(&["Globex", "g@globex.fr"]),
        ]
    }

    #[test]
    fn test_delete_rows_removes_matching_only() {
        let engine = RuleEngine::new();
        let rule = CleaningRule::delete_rows("FOURNISSEUR", "TEST");
        let result = engine.apply(&rule, &supplier_matrix()).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[1][0], Cell::text("Acme"));
        assert_eq!(result[2][0], Cell::text("Globex"));
    }

    #[test]
    fn test_matching_is_case_and_whitespace_insensitive() {
        let engine = RuleEngine::new();
        let rule = CleaningRule::delete_rows(" fournisseur ", " test ");
        let result = engine.apply(&rule, &supplier_matrix()).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_header_may_not_be_first_row() {
        let engine = RuleEngine::new();
        let matrix = vec![
            row(&["Rapport mensuel"]),
            row(&["FOURNISSEUR", "EMAIL"]),
            row(&["TEST", "t@test.fr"]),
            row(&["Acme", "a@acme.fr"]),
        ];
        let rule = CleaningRule::delete_rows("FOURNISSEUR", "TEST");
        let result = engine.apply(&rule, &matrix).unwrap();

        // Header row is preserved; the title row above it is dropped.
        assert_eq!(result[0], row(&["FOURNISSEUR", "EMAIL"]));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_column_not_found_names_headers() {
        let engine = RuleEngine::new();
        let rule = CleaningRule::delete_rows("SIRET", "x");
        let err = engine.apply(&rule, &supplier_matrix()).unwrap_err();
        match err {
            LavoirError::ColumnNotFound { column, headers } => {
                assert_eq!(column, "SIRET");
                assert_eq!(headers, vec!["FOURNISSEUR", "EMAIL"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_value_is_malformed() {
        let engine = RuleEngine::new();
        let mut rule = CleaningRule::delete_rows("FOURNISSEUR", "TEST");
        rule.value = Some("  ".to_string());
        assert!(matches!(
            engine.apply(&rule, &supplier_matrix()),
            Err(LavoirError::MalformedRule(_))
        ));
    }

    #[test]
    fn test_empty_matrix_is_rejected() {
        let engine = RuleEngine::new();
        let rule = CleaningRule::delete_rows("A", "x");
        assert!(matches!(
            engine.apply(&rule, &Vec::new()),
            Err(LavoirError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let engine = RuleEngine::new();
        let matrix = supplier_matrix();
        let rule = CleaningRule::delete_rows("FOURNISSEUR", "TEST");
        let _ = engine.apply(&rule, &matrix).unwrap();
        assert_eq!(matrix, supplier_matrix());
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let engine = RuleEngine::new();
        let matrix = vec![
            row(&["Email"]),
            row(&["a@x.fr"]),
            row(&["B@x.fr"]),
            row(&["A@X.FR"]),
            row(&["c@x.fr"]),
        ];
        let rule = CleaningRule::deduplicate("email");
        let result = engine.apply(&rule, &matrix).unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result[1][0], Cell::text("a@x.fr"));
        assert_eq!(result[2][0], Cell::text("B@x.fr"));
        assert_eq!(result[3][0], Cell::text("c@x.fr"));
    }

    #[test]
    fn test_format_column_is_not_executable() {
        let engine = RuleEngine::new();
        let rule = CleaningRule {
            kind: RuleKind::FormatColumn,
            column: "EMAIL".to_string(),
            value: None,
            format: Some("lowercase".to_string()),
        };
        assert!(matches!(
            engine.apply(&rule, &supplier_matrix()),
            Err(LavoirError::MalformedRule(_))
        ));
    }

    #[test]
    fn test_short_rows_pass_through_delete() {
        let engine = RuleEngine::new();
        let matrix = vec![
            row(&["A", "B"]),
            vec![Cell::text("1")],
            row(&["x", "drop"]),
        ];
        let rule = CleaningRule::delete_rows("B", "drop");
        let result = engine.apply(&rule, &matrix).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1], vec![Cell::text("1")]);
    }
}
