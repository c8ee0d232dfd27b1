//! Integration tests for the ingest-then-clean pipeline.

use std::io::Write;
use tempfile::Builder;
use tempfile::NamedTempFile;

use lavoir::dataset::{Cell, Dataset};
use lavoir::ingest::Ingester;
use lavoir::rules::{predefined_rules, CleaningRule, RuleEngine};
use lavoir::LavoirError;

/// Helper to create a temporary file with the given suffix and content.
fn create_test_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

// =============================================================================
// Ingestion
// =============================================================================

#[test]
fn test_ingest_csv_from_disk() {
    let file = create_test_file(".csv", "A,B\n1,2\n");

    let ingested = Ingester::new().ingest_file(file.path()).expect("ingestion failed");

    assert_eq!(ingested.dataset.columns, vec!["A", "B"]);
    assert_eq!(ingested.dataset.row_count(), 1);
    assert_eq!(ingested.dataset.get(0, "A"), Some(&Cell::text("1")));
    assert_eq!(ingested.dataset.get(0, "B"), Some(&Cell::text("2")));
    assert_eq!(ingested.source.format, "csv");
    assert_eq!(ingested.source.row_count, 1);
    assert_eq!(ingested.source.column_count, 2);
}

#[test]
fn test_ingest_rejects_unknown_extension() {
    let file = create_test_file(".parquet", "whatever");

    let err = Ingester::new().ingest_file(file.path()).unwrap_err();
    assert!(matches!(err, LavoirError::UnsupportedFileType(_)));
}

#[test]
fn test_ingest_missing_file_is_io_error() {
    let err = Ingester::new()
        .ingest_file("/nonexistent/fournisseurs.csv")
        .unwrap_err();
    assert!(matches!(err, LavoirError::Io { .. }));
}

// =============================================================================
// Full pipeline: ingest, convert, clean, convert back
// =============================================================================

#[test]
fn test_ingest_then_apply_catalog_rule() {
    let file = create_test_file(
        ".csv",
        "FOURNISSEUR,EMAIL\n\
         Acme,contact@acme.fr\n\
         TEST,qa@test.fr\n\
         Globex,info@globex.fr\n",
    );

    let ingested = Ingester::new().ingest_file(file.path()).unwrap();
    let matrix = ingested.dataset.to_matrix();

    // Catalog entry 1 deletes TEST suppliers.
    let rule = &predefined_rules()[0].rule;
    let cleaned = RuleEngine::new().apply(rule, &matrix).unwrap();
    let dataset = Dataset::from_matrix(&cleaned);

    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.get(0, "FOURNISSEUR"), Some(&Cell::text("Acme")));
    assert_eq!(dataset.get(1, "FOURNISSEUR"), Some(&Cell::text("Globex")));
}

#[test]
fn test_rule_errors_leave_caller_dataset_usable() {
    let file = create_test_file(".csv", "A,B\n1,2\n");
    let ingested = Ingester::new().ingest_file(file.path()).unwrap();
    let matrix = ingested.dataset.to_matrix();

    let rule = CleaningRule::delete_rows("SIRET", "x");
    let err = RuleEngine::new().apply(&rule, &matrix).unwrap_err();
    assert!(matches!(err, LavoirError::ColumnNotFound { .. }));

    // The matrix is untouched and still usable after the failure.
    assert_eq!(Dataset::from_matrix(&matrix), ingested.dataset);
}

#[test]
fn test_shape_conversions_survive_the_pipeline() {
    let file = create_test_file(
        ".csv",
        "name,qty\nwidget,3\ngadget,\n",
    );
    let ingested = Ingester::new().ingest_file(file.path()).unwrap();

    let round_tripped = Dataset::from_matrix(&ingested.dataset.to_matrix());
    assert_eq!(round_tripped, ingested.dataset);

    // Empty CSV cells read back as empty cells, not as text.
    assert_eq!(round_tripped.get(1, "qty"), Some(&Cell::Empty));
}
