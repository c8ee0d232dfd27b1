//! Clean command: apply a cleaning rule locally.

use std::path::PathBuf;

use lavoir::dataset::Dataset;
use lavoir::error::{LavoirError, Result};
use lavoir::ingest::Ingester;
use lavoir::rules::{predefined_rules, CleaningRule, RuleEngine, RuleKind};

use crate::cli::KindChoice;
use crate::commands::{dataset_rows, write_csv};
use crate::table;

pub fn run(
    file: PathBuf,
    rule_id: Option<u32>,
    kind: Option<KindChoice>,
    column: Option<String>,
    value: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let rule = select_rule(rule_id, kind, column, value)?;

    let ingested = Ingester::new().ingest_file(&file)?;
    let matrix = ingested.dataset.to_matrix();
    let rows_before = ingested.dataset.row_count();

    let cleaned = RuleEngine::new().apply(&rule, &matrix)?;
    let dataset = Dataset::from_matrix(&cleaned);

    println!(
        "Applied {:?} on '{}': {} -> {} row(s)",
        rule.kind,
        rule.column,
        rows_before,
        dataset.row_count()
    );

    match output {
        Some(path) => {
            write_csv(&dataset, &path)?;
            println!("Wrote {}", path.display());
        }
        None => {
            println!();
            table::print_table(&dataset.columns, &dataset_rows(&dataset, 20));
        }
    }
    Ok(())
}

/// Pick the catalog rule by id, or assemble an ad-hoc rule from flags.
fn select_rule(
    rule_id: Option<u32>,
    kind: Option<KindChoice>,
    column: Option<String>,
    value: Option<String>,
) -> Result<CleaningRule> {
    if let Some(id) = rule_id {
        return predefined_rules()
            .iter()
            .find(|def| def.id == id)
            .map(|def| def.rule.clone())
            .ok_or_else(|| LavoirError::MalformedRule(format!("no catalog rule with id {id}")));
    }

    let (Some(kind), Some(column)) = (kind, column) else {
        return Err(LavoirError::MalformedRule(
            "pass --rule <id>, or --kind with --column".to_string(),
        ));
    };

    Ok(match RuleKind::from(&kind) {
        RuleKind::DeleteRows => {
            let value = value.ok_or_else(|| {
                LavoirError::MalformedRule("delete-rows requires --value".to_string())
            })?;
            CleaningRule::delete_rows(column, value)
        }
        RuleKind::Deduplicate => CleaningRule::deduplicate(column),
        RuleKind::FormatColumn => {
            return Err(LavoirError::MalformedRule(
                "format-column rules are reserved and not executable".to_string(),
            ));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_catalog_rule() {
        let rule = select_rule(Some(1), None, None, None).unwrap();
        assert_eq!(rule.kind, RuleKind::DeleteRows);
        assert_eq!(rule.column, "FOURNISSEUR");
    }

    #[test]
    fn test_unknown_catalog_id() {
        assert!(select_rule(Some(99), None, None, None).is_err());
    }

    #[test]
    fn test_ad_hoc_delete_needs_value() {
        let result = select_rule(
            None,
            Some(KindChoice::DeleteRows),
            Some("EMAIL".to_string()),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ad_hoc_dedupe() {
        let rule = select_rule(
            None,
            Some(KindChoice::Deduplicate),
            Some("EMAIL".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(rule.kind, RuleKind::Deduplicate);
    }
}
