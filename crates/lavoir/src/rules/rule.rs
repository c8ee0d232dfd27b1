//! Cleaning rule value objects and the predefined catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The operation a cleaning rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Remove rows whose target cell matches the rule value.
    DeleteRows,
    /// Reserved: reformat the values of a column. Not executable yet.
    FormatColumn,
    /// Keep the first row per distinct value of the target column.
    Deduplicate,
}

/// A declarative, single-operation transformation. Immutable once built;
/// rules come from the predefined catalog or from the assistant backend
/// and are consumed once by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Target column, matched case-insensitively against the header.
    pub column: String,
    /// Comparison value for `delete_rows`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Reserved for `format_column`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl CleaningRule {
    /// Rule that deletes rows where `column` equals `value`.
    pub fn delete_rows(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::DeleteRows,
            column: column.into(),
            value: Some(value.into()),
            format: None,
        }
    }

    /// Rule that deduplicates on `column`.
    pub fn deduplicate(column: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Deduplicate,
            column: column.into(),
            value: None,
            format: None,
        }
    }
}

/// Where a catalog entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrigin {
    Predefined,
    Assistant,
}

/// A named, described rule as shown in the rule library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub origin: RuleOrigin,
    pub rule: CleaningRule,
}

/// Constant catalog, created at process start and never mutated.
static PREDEFINED_RULES: Lazy<Vec<RuleDefinition>> = Lazy::new(|| {
    vec![
        RuleDefinition {
            id: 1,
            name: "Supprimer les lignes TEST".to_string(),
            description: "Supprime les lignes où la colonne FOURNISSEUR vaut TEST".to_string(),
            origin: RuleOrigin::Predefined,
            rule: CleaningRule::delete_rows("FOURNISSEUR", "TEST"),
        },
        RuleDefinition {
            id: 2,
            name: "Dédupliquer les emails".to_string(),
            description: "Supprime les doublons basés sur la colonne Email".to_string(),
            origin: RuleOrigin::Predefined,
            rule: CleaningRule::deduplicate("Email"),
        },
    ]
});

/// The predefined rule catalog.
pub fn predefined_rules() -> &'static [RuleDefinition] {
    &PREDEFINED_RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_populated() {
        let rules = predefined_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule.kind, RuleKind::DeleteRows);
        assert_eq!(rules[1].rule.kind, RuleKind::Deduplicate);
    }

    #[test]
    fn test_rule_kind_serializes_snake_case() {
        let json = serde_json::to_string(&RuleKind::DeleteRows).unwrap();
        assert_eq!(json, "\"delete_rows\"");
    }

    #[test]
    fn test_rule_wire_shape() {
        let rule = CleaningRule::delete_rows("FOURNISSEUR", "TEST");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "delete_rows");
        assert_eq!(json["column"], "FOURNISSEUR");
        assert_eq!(json["value"], "TEST");
        assert!(json.get("format").is_none());
    }
}
