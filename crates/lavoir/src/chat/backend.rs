//! Prompt backend trait and wire types.

use serde::{Deserialize, Serialize};

use crate::dataset::Record;
use crate::error::{LavoirError, Result};

/// Identity attached to every backend call.
///
/// Passed explicitly through the call chain; there is no process-wide
/// mutable user context.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Bearer token for the backend.
    pub token: String,
    /// Email forwarded in the `X-User-Email` header and log records.
    pub email: Option<String>,
}

impl AuthContext {
    /// Create a context from a bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: None,
        }
    }

    /// Attach the user email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The token, or `AuthMissing` when none was obtained.
    pub fn bearer(&self) -> Result<&str> {
        if self.token.trim().is_empty() {
            Err(LavoirError::AuthMissing)
        } else {
            Ok(&self.token)
        }
    }
}

/// Whether a backend reply is plain conversation or an action on the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Conversation,
    Action,
}

impl Default for ResponseKind {
    fn default() -> Self {
        ResponseKind::Action
    }
}

/// Best-effort account of what an action changed, computed from row counts
/// alone. The cleaning flow cannot know which columns changed, so
/// `modified_columns` stays empty there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationSummary {
    #[serde(default)]
    pub modified_columns: Vec<String>,
    #[serde(default)]
    pub rows_before: usize,
    #[serde(default)]
    pub rows_after: usize,
    #[serde(default)]
    pub rows_modified: usize,
}

impl OperationSummary {
    /// Summary from row counts before and after an operation.
    pub fn from_counts(rows_before: usize, rows_after: usize) -> Self {
        Self {
            modified_columns: Vec::new(),
            rows_before,
            rows_after,
            rows_modified: rows_before.abs_diff(rows_after),
        }
    }
}

/// A single KPI value produced by the KPI endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDatum {
    pub kpi_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

/// Reply from the cleaning endpoint: a message plus the transformed
/// record list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReply {
    pub message: String,
    #[serde(default)]
    pub data: Vec<Record>,
}

/// Reply from the KPI endpoint. The backend labels the reply itself;
/// missing fields default rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiReply {
    #[serde(rename = "type", default)]
    pub kind: ResponseKind,
    #[serde(default)]
    pub requires_code: bool,
    pub message: String,
    #[serde(default)]
    pub results: Option<OperationSummary>,
    #[serde(default)]
    pub kpi_data: Option<Vec<KpiDatum>>,
}

/// A backend that interprets free-text instructions against a dataset.
///
/// Implementations must be thread-safe (Send + Sync) so one backend can
/// serve several chat surfaces.
pub trait PromptBackend: Send + Sync {
    /// Cleaning flow: send the prompt and the current records, get back a
    /// message and the transformed records.
    fn quick_process(
        &self,
        prompt: &str,
        records: &[Record],
        auth: &AuthContext,
    ) -> Result<CleanReply>;

    /// KPI flow: send the prompt and records, get back a labeled reply
    /// that may carry KPI values.
    fn kpi_query(&self, prompt: &str, records: &[Record], auth: &AuthContext)
        -> Result<KpiReply>;

    /// Backend name for logging/debugging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_requires_token() {
        assert!(AuthContext::new("  ").bearer().is_err());
        assert_eq!(AuthContext::new("tok").bearer().unwrap(), "tok");
    }

    #[test]
    fn test_summary_from_counts() {
        let summary = OperationSummary::from_counts(10, 7);
        assert_eq!(summary.rows_modified, 3);
        assert!(summary.modified_columns.is_empty());

        let grew = OperationSummary::from_counts(3, 5);
        assert_eq!(grew.rows_modified, 2);
    }

    #[test]
    fn test_kpi_reply_defaults_missing_fields() {
        let reply: KpiReply = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert_eq!(reply.kind, ResponseKind::Action);
        assert!(!reply.requires_code);
        assert!(reply.results.is_none());
        assert!(reply.kpi_data.is_none());
    }

    #[test]
    fn test_kpi_reply_parses_labeled_response() {
        let reply: KpiReply = serde_json::from_str(
            r#"{
                "type": "conversation",
                "requires_code": false,
                "message": "Bonjour",
                "kpi_data": [{"kpi_name": "CA", "value": 1200.5, "unit": "EUR"}]
            }"#,
        )
        .unwrap();
        assert_eq!(reply.kind, ResponseKind::Conversation);
        let data = reply.kpi_data.unwrap();
        assert_eq!(data[0].kpi_name, "CA");
        assert_eq!(data[0].description, "");
    }
}
