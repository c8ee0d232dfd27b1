//! Error types for the Lavoir library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Lavoir operations.
#[derive(Debug, Error)]
pub enum LavoirError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not one of the accepted upload types.
    #[error("Unsupported file type: '{0}' (expected csv, xlsx or xls)")]
    UnsupportedFileType(String),

    /// File content could not be parsed as the format its extension claims.
    #[error("Failed to read '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// A cleaning rule is missing a required field.
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    /// The dataset has no rows to operate on.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// The rule's target column does not appear in any row of the data.
    #[error("Column '{column}' not found (headers: {})", .headers.join(", "))]
    ColumnNotFound {
        column: String,
        headers: Vec<String>,
    },

    /// No bearer token could be obtained for an authenticated call.
    #[error("Not authenticated: no bearer token available")]
    AuthMissing,

    /// The backend rejected the request or the network call failed.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// A submission was rejected because another one is still in flight.
    #[error("A request is already in flight on this chat surface")]
    RequestInFlight,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Lavoir operations.
pub type Result<T> = std::result::Result<T, LavoirError>;
