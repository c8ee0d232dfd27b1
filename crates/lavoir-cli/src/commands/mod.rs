//! Command implementations.

pub mod admin;
pub mod chat;
pub mod clean;
pub mod kpi;
pub mod preview;
pub mod rules;

use std::env;
use std::path::Path;

use lavoir::chat::AuthContext;
use lavoir::dataset::Dataset;
use lavoir::error::{LavoirError, Result};

/// Environment variable holding the backend bearer token.
pub const TOKEN_ENV_VAR: &str = "LAVOIR_API_TOKEN";

/// Build the auth context from the environment. An absent token is not an
/// error here; authenticated calls surface `AuthMissing` when they run.
pub fn auth_from_env(email: Option<String>) -> AuthContext {
    let mut auth = AuthContext::new(env::var(TOKEN_ENV_VAR).unwrap_or_default());
    if let Some(email) = email {
        auth = auth.with_email(email);
    }
    auth
}

/// Stringify a dataset for the table renderer.
pub fn dataset_rows(dataset: &Dataset, limit: usize) -> Vec<Vec<String>> {
    dataset
        .rows
        .iter()
        .take(limit)
        .map(|record| {
            dataset
                .columns
                .iter()
                .map(|column| {
                    record
                        .get(column)
                        .map(|cell| cell.to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// Write a dataset out as CSV.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| LavoirError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    writer
        .write_record(&dataset.columns)
        .map_err(|e| LavoirError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for row in dataset_rows(dataset, usize::MAX) {
        writer.write_record(&row).map_err(|e| LavoirError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    writer.flush().map_err(|e| LavoirError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
