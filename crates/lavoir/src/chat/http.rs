//! HTTP prompt backend.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::dataset::Record;
use crate::error::{LavoirError, Result};

use super::backend::{AuthContext, CleanReply, KpiReply, PromptBackend};

/// Request timeout. A hung backend must not leave a chat surface in the
/// thinking state forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Cleaning endpoint path.
const QUICK_PROCESS_PATH: &str = "/files/quick-process";

/// KPI endpoint path.
const GPT_PATH: &str = "/files/gpt";

/// Prompt backend speaking to the interpretation service over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LavoirError::RequestFailed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build headers for a backend request.
    fn build_headers(&self, auth: &AuthContext) -> Result<HeaderMap> {
        let token = auth.bearer()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| LavoirError::RequestFailed(format!("invalid bearer token: {e}")))?,
        );
        headers.insert(
            "X-User-Email",
            HeaderValue::from_str(auth.email.as_deref().unwrap_or(""))
                .map_err(|e| LavoirError::RequestFailed(format!("invalid user email: {e}")))?,
        );
        Ok(headers)
    }

    fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        auth: &AuthContext,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(
            "POST {} (user: {})",
            url,
            auth.email.as_deref().unwrap_or("anonymous")
        );

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers(auth)?)
            .json(body)
            .send()
            .map_err(|e| LavoirError::RequestFailed(e.to_string()))?;

        let response = check_status(response)?;
        response
            .json()
            .map_err(|e| LavoirError::RequestFailed(format!("failed to parse response: {e}")))
    }
}

impl PromptBackend for HttpBackend {
    fn quick_process(
        &self,
        prompt: &str,
        records: &[Record],
        auth: &AuthContext,
    ) -> Result<CleanReply> {
        self.post(
            QUICK_PROCESS_PATH,
            &json!({ "data": records, "prompt": prompt }),
            auth,
        )
    }

    fn kpi_query(
        &self,
        prompt: &str,
        records: &[Record],
        auth: &AuthContext,
    ) -> Result<KpiReply> {
        self.post(GPT_PATH, &json!({ "prompt": prompt, "data": records }), auth)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Turn a non-2xx response into `RequestFailed` with the best available
/// message.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(LavoirError::RequestFailed(failure_message(status, &body)))
}

/// Best-effort extraction of an error message: the JSON `detail` field,
/// else the raw body, else the HTTP status.
pub(crate) fn failure_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    format!("HTTP {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_detail_field() {
        let message = failure_message(
            StatusCode::FORBIDDEN,
            r#"{"detail": "Quota exceeded for organization"}"#,
        );
        assert_eq!(message, "Quota exceeded for organization");
    }

    #[test]
    fn test_failure_message_falls_back_to_body() {
        let message = failure_message(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(message, "upstream unavailable");

        // JSON without a detail field still surfaces the raw body.
        let message = failure_message(StatusCode::BAD_REQUEST, r#"{"error": "nope"}"#);
        assert_eq!(message, r#"{"error": "nope"}"#);
    }

    #[test]
    fn test_failure_message_falls_back_to_status() {
        assert_eq!(
            failure_message(StatusCode::INTERNAL_SERVER_ERROR, "  "),
            "HTTP 500"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let backend = HttpBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000");
    }
}
