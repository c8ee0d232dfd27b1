//! Administration API client: organizations and users against quotas.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::chat::http::failure_message;
use crate::chat::AuthContext;
use crate::error::{LavoirError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// An organization holding users and a processing quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub settings: serde_json::Value,
    pub quota_limit: u64,
    pub quota_used: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields of an organization an administrator may change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

/// A user within an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub organization_id: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Usage statistics for an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationStats {
    pub total_files_processed: u64,
    pub files_processed_today: u64,
    pub active_users: u64,
    pub processing_success_rate: f64,
}

/// Quota snapshot for an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaInfo {
    pub quota_used: u64,
    pub quota_limit: u64,
    pub quota_remaining: u64,
    pub quota_percentage: f64,
}

/// One day of processing activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub date: String,
    pub total_files: u64,
    pub successful_files: u64,
    pub failed_files: u64,
    pub success_rate: f64,
}

/// Bearer-authenticated client for the administration endpoints.
pub struct AdminClient {
    client: Client,
    base_url: String,
}

impl AdminClient {
    /// Create a client for the given base URL (no trailing slash).
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

    /// List all organizations.
    pub fn organizations(&self, auth: &AuthContext) -> Result<Vec<Organization>> {
        self.get("/organizations", auth)
    }

    /// Fetch one organization.
    pub fn organization(&self, id: &str, auth: &AuthContext) -> Result<Organization> {
        self.get(&format!("/organizations/{id}"), auth)
    }

    /// Update an organization.
    pub fn update_organization(
        &self,
        id: &str,
        patch: &OrganizationPatch,
        auth: &AuthContext,
    ) -> Result<Organization> {
        let builder = self
            .client
            .put(format!("{}/organizations/{id}", self.base_url))
            .json(patch);
        self.execute(builder, auth)
    }

    /// Usage statistics for an organization.
    pub fn organization_usage(&self, id: &str, auth: &AuthContext) -> Result<OrganizationStats> {
        self.get(&format!("/organizations/{id}/usage"), auth)
    }

    /// Quota snapshot for an organization.
    pub fn organization_quota(&self, id: &str, auth: &AuthContext) -> Result<QuotaInfo> {
        self.get(&format!("/organizations/{id}/quota"), auth)
    }

    /// Reset an organization's quota counter.
    pub fn reset_organization_quota(&self, id: &str, auth: &AuthContext) -> Result<QuotaInfo> {
        let builder = self
            .client
            .post(format!("{}/organizations/{id}/quota/reset", self.base_url));
        self.execute(builder, auth)
    }

    /// Daily activity for the last `days` days.
    pub fn organization_activity(
        &self,
        id: &str,
        days: u32,
        auth: &AuthContext,
    ) -> Result<Vec<ActivitySummary>> {
        self.get(&format!("/organizations/{id}/activity?days={days}"), auth)
    }

    /// List the users of an organization.
    pub fn users(&self, organization_id: &str, auth: &AuthContext) -> Result<Vec<User>> {
        self.get(&format!("/users/organization/{organization_id}"), auth)
    }

    /// Fetch one user.
    pub fn user(&self, id: &str, auth: &AuthContext) -> Result<User> {
        self.get(&format!("/users/{id}"), auth)
    }

    /// Grant or revoke the admin role.
    pub fn update_user_role(&self, id: &str, is_admin: bool, auth: &AuthContext) -> Result<User> {
        let builder = self
            .client
            .put(format!("{}/users/{id}/role", self.base_url))
            .json(&json!({ "is_admin": is_admin }));
        self.execute(builder, auth)
    }

    /// Search an organization's users by email fragment.
    pub fn search_users(
        &self,
        organization_id: &str,
        search: &str,
        auth: &AuthContext,
    ) -> Result<Vec<User>> {
        self.get(
            &format!("/users/organization/{organization_id}/search?search={search}"),
            auth,
        )
    }

    fn get<T: DeserializeOwned>(&self, path: &str, auth: &AuthContext) -> Result<T> {
        let builder = self.client.get(format!("{}{path}", self.base_url));
        self.execute(builder, auth)
    }

    fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder, auth: &AuthContext) -> Result<T> {
        let response = builder
            .headers(self.build_headers(auth)?)
            .send()
            .map_err(|e| LavoirError::RequestFailed(e.to_string()))?;
        debug!(
            "admin call resolved with {} (user: {})",
            response.status(),
            auth.email.as_deref().unwrap_or("anonymous")
        );
        check_status(response)?
            .json()
            .map_err(|e| LavoirError::RequestFailed(format!("failed to parse response: {e}")))
    }

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
        Ok(headers)
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(LavoirError::RequestFailed(failure_message(status, &body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_deserializes() {
        let org: Organization = serde_json::from_str(
            r#"{
                "id": "org_1",
                "name": "Acme",
                "settings": {"locale": "fr"},
                "quota_limit": 1000,
                "quota_used": 250,
                "created_at": "2024-01-15T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(org.name, "Acme");
        assert_eq!(org.quota_limit, 1000);
        assert!(org.updated_at.is_none());
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = OrganizationPatch {
            quota_limit: Some(2000),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "quota_limit": 2000 }));
    }

    #[test]
    fn test_quota_info_round_trip() {
        let info = QuotaInfo {
            quota_used: 10,
            quota_limit: 100,
            quota_remaining: 90,
            quota_percentage: 10.0,
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: QuotaInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.quota_remaining, 90);
    }
}
