//! HttpStore for remote role services
//!
//! Queries `GET {base_url}/users/{id}/permissions` and expects
//! `{"permissions": ["blog_manage", ...]}`. A 404 means the service does not
//! know the user, which is an empty set rather than a failure.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::errors::{GateError, Result};
use crate::rbac::permission::PermissionSet;
use crate::rbac::store::PermissionStore;
use crate::session::UserId;

#[derive(Debug, Deserialize)]
struct PermissionsResponse {
    permissions: Vec<String>,
}

/// Permission store backed by a remote user service
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: Url,
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl HttpStore {
    /// Create new HttpStore
    ///
    /// # Example
    ///
    /// ```
    /// use schoolgate::rbac::HttpStore;
    ///
    /// let store = HttpStore::new("http://localhost:8080").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GateError::ValidationError(format!("Invalid store URL '{}': {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(GateError::ValidationError(format!(
                "Store URL cannot be a base: {}",
                base_url
            )));
        }

        Ok(HttpStore {
            base_url,
            client: reqwest::Client::new(),
            auth_token: None,
        })
    }

    /// Add a bearer token sent with every lookup
    pub fn with_auth(mut self, token: String) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Bound each request; the lookup layer may impose its own timeout too
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// URL queried for `user_id`, with the id percent-encoded as one segment
    pub fn permissions_url(&self, user_id: &UserId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", user_id.as_str(), "permissions"]);
        }
        url
    }
}

#[async_trait]
impl PermissionStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn permissions_for(&self, user_id: &UserId) -> Result<PermissionSet> {
        let mut request = self.client.get(self.permissions_url(user_id));
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(PermissionSet::new());
        }
        if !status.is_success() {
            return Err(GateError::StoreUnavailable(format!(
                "user service returned {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let parsed: PermissionsResponse = serde_json::from_slice(&body)
            .map_err(|e| GateError::MalformedRecord(format!("permissions payload: {}", e)))?;

        Ok(PermissionSet::from_names(parsed.permissions))
    }
}
