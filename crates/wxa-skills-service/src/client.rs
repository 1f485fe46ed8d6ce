use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use wxa_core::{ApiError, Result, WxaError};

use crate::skill::Skill;

/// Regional endpoint prefix; the developer id is appended.
pub const DEFAULT_BASE_URL: &str =
    "https://assistant.us-east-2.intelligence.webex.com/skills/api/developers";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the skills-service REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SkillsClient {
    http: reqwest::Client,
    base_url: String,
    developer_id: String,
    token: String,
}

impl std::fmt::Debug for SkillsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillsClient")
            .field("base_url", &self.base_url)
            .field("developer_id", &self.developer_id)
            .finish_non_exhaustive()
    }
}

impl SkillsClient {
    /// Create a client for `developer_id` authenticated with a personal access token.
    pub fn new(developer_id: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let developer_id = developer_id.into();
        let token = token.into();
        if token.is_empty() {
            return Err(WxaError::Config("token required".into()));
        }
        if developer_id.is_empty() {
            return Err(WxaError::Config("developer id required".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| WxaError::Http(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("{DEFAULT_BASE_URL}/{developer_id}"),
            developer_id,
            token,
        })
    }

    /// Point the client at a different endpoint (full URL including the developer id).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a caller-supplied HTTP client, e.g. with a different timeout or proxy.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn developer_id(&self) -> &str {
        &self.developer_id
    }

    /// List every skill owned by the developer.
    pub async fn list_skills(&self) -> Result<Vec<Skill>> {
        let req = self.request(Method::GET, "skills");
        Ok(self.send_json::<Vec<Skill>>(req).await?.unwrap_or_default())
    }

    /// Register a new skill; returns the record the service stored.
    pub async fn create_skill(&self, skill: &Skill) -> Result<Skill> {
        let req = self.request(Method::POST, "skills").json(skill);
        Ok(self.send_json::<Skill>(req).await?.unwrap_or_default())
    }

    /// Delete a skill. A hard delete removes it permanently.
    pub async fn delete_skill(&self, id: &str, hard_delete: bool) -> Result<()> {
        let req = self
            .request(Method::DELETE, &format!("skills/{id}"))
            .query(&[("HARD_DELETE", hard_delete)]);
        self.send(req).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%method, %url, "skills service request");
        self.http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| WxaError::Http(format!("skills service request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "skills service returned an error");
            return Err(ApiError::from_status(status.as_u16()).into());
        }
        Ok(resp)
    }

    /// Send and decode the body; `None` for 204 No Content.
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>> {
        let resp = self.send(req).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = resp
            .json::<T>()
            .await
            .map_err(|e| WxaError::Http(format!("skills service parse error: {e}")))?;
        Ok(Some(body))
    }
}
