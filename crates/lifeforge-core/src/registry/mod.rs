//! Package registry client (shared between the CLI commands).
//!
//! Speaks the npm registry protocol: `GET /-/whoami` for the authenticated
//! user and `GET /<package>` for package documents. Language packs are
//! published there as `@lifeforge/lang-<lang>`.

use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

#[derive(Debug, thiserror::Error)]
pub enum RegistryClientError {
    #[error("REGISTRY_TOKEN is not set; log in to the registry first")]
    MissingToken,

    #[error("Registry rejected the credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Registry request failed: {0}")]
    Http(String),

    #[error("Registry returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse registry response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,
}

impl PackageInfo {
    pub fn latest_version(&self) -> Option<&str> {
        self.dist_tags.get("latest").map(|v| v.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct WhoamiResponse {
    username: String,
}

pub struct RegistryClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            http: reqwest::Client::new(),
        }
    }

    /// `REGISTRY_URL` (default: the public npm registry) and `REGISTRY_TOKEN`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("REGISTRY_URL").unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string());
        Self::new(base_url, std::env::var("REGISTRY_TOKEN").ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Username the configured token belongs to.
    pub async fn whoami(&self) -> Result<String, RegistryClientError> {
        let token = self.token.as_ref().ok_or(RegistryClientError::MissingToken)?;
        let resp = self
            .http
            .get(format!("{}/-/whoami", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RegistryClientError::Http(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RegistryClientError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(RegistryClientError::Status(status.as_u16()));
        }

        resp.json::<WhoamiResponse>()
            .await
            .map(|r| r.username)
            .map_err(|e| RegistryClientError::Parse(e.to_string()))
    }

    /// Package document for `name` (scoped names are supported).
    pub async fn package_info(&self, name: &str) -> Result<PackageInfo, RegistryClientError> {
        let mut req = self
            .http
            .get(format!("{}/{}", self.base_url, urlencoding::encode(name)));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| RegistryClientError::Http(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryClientError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(RegistryClientError::Status(status.as_u16()));
        }

        resp.json::<PackageInfo>()
            .await
            .map_err(|e| RegistryClientError::Parse(e.to_string()))
    }
}
