//! Request-scoped context handed to every route callback.

use crate::db::Database;
use crate::error::ServerError;
use crate::state::AppState;

#[derive(Clone)]
pub struct RequestContext {
    state: AppState,
    bearer: Option<String>,
}

impl RequestContext {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            bearer: None,
        }
    }

    /// Attach the bearer token presented with the request, if any.
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.is_empty());
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Current persistence handle.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn is_authenticated(&self) -> bool {
        match &self.bearer {
            Some(token) => constant_time_eq(token.as_bytes(), self.state.config.master_key.as_bytes()),
            None => false,
        }
    }

    pub fn require_auth(&self) -> Result<(), ServerError> {
        if self.bearer.is_none() {
            return Err(ServerError::Unauthorized("Missing bearer token".into()));
        }
        if !self.is_authenticated() {
            return Err(ServerError::Unauthorized("Invalid bearer token".into()));
        }
        Ok(())
    }

    /// Key material for an upstream service. A missing key is a client
    /// error: the user has to configure it.
    pub async fn api_key(&self, id: &str) -> Result<String, ServerError> {
        self.state
            .api_key_store
            .get_key(id)
            .await?
            .ok_or_else(|| ServerError::BadRequest("API key not found".into()))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
