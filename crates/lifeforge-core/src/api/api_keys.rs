use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::api_key::ApiKeyEntry;
use crate::rpc::{Empty, Endpoint, Input, RouteKind};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetParams {
    pub id: String,
    pub name: String,
    pub key: String,
}

impl Input for SetParams {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id must not be empty".into());
        }
        if self.key.trim().is_empty() {
            return Err("key must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteParams {
    pub id: String,
}

impl Input for DeleteParams {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub id: String,
    pub deleted: bool,
}

/// `apiKeys.list`. Key material is masked.
pub struct List;

impl Endpoint for List {
    const PATH: &'static str = "apiKeys.list";
    const KIND: RouteKind = RouteKind::Query;
    type Input = Empty;
    type Output = Vec<ApiKeyEntry>;
}

/// `apiKeys.set`
pub struct Set;

impl Endpoint for Set {
    const PATH: &'static str = "apiKeys.set";
    const KIND: RouteKind = RouteKind::Mutation;
    type Input = SetParams;
    type Output = ApiKeyEntry;
}

/// `apiKeys.delete`
pub struct Delete;

impl Endpoint for Delete {
    const PATH: &'static str = "apiKeys.delete";
    const KIND: RouteKind = RouteKind::Mutation;
    type Input = DeleteParams;
    type Output = DeleteResult;
}
