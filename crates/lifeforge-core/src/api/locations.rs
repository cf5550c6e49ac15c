use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rpc::{Endpoint, Input, RouteKind};

/// API key id the place search reads its upstream credential from.
pub const LOCATION_API_KEY_ID: &str = "gcloud";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Free-text query, e.g. `"Singapore"`.
    pub q: String,
}

impl Input for SearchParams {
    fn validate(&self) -> Result<(), String> {
        if self.q.trim().is_empty() {
            return Err("q must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub formatted_address: String,
    pub lat: f64,
    pub lng: f64,
}

/// `locations.search`
pub struct Search;

impl Endpoint for Search {
    const PATH: &'static str = "locations.search";
    const KIND: RouteKind = RouteKind::Query;
    type Input = SearchParams;
    type Output = Vec<Location>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_are_rejected() {
        assert!(SearchParams { q: "  ".into() }.validate().is_err());
        assert!(SearchParams { q: "Singapore".into() }.validate().is_ok());
        assert_eq!(Search::segments(), vec!["locations", "search"]);
    }
}
