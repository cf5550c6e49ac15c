use lifeforge_core::rpc::{Endpoint, RouteKind};
use serde::Serialize;

use crate::data::DataClient;
use crate::error::ClientError;
use crate::proxy::ProxyNode;

/// Entry point: base URL, optional bearer token and a pooled HTTP client.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    /// Base URL from `API_HOST`, falling back to `VITE_API_HOST`.
    pub fn from_env() -> Result<Self, ClientError> {
        std::env::var("API_HOST")
            .or_else(|_| std::env::var("VITE_API_HOST"))
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
            .ok_or(ClientError::MissingBaseUrl)
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root of the route tree.
    pub fn proxy(&self) -> ProxyNode {
        ProxyNode::root(self.clone())
    }

    /// Node for a dotted path, without any compile-time check.
    pub fn untyped(&self, path: &str) -> ProxyNode {
        self.proxy().path(path)
    }

    pub fn data(&self) -> DataClient {
        DataClient::new(self.clone())
    }

    /// Call a route through its shared contract.
    pub async fn call<E: Endpoint>(&self, input: &E::Input) -> Result<E::Output, ClientError> {
        let node = self.untyped(E::PATH);
        let value = match E::KIND {
            RouteKind::Query => node.query(input).await?,
            RouteKind::Mutation => node.mutate(input).await?,
        };
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Whether the server has a route registered at `path`.
    pub async fn exists(&self, path: &str) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/routes", self.base_url))
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let index = read_response(resp).await?;
        Ok(index["routes"]
            .as_array()
            .map(|routes| routes.iter().any(|r| r["path"] == path))
            .unwrap_or(false))
    }

    /// `/api/<seg>/<seg>` with every segment percent-encoded, so a segment
    /// can never spill into another path segment or the query string.
    fn url_for(&self, segments: &[String]) -> Result<String, ClientError> {
        // URL normalization would resolve `.` and `..` into a different path.
        if segments.is_empty() || segments.iter().any(|s| s == "." || s == "..") {
            return Err(ClientError::Status {
                status: 404,
                message: format!("Route not found: {}", segments.join(".")),
            });
        }
        let encoded: Vec<_> = segments.iter().map(|s| urlencoding::encode(s)).collect();
        Ok(format!("{}/api/{}", self.base_url, encoded.join("/")))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) async fn send_query<I: Serialize + ?Sized>(
        &self,
        segments: &[String],
        input: &I,
    ) -> Result<serde_json::Value, ClientError> {
        let pairs = query_pairs(input)?;
        let url = self.url_for(segments)?;
        tracing::debug!(%url, "query");
        let resp = self
            .authorize(self.http.get(&url).query(&pairs))
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        read_response(resp).await
    }

    pub(crate) async fn send_mutation<I: Serialize + ?Sized>(
        &self,
        segments: &[String],
        input: &I,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.url_for(segments)?;
        tracing::debug!(%url, "mutation");
        let resp = self
            .authorize(self.http.post(&url).json(input))
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        read_response(resp).await
    }
}

/// Flatten an input object into query-string pairs. `null` fields are
/// omitted, strings are sent raw, other scalars in their JSON form.
fn query_pairs<I: Serialize + ?Sized>(input: &I) -> Result<Vec<(String, String)>, ClientError> {
    let value = serde_json::to_value(input).map_err(|e| ClientError::Encode(e.to_string()))?;
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect()),
        other => Err(ClientError::Encode(format!(
            "query input must be an object, got {}",
            other
        ))),
    }
}

async fn read_response(resp: reqwest::Response) -> Result<serde_json::Value, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let body: Option<serde_json::Value> = resp.json().await.ok();
    let message = body
        .as_ref()
        .and_then(|b| b["error"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_flatten_scalars() {
        let pairs = query_pairs(&serde_json::json!({
            "q": "Singapore",
            "limit": 5,
            "exact": true,
            "page": null
        }))
        .unwrap();
        assert!(pairs.contains(&("q".to_string(), "Singapore".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
        assert!(pairs.contains(&("exact".to_string(), "true".to_string())));
        assert_eq!(pairs.len(), 3);

        assert!(query_pairs(&()).unwrap().is_empty());
        assert!(query_pairs(&42).is_err());
    }

    #[test]
    fn urls_follow_the_route_tree() {
        let client = ApiClient::new("http://localhost:3636/");
        let url = |segments: &[&str]| {
            client.url_for(&segments.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        };
        assert_eq!(
            url(&["locations", "search"]).unwrap(),
            "http://localhost:3636/api/locations/search"
        );
        assert_eq!(
            url(&["modules/list"]).unwrap(),
            "http://localhost:3636/api/modules%2Flist"
        );
        assert_eq!(
            url(&["modules", "list?x=1"]).unwrap(),
            "http://localhost:3636/api/modules/list%3Fx%3D1"
        );
        assert_eq!(url(&["modules", "", "list"]).unwrap(), "http://localhost:3636/api/modules//list");
    }

    #[test]
    fn dot_segments_never_leave_the_client() {
        let client = ApiClient::new("http://localhost:3636");
        for segments in [vec![], vec!["x", "..", "modules", "list"], vec!["modules", ".", "list"]] {
            let segments: Vec<String> = segments.into_iter().map(String::from).collect();
            let err = client.url_for(&segments).unwrap_err();
            assert!(err.is_not_found(), "{segments:?}");
        }
    }
}
