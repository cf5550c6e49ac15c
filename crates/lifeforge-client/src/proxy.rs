use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;

/// One position in the route tree, e.g. `client.proxy().at("modules")`.
///
/// Nodes are created on demand and never checked against the server until a
/// request is made.
#[derive(Clone)]
pub struct ProxyNode {
    client: ApiClient,
    segments: Vec<String>,
}

impl ProxyNode {
    pub(crate) fn root(client: ApiClient) -> Self {
        Self {
            client,
            segments: Vec::new(),
        }
    }

    /// Child node for `segment`.
    pub fn at(&self, segment: impl Into<String>) -> ProxyNode {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        ProxyNode {
            client: self.client.clone(),
            segments,
        }
    }

    /// Descend along a dotted path (`"modules.toggle"`). Empty segments are
    /// kept, so `"a..b"` is sent as-is and fails on the server.
    pub fn path(&self, dotted: &str) -> ProxyNode {
        dotted
            .split('.')
            .fold(self.clone(), |node, segment| node.at(segment))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn dotted_path(&self) -> String {
        self.segments.join(".")
    }

    /// `GET` with `input` as the query string.
    pub async fn query<I: Serialize + ?Sized>(
        &self,
        input: &I,
    ) -> Result<serde_json::Value, ClientError> {
        self.client.send_query(&self.segments, input).await
    }

    /// `POST` with `input` as the JSON body.
    pub async fn mutate<I: Serialize + ?Sized>(
        &self,
        input: &I,
    ) -> Result<serde_json::Value, ClientError> {
        self.client.send_mutation(&self.segments, input).await
    }
}

impl std::fmt::Debug for ProxyNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyNode")
            .field("base_url", &self.client.base_url())
            .field("path", &self.dotted_path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_accumulate_segments() {
        let client = ApiClient::new("http://localhost:3636");
        let node = client.proxy().at("modules").at("toggle");
        assert_eq!(node.dotted_path(), "modules.toggle");
        assert_eq!(client.untyped("modules.toggle").segments(), node.segments());
        assert_eq!(client.proxy().path("a..b").segments(), ["a", "", "b"]);
        assert_eq!(client.proxy().path("a..b").dotted_path(), "a..b");
        assert!(client.proxy().segments().is_empty());
    }
}
