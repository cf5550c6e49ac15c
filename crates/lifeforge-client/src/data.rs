//! Data-fetching descriptors.
//!
//! A [`QueryDescriptor`] pairs a stable cache key with a deferred fetch,
//! the shape query caches expect; a [`MutationDescriptor`] wraps a write.

use std::marker::PhantomData;

use lifeforge_core::rpc::Endpoint;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::proxy::ProxyNode;

pub struct DataClient {
    client: ApiClient,
}

impl DataClient {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn query<E: Endpoint>(&self, input: &E::Input) -> Result<QueryDescriptor<E::Output>, ClientError> {
        let input = serde_json::to_value(input).map_err(|e| ClientError::Encode(e.to_string()))?;
        Ok(QueryDescriptor::new(self.client.untyped(E::PATH), input))
    }

    pub fn query_untyped(
        &self,
        path: &str,
        input: serde_json::Value,
    ) -> QueryDescriptor<serde_json::Value> {
        QueryDescriptor::new(self.client.untyped(path), input)
    }

    pub fn mutation<E: Endpoint>(&self) -> MutationDescriptor<E::Input, E::Output> {
        MutationDescriptor::new(self.client.untyped(E::PATH))
    }

    pub fn mutation_untyped(
        &self,
        path: &str,
    ) -> MutationDescriptor<serde_json::Value, serde_json::Value> {
        MutationDescriptor::new(self.client.untyped(path))
    }
}

pub struct QueryDescriptor<O> {
    key: Vec<serde_json::Value>,
    node: ProxyNode,
    input: serde_json::Value,
    _output: PhantomData<fn() -> O>,
}

impl<O: DeserializeOwned> QueryDescriptor<O> {
    fn new(node: ProxyNode, input: serde_json::Value) -> Self {
        let mut key: Vec<serde_json::Value> = node
            .segments()
            .iter()
            .map(|s| serde_json::Value::String(s.clone()))
            .collect();
        key.push(input.clone());
        Self {
            key,
            node,
            input,
            _output: PhantomData,
        }
    }

    /// `[segment, ..., input]`. Equal for equal path and input.
    pub fn key(&self) -> &[serde_json::Value] {
        &self.key
    }

    pub async fn fetch(&self) -> Result<O, ClientError> {
        let value = self.node.query(&self.input).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

pub struct MutationDescriptor<I, O> {
    node: ProxyNode,
    _types: PhantomData<fn(I) -> O>,
}

impl<I: Serialize, O: DeserializeOwned> MutationDescriptor<I, O> {
    fn new(node: ProxyNode) -> Self {
        Self {
            node,
            _types: PhantomData,
        }
    }

    pub fn path(&self) -> String {
        self.node.dotted_path()
    }

    pub async fn mutate(&self, input: &I) -> Result<O, ClientError> {
        let value = self.node.mutate(input).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
