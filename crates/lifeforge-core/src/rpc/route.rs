//! Route declaration.
//!
//! A route is declared with a small type-state builder:
//!
//! ```ignore
//! let node = Route::query("Search for places by free text")
//!     .input::<SearchParams>()
//!     .callback(|ctx, input| async move { search(&ctx, input).await });
//! ```
//!
//! `callback` only exists once an input type has been declared, so an
//! incomplete route cannot be handed to a [`Router`](super::Router).

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::context::RequestContext;
use super::contract::Endpoint;
use crate::error::ServerError;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type ErasedHandler = Arc<
    dyn Fn(RequestContext, RouteInput) -> BoxFuture<Result<serde_json::Value, ServerError>>
        + Send
        + Sync,
>;

/// Whether a route reads (`Query`, served over GET) or writes (`Mutation`,
/// served over POST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Query,
    Mutation,
}

impl RouteKind {
    /// HTTP method the route is exposed under.
    pub fn http_method(&self) -> &'static str {
        match self {
            RouteKind::Query => "GET",
            RouteKind::Mutation => "POST",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Query => "query",
            RouteKind::Mutation => "mutation",
        }
    }
}

/// Raw, not yet validated request input.
#[derive(Debug, Clone)]
pub enum RouteInput {
    /// Parsed JSON body (mutations, in-process calls).
    Json(serde_json::Value),
    /// Raw `a=1&b=2` query string (queries over HTTP).
    Query(String),
}

impl RouteInput {
    pub fn empty() -> Self {
        RouteInput::Json(serde_json::Value::Object(Default::default()))
    }
}

/// An input schema.
///
/// Deserialization enforces the shape (required fields, types); `validate`
/// adds rules the shape cannot express. Both run before the handler.
pub trait Input: DeserializeOwned + JsonSchema + Send + 'static {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Input for routes that take no parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Empty {}

impl Input for Empty {}

/// Marker for a builder whose input has not been declared yet.
pub struct NoInput;

/// Entry point for declaring routes.
pub struct Route;

impl Route {
    pub fn query(description: impl Into<String>) -> RouteBuilder<NoInput> {
        RouteBuilder::new(RouteKind::Query, description.into())
    }

    pub fn mutation(description: impl Into<String>) -> RouteBuilder<NoInput> {
        RouteBuilder::new(RouteKind::Mutation, description.into())
    }

    /// Declare the server side of a shared [`Endpoint`] contract. Kind and
    /// input come from the contract, and the callback must produce
    /// `E::Output`.
    pub fn endpoint<E: Endpoint>(description: impl Into<String>) -> EndpointBuilder<E> {
        EndpointBuilder {
            inner: RouteBuilder::new(E::KIND, description.into()),
        }
    }
}

pub struct RouteBuilder<I> {
    kind: RouteKind,
    description: String,
    protected: bool,
    _input: PhantomData<fn() -> I>,
}

impl<I> RouteBuilder<I> {
    fn new(kind: RouteKind, description: String) -> Self {
        Self {
            kind,
            description,
            protected: false,
            _input: PhantomData,
        }
    }

    /// Require a valid bearer token before the input is even decoded.
    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }
}

impl RouteBuilder<NoInput> {
    pub fn input<T: Input>(self) -> RouteBuilder<T> {
        RouteBuilder {
            kind: self.kind,
            description: self.description,
            protected: self.protected,
            _input: PhantomData,
        }
    }
}

impl<T: Input> RouteBuilder<T> {
    pub fn callback<F, Fut, O>(self, handler: F) -> RouteNode
    where
        F: Fn(RequestContext, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ServerError>> + Send + 'static,
        O: Serialize + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(
            move |ctx: RequestContext, raw: RouteInput| -> BoxFuture<Result<serde_json::Value, ServerError>> {
                Box::pin(run_handler(handler.clone(), ctx, raw))
            },
        );

        RouteNode {
            kind: self.kind,
            description: self.description,
            protected: self.protected,
            input_schema: schemars::schema_for!(T),
            handler: erased,
        }
    }
}

pub struct EndpointBuilder<E> {
    inner: RouteBuilder<E>,
}

impl<E: Endpoint> EndpointBuilder<E> {
    pub fn protected(mut self) -> Self {
        self.inner = self.inner.protected();
        self
    }

    pub fn callback<F, Fut>(self, handler: F) -> RouteNode
    where
        F: Fn(RequestContext, E::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<E::Output, ServerError>> + Send + 'static,
    {
        RouteBuilder::<E::Input> {
            kind: self.inner.kind,
            description: self.inner.description,
            protected: self.inner.protected,
            _input: PhantomData,
        }
        .callback(handler)
    }
}

async fn run_handler<T, F, Fut, O>(
    handler: Arc<F>,
    ctx: RequestContext,
    raw: RouteInput,
) -> Result<serde_json::Value, ServerError>
where
    T: Input,
    F: Fn(RequestContext, T) -> Fut,
    Fut: Future<Output = Result<O, ServerError>>,
    O: Serialize,
{
    let input = decode_input::<T>(raw)?;
    let output = handler(ctx, input).await?;
    serde_json::to_value(output)
        .map_err(|e| ServerError::Internal(format!("Failed to serialize route output: {}", e)))
}

fn decode_input<T: Input>(raw: RouteInput) -> Result<T, ServerError> {
    let parsed = match raw {
        RouteInput::Json(value) => serde_json::from_value::<T>(value).map_err(|e| e.to_string()),
        RouteInput::Query(query) => {
            serde_urlencoded::from_str::<T>(&query).map_err(|e| e.to_string())
        }
    };
    let input = parsed.map_err(|e| ServerError::BadRequest(format!("Invalid input: {}", e)))?;
    input
        .validate()
        .map_err(|e| ServerError::BadRequest(format!("Invalid input: {}", e)))?;
    Ok(input)
}

/// A fully declared endpoint: metadata, input schema and handler.
#[derive(Clone)]
pub struct RouteNode {
    kind: RouteKind,
    description: String,
    protected: bool,
    input_schema: schemars::Schema,
    handler: ErasedHandler,
}

impl RouteNode {
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// JSON Schema of the declared input type.
    pub fn input_schema(&self) -> &schemars::Schema {
        &self.input_schema
    }

    /// Authorize, decode, validate, then run the handler.
    pub async fn invoke(
        &self,
        ctx: RequestContext,
        input: RouteInput,
    ) -> Result<serde_json::Value, ServerError> {
        if self.protected {
            ctx.require_auth()?;
        }
        (self.handler)(ctx, input).await
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("protected", &self.protected)
            .finish_non_exhaustive()
    }
}
