//! LifeForge Client: typed proxy over the LifeForge HTTP API.
//!
//! The server exposes its route tree as `/api/<segment>/<segment>`. This
//! crate mirrors that tree on the caller's side:
//!
//! ```text
//! lifeforge-core   (Endpoint contracts: PATH, KIND, Input, Output)
//!      ↑                     ↑
//! lifeforge-server      lifeforge-client (this crate)
//! ```
//!
//! Three ways to call a route:
//!
//! - **typed**: [`ApiClient::call`] with a shared contract, checked at
//!   compile time;
//! - **raw proxy**: [`ApiClient::proxy`] + [`ProxyNode::at`], one node per
//!   path segment, built on demand;
//! - **untyped**: [`ApiClient::untyped`] with a dotted path, for routes the
//!   contracts don't cover. Unknown paths still fail at request time with a
//!   404 status error.
//!
//! # Example
//!
//! ```ignore
//! use lifeforge_client::ApiClient;
//! use lifeforge_core::api::locations::{Search, SearchParams};
//!
//! let client = ApiClient::from_env()?;
//! let places = client.call::<Search>(&SearchParams { q: "Singapore".into() }).await?;
//!
//! let raw = client.proxy().at("modules").at("navigation").query(&()).await?;
//! ```

pub mod client;
pub mod data;
pub mod error;
pub mod proxy;

pub use client::ApiClient;
pub use data::{DataClient, MutationDescriptor, QueryDescriptor};
pub use error::ClientError;
pub use proxy::ProxyNode;
