//! Shared endpoint contracts.
//!
//! An [`Endpoint`] names one route of the server tree at the type level.
//! The server declares its handler with [`Route::endpoint`](super::Route::endpoint)
//! and the client calls it with `ApiClient::call::<E>()`, so both sides agree
//! on path, kind, input and output at compile time.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::route::{Input, RouteKind};

pub trait Endpoint: 'static {
    /// Dotted path in the route tree, e.g. `"locations.search"`.
    const PATH: &'static str;
    const KIND: RouteKind;
    type Input: Input + Serialize + Sync;
    type Output: Serialize + DeserializeOwned + Send + 'static;

    fn segments() -> Vec<&'static str> {
        Self::PATH.split('.').collect()
    }
}
