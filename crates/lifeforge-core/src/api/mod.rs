//! Shared endpoint contracts.
//!
//! Each type here is an [`Endpoint`](crate::rpc::Endpoint): the server
//! crate declares its handler against it and the client crate calls it, so
//! both sides agree on path, kind, input and output.

pub mod api_keys;
pub mod locations;
pub mod modules;
