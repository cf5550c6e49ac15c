//! Typed route layer.
//!
//! Endpoints are declared with [`Route`], grouped into per-module
//! [`Router`]s, composed into a single tree and flattened into a
//! [`RouteTable`]. Nothing in here knows about HTTP; the server crate maps
//! the table onto axum and the client crate maps dotted paths back to URLs.
//!
//! # Example
//!
//! ```ignore
//! use lifeforge_core::rpc::{Empty, Route, Router};
//!
//! let blog = Router::new().route(
//!     "ping",
//!     Route::query("Liveness check for the blog module")
//!         .input::<Empty>()
//!         .callback(|_ctx, _input| async { Ok::<_, ServerError>("pong") }),
//! )?;
//! let table = Router::compose([("blog", blog)])?.into_table();
//! assert!(table.contains("blog.ping"));
//! ```

pub mod context;
pub mod contract;
pub mod route;
pub mod router;

pub use context::RequestContext;
pub use contract::Endpoint;
pub use route::{Empty, Input, Route, RouteInput, RouteKind, RouteNode};
pub use router::{is_valid_segment, RouteDescriptor, RouteTable, Router, RouterEntry, RouterError};
