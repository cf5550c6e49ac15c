//! Router composition.
//!
//! A [`Router`] maps path segments to either a leaf [`RouteNode`] or a nested
//! `Router`. Per-module routers are composed at startup and flattened once
//! into an immutable [`RouteTable`] keyed by dotted path (`"blog.entries.list"`).
//!
//! Composition never overwrites: registering a path twice is a
//! [`RouterError::Collision`]. Nesting two routers under the same key merges
//! them, as long as their leaf paths stay disjoint.

use std::collections::BTreeMap;

use schemars::Schema;
use serde::Serialize;

use super::route::{RouteKind, RouteNode};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("Route collision: \"{path}\" is registered more than once")]
    Collision { path: String },

    #[error("Invalid path segment \"{segment}\": {reason}")]
    InvalidSegment { segment: String, reason: &'static str },
}

/// A slot in a router: either an endpoint or a sub-tree.
#[derive(Debug, Clone)]
pub enum RouterEntry {
    Route(RouteNode),
    Router(Router),
}

impl From<RouteNode> for RouterEntry {
    fn from(node: RouteNode) -> Self {
        RouterEntry::Route(node)
    }
}

impl From<Router> for RouterEntry {
    fn from(router: Router) -> Self {
        RouterEntry::Router(router)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    entries: BTreeMap<String, RouterEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf endpoint under `name`.
    pub fn route(self, name: impl Into<String>, node: RouteNode) -> Result<Self, RouterError> {
        self.insert(name.into(), RouterEntry::Route(node))
    }

    /// Mount a sub-router under `name`.
    pub fn nest(self, name: impl Into<String>, router: Router) -> Result<Self, RouterError> {
        self.insert(name.into(), RouterEntry::Router(router))
    }

    /// Build a router from `(name, entry)` pairs, e.g. one entry per app module.
    pub fn compose<I, K, E>(children: I) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<RouterEntry>,
    {
        children
            .into_iter()
            .try_fold(Router::new(), |router, (name, entry)| {
                router.insert(name.into(), entry.into())
            })
    }

    /// Flat union of two routers at the same level.
    pub fn merge(mut self, other: Router) -> Result<Self, RouterError> {
        merge_into(&mut self.entries, other.entries, "")?;
        Ok(self)
    }

    /// Number of leaf endpoints in the whole tree.
    pub fn route_count(&self) -> usize {
        self.entries
            .values()
            .map(|entry| match entry {
                RouterEntry::Route(_) => 1,
                RouterEntry::Router(router) => router.route_count(),
            })
            .sum()
    }

    /// All dotted leaf paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(&self.entries, "", &mut out);
        out
    }

    /// Flatten into the immutable table the transport layer serves from.
    pub fn into_table(self) -> RouteTable {
        let mut routes = BTreeMap::new();
        flatten(self.entries, "", &mut routes);
        RouteTable { routes }
    }

    fn insert(mut self, name: String, entry: RouterEntry) -> Result<Self, RouterError> {
        validate_segment(&name)?;
        let mut incoming = BTreeMap::new();
        incoming.insert(name, entry);
        merge_into(&mut self.entries, incoming, "")?;
        Ok(self)
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn merge_into(
    target: &mut BTreeMap<String, RouterEntry>,
    incoming: BTreeMap<String, RouterEntry>,
    prefix: &str,
) -> Result<(), RouterError> {
    for (name, entry) in incoming {
        let path = join(prefix, &name);
        match (target.get_mut(&name), entry) {
            (None, entry) => {
                target.insert(name, entry);
            }
            (Some(RouterEntry::Router(existing)), RouterEntry::Router(other)) => {
                merge_into(&mut existing.entries, other.entries, &path)?;
            }
            (Some(RouterEntry::Router(existing)), RouterEntry::Route(_)) => {
                // Report the first leaf already living under this namespace.
                let first = existing.paths().into_iter().next();
                return Err(RouterError::Collision {
                    path: first.map(|p| join(&path, &p)).unwrap_or(path),
                });
            }
            (Some(RouterEntry::Route(_)), _) => {
                return Err(RouterError::Collision { path });
            }
        }
    }
    Ok(())
}

fn validate_segment(segment: &str) -> Result<(), RouterError> {
    let invalid = |reason| RouterError::InvalidSegment {
        segment: segment.to_string(),
        reason,
    };
    if segment.is_empty() {
        return Err(invalid("segment is empty"));
    }
    if !is_valid_segment(segment) {
        return Err(invalid("only ASCII letters, digits, '_' and '-' are allowed"));
    }
    Ok(())
}

/// Whether `segment` can name a router entry: non-empty, ASCII letters,
/// digits, `_` and `-` only.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn collect_paths(entries: &BTreeMap<String, RouterEntry>, prefix: &str, out: &mut Vec<String>) {
    for (name, entry) in entries {
        let path = join(prefix, name);
        match entry {
            RouterEntry::Route(_) => out.push(path),
            RouterEntry::Router(router) => collect_paths(&router.entries, &path, out),
        }
    }
}

fn flatten(
    entries: BTreeMap<String, RouterEntry>,
    prefix: &str,
    out: &mut BTreeMap<String, RouteNode>,
) {
    for (name, entry) in entries {
        let path = join(prefix, &name);
        match entry {
            RouterEntry::Route(node) => {
                out.insert(path, node);
            }
            RouterEntry::Router(router) => flatten(router.entries, &path, out),
        }
    }
}

/// Immutable dotted-path → endpoint table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteNode>,
}

/// Introspection record for one route, served at `/routes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,
    pub kind: RouteKind,
    pub method: &'static str,
    pub description: String,
    pub protected: bool,
    pub input: Schema,
}

impl RouteTable {
    pub fn get(&self, path: &str) -> Option<&RouteNode> {
        self.routes.get(path)
    }

    /// Look up by individual segments, e.g. from an HTTP path.
    pub fn resolve_segments<S: AsRef<str>>(&self, segments: &[S]) -> Option<&RouteNode> {
        let path = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(".");
        self.get(&path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RouteNode)> {
        self.routes.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.routes.keys().map(|k| k.as_str()).collect()
    }

    pub fn describe(&self) -> Vec<RouteDescriptor> {
        self.routes
            .iter()
            .map(|(path, node)| RouteDescriptor {
                path: path.clone(),
                kind: node.kind(),
                method: node.kind().http_method(),
                description: node.description().to_string(),
                protected: node.is_protected(),
                input: node.input_schema().clone(),
            })
            .collect()
    }
}
