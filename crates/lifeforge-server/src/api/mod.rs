//! HTTP adapter for the route table.
//!
//! Every table entry `a.b.c` is served at `/api/a/b/c`: queries over GET
//! with a urlencoded query string, mutations over POST with a JSON body.
//! Errors always come back as `{ "error": message }`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lifeforge_core::rpc::{is_valid_segment, RequestContext, RouteInput, RouteKind, RouteNode};
use lifeforge_core::{AppState, RouteTable, ServerError};

#[derive(Clone)]
pub struct ApiState {
    pub app: AppState,
    pub table: Arc<RouteTable>,
}

/// Build the complete HTTP router: route table, meta endpoints and the JSON
/// 404 and 405 fallbacks.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/{*path}", get(handle_query).post(handle_mutation))
        .route("/health", get(health_check))
        .route("/routes", get(list_routes))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

/// GET /api/{path}: invoke a query route.
async fn handle_query(
    State(state): State<ApiState>,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let input = RouteInput::Query(query.unwrap_or_default());
    dispatch(&state, &uri, RouteKind::Query, &headers, input).await
}

/// POST /api/{path}: invoke a mutation route. An empty body counts as `{}`.
async fn handle_mutation(
    State(state): State<ApiState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let input = if body.iter().all(|b| b.is_ascii_whitespace()) {
        RouteInput::empty()
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => RouteInput::Json(value),
            Err(e) => {
                return ServerError::BadRequest(format!("Invalid JSON body: {}", e)).into_response()
            }
        }
    };
    dispatch(&state, &uri, RouteKind::Mutation, &headers, input).await
}

async fn dispatch(
    state: &ApiState,
    uri: &Uri,
    method_kind: RouteKind,
    headers: &HeaderMap,
    input: RouteInput,
) -> Response {
    // The raw path, so `a%2Fb` stays one (invalid) segment instead of
    // decoding into `a/b`.
    let path = uri.path().strip_prefix("/api/").unwrap_or_default();
    let dotted = dotted_path(path);
    let Some(node) = lookup(&state.table, path) else {
        return route_not_found(&dotted);
    };

    if node.kind() != method_kind {
        return error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            format!(
                "Route {} is a {} and must be called with {}",
                dotted,
                node.kind().as_str(),
                node.kind().http_method()
            ),
        );
    }

    let ctx = RequestContext::new(state.app.clone()).with_bearer(bearer_token(headers));
    tracing::debug!(route = %dotted, kind = node.kind().as_str(), "dispatching route");

    match node.invoke(ctx, input).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!(route = %dotted, error = %e, "route rejected request");
            }
            e.into_response()
        }
    }
}

/// `a/b/c` → `a.b.c`, for logs and error messages.
fn dotted_path(path: &str) -> String {
    path.split('/').collect::<Vec<_>>().join(".")
}

/// Every segment must be a valid router segment as sent: empty (`a//b`,
/// `a/b/`), dotted or percent-encoded segments never name a route.
fn lookup<'a>(table: &'a RouteTable, path: &str) -> Option<&'a RouteNode> {
    let segments: Vec<&str> = path.split('/').collect();
    if !segments.iter().all(|s| is_valid_segment(s)) {
        return None;
    }
    table.resolve_segments(&segments)
}

/// Token of an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim().to_string()).filter(|t| !t.is_empty())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn route_not_found(dotted: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("Route not found: {}", dotted))
}

async fn not_found(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches("/api").trim_matches('/');
    route_not_found(&path.replace('/', "."))
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {} is not allowed on {}", method, uri.path()),
    )
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": "lifeforge-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /routes: every registered route with its kind and input schema.
async fn list_routes(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "routes": state.table.describe() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_paths_map_to_dotted_paths() {
        assert_eq!(dotted_path("locations/search"), "locations.search");
        assert_eq!(dotted_path("a//b"), "a..b");
    }

    #[test]
    fn only_clean_segments_resolve() {
        let table = crate::build_route_table().unwrap();
        assert!(lookup(&table, "modules/list").is_some());
        for path in [
            "",
            "modules/list/",
            "modules//list",
            "modules%2Flist",
            "modules.list",
            "modules/list%3Fx%3D1",
        ] {
            assert!(lookup(&table, path).is_none(), "{path:?} should not resolve");
        }
    }

    #[test]
    fn bearer_tokens_are_extracted() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer s3cret".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("s3cret"));
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn bearer_scheme_ignores_case() {
        let mut headers = HeaderMap::new();
        for value in ["bearer s3cret", "BEARER s3cret", "BeArEr  s3cret"] {
            headers.insert(header::AUTHORIZATION, value.parse().unwrap());
            assert_eq!(bearer_token(&headers).as_deref(), Some("s3cret"), "{value:?}");
        }
    }
}
