//! HTTP surface tests, driven in-process with `oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use lifeforge_core::rpc::{Input, Route, Router};
use lifeforge_core::{AppState, ServerError};
use lifeforge_server::{build_app, build_route_table, create_app_state, ServerConfig};
use schemars::JsonSchema;
use serde::Deserialize;
use tower::util::ServiceExt;

const MASTER_KEY: &str = "test-master-key";

async fn test_state() -> AppState {
    let config = ServerConfig {
        db_path: ":memory:".to_string(),
        master_key: Some(MASTER_KEY.to_string()),
        ..ServerConfig::default()
    };
    create_app_state(&config).await.unwrap()
}

async fn create_app() -> (axum::Router, AppState) {
    let state = test_state().await;
    let table = Arc::new(build_route_table().unwrap());
    (build_app(state.clone(), table), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[derive(Debug, Deserialize, JsonSchema)]
struct Sample {
    n: u32,
}

impl Input for Sample {
    fn validate(&self) -> Result<(), String> {
        if self.n > 10 {
            return Err("n must be at most 10".into());
        }
        Ok(())
    }
}

/// App with a `sample` router whose handler invocations are counted.
async fn sample_app(calls: Arc<AtomicUsize>) -> axum::Router {
    let counted = calls.clone();
    let sample = Router::new()
        .route(
            "check",
            Route::query("Echo n back")
                .input::<Sample>()
                .callback(move |_ctx, input: Sample| {
                    let calls = counted.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ServerError>(serde_json::json!({ "n": input.n }))
                    }
                }),
        )
        .unwrap()
        .route(
            "reject",
            Route::mutation("Always a client error")
                .input::<lifeforge_core::rpc::Empty>()
                .callback(|_ctx, _input| async {
                    Err::<(), _>(ServerError::BadRequest("Title is required".into()))
                }),
        )
        .unwrap()
        .route(
            "explode",
            Route::mutation("Always an internal error")
                .input::<lifeforge_core::rpc::Empty>()
                .callback(|_ctx, _input| async {
                    Err::<(), _>(ServerError::Internal("disk on fire at /var/lib".into()))
                }),
        )
        .unwrap();

    let table = Router::compose([("sample", sample)]).unwrap().into_table();
    build_app(test_state().await, Arc::new(table))
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_app().await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, get("/api/nope/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found: nope.missing");

    let (status, body) = send(&app, post("/api/locations", serde_json::json!({}), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found: locations");

    let (status, _) = send(&app, get("/api/locations.search?q=x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/elsewhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Route not found"));
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, post("/api/modules/list", serde_json::json!({}), None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].as_str().unwrap().contains("GET"));

    let (status, _) = send(&app, get("/api/modules/toggle?name=music")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_other_methods_get_a_json_405() {
    let (app, _) = create_app().await;

    for method in ["PUT", "DELETE", "PATCH"] {
        let req = Request::builder()
            .method(method)
            .uri("/api/modules/list")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(
            body["error"],
            format!("Method {} is not allowed on /api/modules/list", method)
        );
    }
}

#[tokio::test]
async fn test_encoded_or_empty_segments_are_404() {
    let (app, _) = create_app().await;

    for uri in [
        "/api/modules%2Flist",
        "/api/modules%2flist",
        "/api/modules//list",
        "/api/modules/list/",
        "/api/modules/list%3Fx%3D1",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].as_str().unwrap().starts_with("Route not found"), "{uri}");
    }

    let (status, _) = send(&app, get("/api/modules/list")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = sample_app(calls.clone()).await;

    let (status, body) = send(&app, get("/api/sample/check?n=42")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));

    let (status, _) = send(&app, get("/api/sample/check")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/sample/check?n=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (status, body) = send(&app, get("/api/sample/check?n=7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n"], 7);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_client_and_internal_error_messages() {
    let app = sample_app(Arc::new(AtomicUsize::new(0))).await;

    let (status, body) = send(&app, post("/api/sample/reject", serde_json::json!({}), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "error": "Title is required" }));

    let (status, body) = send(&app, post("/api/sample/explode", serde_json::json!({}), None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_malformed_json_body_is_400() {
    let (app, _) = create_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/modules/toggle")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_protected_mutation_requires_master_key() {
    let (app, state) = create_app().await;
    let input = serde_json::json!({ "id": "gcloud", "name": "Google Cloud", "key": "AIza-123456789" });

    let (status, body) = send(&app, post("/api/apiKeys/set", input.clone(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing bearer token");

    let (status, body) = send(&app, post("/api/apiKeys/set", input.clone(), Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid bearer token");

    assert!(state.api_key_store.get("gcloud").await.unwrap().is_none());

    let (status, body) = send(&app, post("/api/apiKeys/set", input, Some(MASTER_KEY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "gcloud");
    assert_eq!(body["key"], "**********6789");

    let (status, body) = send(&app, get("/api/apiKeys/list")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["key"], "**********6789");

    let (status, body) = send(
        &app,
        post("/api/apiKeys/delete", serde_json::json!({ "id": "gcloud" }), Some(MASTER_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let (app, state) = create_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/apiKeys/set")
        .header("content-type", "application/json")
        .header("authorization", format!("bearer {}", MASTER_KEY))
        .body(Body::from(
            serde_json::json!({ "id": "gcloud", "name": "Google Cloud", "key": "AIza-123456789" })
                .to_string(),
        ))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(state.api_key_store.get("gcloud").await.unwrap().is_some());
}

#[tokio::test]
async fn test_module_toggle() {
    let (app, state) = create_app().await;

    let (status, body) = send(
        &app,
        post("/api/modules/toggle", serde_json::json!({ "name": "settings" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Module settings cannot be toggled");

    let (status, _) = send(
        &app,
        post("/api/modules/toggle", serde_json::json!({ "name": "podcasts" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post("/api/modules/toggle", serde_json::json!({ "name": "music", "enabled": false }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);
    assert_eq!(state.settings_store.module_enabled("music").await.unwrap(), Some(false));

    let (_, modules) = send(&app, get("/api/modules/list")).await;
    let music = modules
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == "music")
        .unwrap();
    assert_eq!(music["enabled"], false);

    let (_, nav) = send(&app, get("/api/modules/navigation")).await;
    let names: Vec<&str> = nav
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| c["items"].as_array().unwrap())
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"music"));
    assert!(names.contains(&"movies"));

    // Omitting `enabled` flips the flag back.
    let (_, body) = send(
        &app,
        post("/api/modules/toggle", serde_json::json!({ "name": "music" }), None),
    )
    .await;
    assert_eq!(body["enabled"], true);
}

#[tokio::test]
async fn test_navigation_follows_category_order() {
    let (app, _) = create_app().await;
    let (status, nav) = send(&app, get("/api/modules/navigation")).await;
    assert_eq!(status, StatusCode::OK);
    let categories: Vec<&str> = nav
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["Productivity", "Lifestyle", "Information", "System"]);
}

#[tokio::test]
async fn test_route_index() {
    let (app, _) = create_app().await;
    let (status, body) = send(&app, get("/routes")).await;
    assert_eq!(status, StatusCode::OK);

    let routes = body["routes"].as_array().unwrap();
    let search = routes
        .iter()
        .find(|r| r["path"] == "locations.search")
        .unwrap();
    assert_eq!(search["kind"], "query");
    assert_eq!(search["method"], "GET");
    assert_eq!(search["protected"], false);
    assert!(search["input"]["properties"]["q"].is_object());

    let set = routes.iter().find(|r| r["path"] == "apiKeys.set").unwrap();
    assert_eq!(set["protected"], true);
}

#[tokio::test]
async fn test_location_search_without_key_is_a_client_error() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, get("/api/locations/search?q=Singapore")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "error": "API key not found" }));

    let (status, body) = send(&app, get("/api/locations/search?q=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("q must not be empty"));
}

#[tokio::test]
async fn test_create_app_state_requires_master_key() {
    let config = ServerConfig {
        db_path: ":memory:".to_string(),
        ..ServerConfig::default()
    };
    let err = create_app_state(&config).await.err().unwrap();
    assert_eq!(err, "MASTER_KEY is not set");
}
