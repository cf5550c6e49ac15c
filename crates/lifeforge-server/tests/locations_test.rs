//! `locations.search` against a mock place-search upstream.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Json;
use lifeforge_core::models::ApiKeyEntry;
use lifeforge_server::{build_app, build_route_table, create_app_state, ServerConfig};

const MASTER_KEY: &str = "test-master-key";
const UPSTREAM_KEY: &str = "AIza-upstream";

async fn mock_places(
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok());
    if key != Some(UPSTREAM_KEY) {
        return Err(StatusCode::FORBIDDEN);
    }
    if body["textQuery"] != "Singapore" {
        return Ok(Json(serde_json::json!({})));
    }
    Ok(Json(serde_json::json!({
        "places": [
            {
                "displayName": { "text": "Singapore", "languageCode": "en" },
                "formattedAddress": "Singapore",
                "location": { "latitude": 1.3521, "longitude": 103.8198 }
            },
            {
                "displayName": { "text": "Singapore Botanic Gardens" },
                "formattedAddress": "1 Cluny Rd, Singapore 259569",
                "location": { "latitude": 1.3138, "longitude": 103.8159 }
            }
        ]
    })))
}

async fn spawn_upstream() -> String {
    let app = axum::Router::new().route("/v1/places:searchText", post(mock_places));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1/places:searchText", addr)
}

/// Serve the full app on a random port and return its base URL.
async fn spawn_server(location_api_url: String, api_key: Option<&str>) -> String {
    let config = ServerConfig {
        db_path: ":memory:".to_string(),
        master_key: Some(MASTER_KEY.to_string()),
        location_api_url,
        ..ServerConfig::default()
    };
    let state = create_app_state(&config).await.unwrap();
    if let Some(key) = api_key {
        state
            .api_key_store
            .save(&ApiKeyEntry::new("gcloud".into(), "Google Cloud".into(), key.into()))
            .await
            .unwrap();
    }
    let app = build_app(state, Arc::new(build_route_table().unwrap()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_search_returns_locations() {
    let upstream = spawn_upstream().await;
    let base_url = spawn_server(upstream, Some(UPSTREAM_KEY)).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/locations/search", base_url))
        .query(&[("q", "Singapore")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "Singapore");
    assert_eq!(results[0]["formattedAddress"], "Singapore");
    assert_eq!(results[1]["lat"], 1.3138);
}

#[tokio::test]
async fn test_search_without_key_returns_no_results() {
    let upstream = spawn_upstream().await;
    let base_url = spawn_server(upstream, None).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/locations/search?q=Singapore", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "API key not found");
}

#[tokio::test]
async fn test_rejected_upstream_key_is_an_internal_error() {
    let upstream = spawn_upstream().await;
    let base_url = spawn_server(upstream, Some("revoked")).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/locations/search?q=Singapore", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
}
