//! `locations`: free-text place search backed by Google Places.

use lifeforge_core::api::locations::{Location, Search, SearchParams, LOCATION_API_KEY_ID};
use lifeforge_core::rpc::{RequestContext, Route, Router, RouterError};
use lifeforge_core::ServerError;
use serde::Deserialize;

const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location";

pub fn router() -> Result<Router, RouterError> {
    Router::new().route(
        "search",
        Route::endpoint::<Search>("Search for places by free text").callback(search),
    )
}

#[derive(Debug, Default, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    display_name: Option<LocalizedText>,
    #[serde(default)]
    formatted_address: String,
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

async fn search(ctx: RequestContext, params: SearchParams) -> Result<Vec<Location>, ServerError> {
    let key = ctx.api_key(LOCATION_API_KEY_ID).await?;
    let state = ctx.state();

    let resp = state
        .http
        .post(&state.config.location_api_url)
        .header("X-Goog-Api-Key", key)
        .header("X-Goog-FieldMask", FIELD_MASK)
        .json(&serde_json::json!({ "textQuery": params.q }))
        .send()
        .await
        .map_err(|e| ServerError::Internal(format!("Place search request failed: {}", e)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ServerError::Internal(format!(
            "Place search returned HTTP {}",
            status.as_u16()
        )));
    }

    let body: PlacesResponse = resp
        .json()
        .await
        .map_err(|e| ServerError::Internal(format!("Failed to parse place search response: {}", e)))?;

    Ok(body.places.into_iter().filter_map(into_location).collect())
}

/// Places without coordinates are dropped.
fn into_location(place: Place) -> Option<Location> {
    let location = place.location?;
    Some(Location {
        name: place.display_name.map(|n| n.text).unwrap_or_default(),
        formatted_address: place.formatted_address,
        lat: location.latitude,
        lng: location.longitude,
    })
}
