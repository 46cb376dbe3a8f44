use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    ProxyError, Result, VERSION,
    models::LocationWeather,
    regions::{self, KAOHSIUNG, VALID_CITIES},
    weather::ForecastSource,
};

pub mod response;

pub use response::{ApiError, ApiSuccess};

/// Shared handler state; holds nothing mutable
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn ForecastSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn ForecastSource>) -> Self {
        Self { source }
    }
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/weather/kaohsiung", get(get_kaohsiung))
        .route("/weather/city/", get(get_city))
        .route("/weather/city/{city_name}", get(get_city))
        .route("/weather/all", get(get_all))
        .method_not_allowed_fallback(not_found)
}

/// Service description served at `/`
pub async fn index() -> Json<Value> {
    let example = format!(
        "/api/weather/city/{}",
        urlencoding::encode(VALID_CITIES[0])
    );

    Json(json!({
        "message": "Taiwan county and city weather forecast API",
        "version": VERSION,
        "validCities": VALID_CITIES,
        "endpoints": {
            "health": "/api/health",
            "kaohsiung": "/api/weather/kaohsiung",
            "city": "/api/weather/city/:cityName",
            "all": "/api/weather/all",
        },
        "example": example,
    }))
}

/// Answer for any unmatched route
pub async fn not_found(uri: Uri) -> Response {
    ApiError::new("not found", format!("No route for {}", uri.path()))
        .with_status(StatusCode::NOT_FOUND)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn get_kaohsiung(
    State(state): State<AppState>,
) -> Result<Json<ApiSuccess<LocationWeather>>> {
    let weather = first_location(fetch_forecasts(&state, Some(KAOHSIUNG), false).await?)?;
    Ok(Json(ApiSuccess::new(weather)))
}

// Serves both the empty and the named form of the route.
async fn get_city(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<ApiSuccess<LocationWeather>>> {
    let city_name = city_from_path(&uri);
    let weather = first_location(fetch_forecasts(&state, Some(&city_name), true).await?)?;
    Ok(Json(ApiSuccess::new(weather)))
}

/// Percent-decoded last path segment. Bytes that are not UTF-8 are
/// replaced, so such names fail the allow-list instead of extraction.
fn city_from_path(uri: &Uri) -> String {
    let raw = uri.path().rsplit('/').next().unwrap_or_default();
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

async fn get_all(State(state): State<AppState>) -> Result<Json<ApiSuccess<Vec<LocationWeather>>>> {
    let weather = fetch_forecasts(&state, None, false).await?;
    Ok(Json(ApiSuccess::new(weather)))
}

/// Shared path of every data endpoint: precondition check, optional
/// allow-list check, fetch, empty-result check.
async fn fetch_forecasts(
    state: &AppState,
    region: Option<&str>,
    check_allow_list: bool,
) -> Result<Vec<LocationWeather>> {
    state.source.ensure_ready()?;

    if check_allow_list {
        let name = region.unwrap_or_default();
        if !regions::is_valid_city(name) {
            return Err(ProxyError::invalid_city(name));
        }
    }

    let forecasts = state.source.fetch(region).await?;
    debug!("Fetched {} locations for {:?}", forecasts.len(), region);

    if forecasts.is_empty() {
        return Err(match region {
            Some(name) => ProxyError::not_found(format!("No forecast data for {name}")),
            None => ProxyError::not_found("No forecast data returned for any city"),
        });
    }

    Ok(forecasts)
}

fn first_location(forecasts: Vec<LocationWeather>) -> Result<LocationWeather> {
    forecasts
        .into_iter()
        .next()
        .ok_or_else(|| ProxyError::not_found("No forecast data"))
}
