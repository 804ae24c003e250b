//! OpenRouteService adapter for car, bicycle and walking directions.

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::RouteError;
use crate::geo::GeoPoint;
use crate::mode::{ProviderFamily, TravelMode};
use crate::traits::{RouteGeometry, RouteProvider};

/// ORS error codes meaning the request was fine but no route exists.
const NO_ROUTE_CODES: [u32; 2] = [2009, 2010];

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for OrsClient {
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Result<RouteGeometry, RouteError> {
        if mode.family() != ProviderFamily::Directions {
            return Err(RouteError::InvalidInput(format!(
                "{} routes are not served by the directions service",
                mode
            )));
        }

        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url,
            mode.profile()
        );
        let body = json!({
            "coordinates": [[origin.lon, origin.lat], [destination.lon, destination.lat]]
        });
        debug!(
            profile = mode.profile(),
            start = %origin.lon_lat(),
            end = %destination.lon_lat(),
            "requesting directions"
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|err| {
                warn!(%url, error = %err, "directions request failed");
                RouteError::ProviderUnavailable(err.to_string())
            })?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(error_from_body(status, &text));
        }

        parse_directions(&text)
    }
}

/// Normalizes a GeoJSON directions body into a [`RouteGeometry`].
pub fn parse_directions(text: &str) -> Result<RouteGeometry, RouteError> {
    let body: DirectionsResponse = serde_json::from_str(text)?;
    let feature = body
        .features
        .into_iter()
        .next()
        .ok_or(RouteError::NoRouteFound)?;

    let coordinates = feature
        .geometry
        .coordinates
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint { lat: *lat, lon: *lon }),
            other => Err(RouteError::InvalidResponse(format!(
                "position with {} ordinates",
                other.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let summary = feature.properties.summary;
    Ok(RouteGeometry {
        coordinates,
        distance_meters: summary.distance,
        duration_seconds: summary.duration,
    })
}

fn error_from_body(status: reqwest::StatusCode, text: &str) -> RouteError {
    match serde_json::from_str::<ErrorPayload>(text) {
        Ok(payload) if NO_ROUTE_CODES.contains(&payload.error.code) => {
            debug!(code = payload.error.code, message = %payload.error.message, "no route");
            RouteError::NoRouteFound
        }
        Ok(payload) => RouteError::ProviderUnavailable(format!(
            "HTTP {} (code {}): {}",
            status, payload.error.code, payload.error.message
        )),
        Err(_) => {
            warn!(%status, body = %text, "unstructured directions error");
            RouteError::ProviderUnavailable(format!("HTTP {}", status))
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    summary: Summary,
}

// ORS omits both fields for zero-length routes.
#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: u32,
    #[serde(default)]
    message: String,
}
