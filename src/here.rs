//! HERE adapters: public transit routing and traffic flow.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RouteError;
use crate::geo::{BoundingBox, GeoPoint};
use crate::mode::{ProviderFamily, TravelMode};
use crate::polyline;
use crate::traffic::TrafficFlowPayload;
use crate::traits::{RouteGeometry, RouteProvider, TrafficFlowProvider};

const TRANSIT_MODES: &str = "bus,tram,subway,train";

#[derive(Debug, Clone)]
pub struct HereConfig {
    pub transit_base_url: String,
    pub traffic_base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for HereConfig {
    fn default() -> Self {
        Self {
            transit_base_url: "https://transit.router.hereapi.com".to_string(),
            traffic_base_url: "https://traffic.ls.hereapi.com".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// One HTTP client serving both the transit router and the flow service.
#[derive(Debug, Clone)]
pub struct HereClient {
    config: HereConfig,
    client: reqwest::blocking::Client,
}

impl HereClient {
    pub fn new(config: HereConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for HereClient {
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Result<RouteGeometry, RouteError> {
        if mode.family() != ProviderFamily::Transit {
            return Err(RouteError::InvalidInput(format!(
                "{} routes are not served by the transit service",
                mode
            )));
        }

        let url = format!("{}/v8/routes", self.config.transit_base_url);
        let origin = origin.lat_lon();
        let destination = destination.lat_lon();
        debug!(%origin, %destination, "requesting transit route");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("transportMode", TRANSIT_MODES),
                ("return", "polyline,summary"),
                ("apiKey", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                warn!(%url, error = %err, "transit request failed");
                RouteError::ProviderUnavailable(err.to_string())
            })?;

        let text = response.text()?;
        parse_transit(&text)
    }
}

impl TrafficFlowProvider for HereClient {
    fn fetch_flow(&self, bbox: &BoundingBox) -> Option<TrafficFlowPayload> {
        let url = format!("{}/traffic/6.3/flow.json", self.config.traffic_base_url);
        let query = bbox.to_query();
        debug!(bbox = %query, "requesting traffic flow");

        let response = self
            .client
            .get(&url)
            .query(&[("bbox", query.as_str()), ("apiKey", self.config.api_key.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<TrafficFlowPayload>());

        match response {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "traffic flow unavailable, continuing without it");
                None
            }
        }
    }
}

/// Normalizes a transit routing body into a [`RouteGeometry`].
///
/// Only the first route is used. Each section carries its own polyline; the
/// decoded sections are joined in order and their summaries summed.
///
/// A section polyline is a self-contained encoding whose deltas start from
/// `(0, 0)`, so sections are decoded one by one rather than as a joined string.
pub fn parse_transit(text: &str) -> Result<RouteGeometry, RouteError> {
    let body: TransitResponse = serde_json::from_str(text)?;
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or(RouteError::NoRouteFound)?;
    if route.sections.is_empty() {
        return Err(RouteError::NoRouteFound);
    }

    let mut geometry = RouteGeometry {
        coordinates: Vec::new(),
        distance_meters: 0.0,
        duration_seconds: 0.0,
    };
    for section in &route.sections {
        geometry
            .coordinates
            .extend(polyline::decode(&section.polyline)?);
        geometry.distance_meters += section.summary.length;
        geometry.duration_seconds += section.summary.duration;
    }

    Ok(geometry)
}

#[derive(Debug, Deserialize)]
struct TransitResponse {
    #[serde(default)]
    routes: Vec<TransitRoute>,
}

#[derive(Debug, Deserialize)]
struct TransitRoute {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(default)]
    polyline: String,
    #[serde(default)]
    summary: SectionSummary,
}

#[derive(Debug, Default, Deserialize)]
struct SectionSummary {
    #[serde(default)]
    length: f64,
    #[serde(default)]
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn test_sections_are_joined_and_summed() {
        let geometry = parse_transit(
            r#"{"routes": [{"sections": [
                {"polyline": "_p~iF~ps|U", "summary": {"length": 800, "duration": 200}},
                {"polyline": "_ulLnnqC", "summary": {"length": 700, "duration": 100}}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(geometry.distance_meters, 1500.0);
        assert_eq!(geometry.duration_seconds, 300.0);
        assert_eq!(geometry.coordinates.len(), 2);
        assert_eq!(geometry.coordinates[0], GeoPoint { lat: 38.5, lon: -120.2 });
        assert_eq!(geometry.coordinates[1], GeoPoint { lat: 2.2, lon: -0.75 });
    }

    #[test]
    fn test_each_section_decodes_from_origin() {
        let first = polyline::encode(&[
            GeoPoint { lat: 14.5995, lon: 120.9842 },
            GeoPoint { lat: 14.6, lon: 120.98 },
        ]);
        let second = polyline::encode(&[GeoPoint { lat: 14.6091, lon: 120.9822 }]);
        let body = serde_json::json!({"routes": [{"sections": [
            {"polyline": first, "summary": {"length": 1, "duration": 1}},
            {"polyline": second, "summary": {"length": 1, "duration": 1}}
        ]}]});

        let geometry = parse_transit(&body.to_string()).unwrap();
        assert_eq!(
            geometry.coordinates,
            vec![
                GeoPoint { lat: 14.5995, lon: 120.9842 },
                GeoPoint { lat: 14.6, lon: 120.98 },
                GeoPoint { lat: 14.6091, lon: 120.9822 },
            ]
        );
    }

    #[test]
    fn test_only_first_route_counts() {
        let geometry = parse_transit(
            r#"{"routes": [
                {"sections": [{"polyline": "", "summary": {"length": 10, "duration": 60}}]},
                {"sections": [{"polyline": "", "summary": {"length": 99, "duration": 99}}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(geometry.distance_meters, 10.0);
        assert!(geometry.coordinates.is_empty());
    }

    #[test]
    fn test_no_routes() {
        assert!(matches!(
            parse_transit(r#"{"routes": []}"#).unwrap_err(),
            RouteError::NoRouteFound
        ));
        assert!(matches!(
            parse_transit(r#"{"notices": [{"code": "noCoverage"}]}"#).unwrap_err(),
            RouteError::NoRouteFound
        ));
        assert!(matches!(
            parse_transit(r#"{"routes": [{"sections": []}]}"#).unwrap_err(),
            RouteError::NoRouteFound
        ));
    }

    #[test]
    fn test_bad_polyline_is_decode_error() {
        let err = parse_transit(
            r#"{"routes": [{"sections": [{"polyline": "_", "summary": {"length": 1, "duration": 1}}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::Decode(DecodeError::Truncated { offset: 0 })));
    }

    #[test]
    fn test_unreachable_traffic_service_yields_none() {
        let client = HereClient::new(HereConfig {
            traffic_base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..HereConfig::default()
        })
        .unwrap();
        let bbox = BoundingBox::from_points(&[GeoPoint { lat: 1.0, lon: 1.0 }]).unwrap();
        assert!(client.fetch_flow(&bbox).is_none());
    }

    #[test]
    fn test_directions_mode_is_rejected() {
        let client = HereClient::new(HereConfig::default()).unwrap();
        let p = GeoPoint { lat: 0.0, lon: 0.0 };
        assert!(matches!(
            client.fetch_route(p, p, TravelMode::Car),
            Err(RouteError::InvalidInput(_))
        ));
    }
}
