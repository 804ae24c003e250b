//! Route orchestration.
//!
//! [`RoutePlanner::compute_route`] picks the provider for the travel mode,
//! fetches the route, enriches driving routes with traffic flow and turns the
//! result into colored segments plus a congestion-adjusted travel time.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::error::RouteError;
use crate::geo::{BoundingBox, GeoPoint};
use crate::here::HereClient;
use crate::mode::{ProviderFamily, TravelMode};
use crate::ors::OrsClient;
use crate::segments::{RouteSegment, build_segments};
use crate::traffic::{Classification, CongestionClass, classify_payload};
use crate::traits::{RouteProvider, TrafficFlowProvider};

/// One user request. Endpoints are optional until the user has picked both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub mode: TravelMode,
}

impl RouteRequest {
    pub fn new(origin: GeoPoint, destination: GeoPoint, mode: TravelMode) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            mode,
        }
    }

    /// Same request with origin and destination exchanged.
    pub fn swapped(self) -> Self {
        Self {
            origin: self.destination,
            destination: self.origin,
            mode: self.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub coordinates: Vec<GeoPoint>,
    pub segments: Vec<RouteSegment>,
    pub distance_meters: f64,
    pub travel_time_minutes: u32,
    pub congestion: CongestionClass,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

impl fmt::Display for RouteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distance: {:.2} km", self.distance_km())?;
        writeln!(f, "Estimated Travel Time: {} mins", self.travel_time_minutes)?;
        write!(f, "Traffic Level: {}", self.congestion)
    }
}

/// Minutes after applying the congestion multiplier, rounded up.
pub fn adjusted_minutes(duration_seconds: f64, multiplier: f64) -> u32 {
    ((duration_seconds / 60.0) * multiplier).ceil().max(0.0) as u32
}

pub struct RoutePlanner {
    directions: Arc<dyn RouteProvider>,
    transit: Arc<dyn RouteProvider>,
    traffic: Arc<dyn TrafficFlowProvider>,
}

impl RoutePlanner {
    pub fn new(
        directions: Arc<dyn RouteProvider>,
        transit: Arc<dyn RouteProvider>,
        traffic: Arc<dyn TrafficFlowProvider>,
    ) -> Self {
        Self {
            directions,
            transit,
            traffic,
        }
    }

    /// Wires the HTTP clients for OpenRouteService and HERE.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let here = Arc::new(HereClient::new(config.here.clone())?);
        let ors = Arc::new(OrsClient::new(config.ors.clone())?);
        Ok(Self::new(ors, here.clone(), here))
    }

    fn provider_for(&self, mode: TravelMode) -> &dyn RouteProvider {
        match mode.family() {
            ProviderFamily::Directions => self.directions.as_ref(),
            ProviderFamily::Transit => self.transit.as_ref(),
        }
    }

    pub fn compute_route(
        &self,
        origin: Option<GeoPoint>,
        destination: Option<GeoPoint>,
        mode: TravelMode,
    ) -> Result<RouteResult, RouteError> {
        let origin = origin.ok_or_else(|| RouteError::InvalidInput("missing origin".into()))?;
        let destination =
            destination.ok_or_else(|| RouteError::InvalidInput("missing destination".into()))?;

        let geometry = self
            .provider_for(mode)
            .fetch_route(origin, destination, mode)?;
        debug!(
            %mode,
            points = geometry.coordinates.len(),
            distance = geometry.distance_meters,
            duration = geometry.duration_seconds,
            "route received"
        );

        let classification = if mode.uses_traffic() {
            let payload = BoundingBox::from_points(&geometry.coordinates)
                .and_then(|bbox| self.traffic.fetch_flow(&bbox));
            classify_payload(payload.as_ref())
        } else {
            Classification::DEFAULT
        };

        let result = RouteResult {
            segments: build_segments(&geometry.coordinates, classification.color),
            coordinates: geometry.coordinates,
            distance_meters: geometry.distance_meters,
            travel_time_minutes: adjusted_minutes(
                geometry.duration_seconds,
                classification.multiplier,
            ),
            congestion: classification.class,
        };
        info!(
            %mode,
            minutes = result.travel_time_minutes,
            congestion = %result.congestion,
            "route computed"
        );
        Ok(result)
    }

    pub fn compute(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        self.compute_route(request.origin, request.destination, request.mode)
    }

    /// Computes independent requests in parallel, results in input order.
    pub fn compute_routes(&self, requests: &[RouteRequest]) -> Vec<Result<RouteResult, RouteError>> {
        requests.par_iter().map(|request| self.compute(request)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_minutes_rounds_up() {
        assert_eq!(adjusted_minutes(300.0, 1.3), 7);
        assert_eq!(adjusted_minutes(300.0, 1.0), 5);
        assert_eq!(adjusted_minutes(300.0, 1.15), 6);
        assert_eq!(adjusted_minutes(301.0, 1.0), 6);
        assert_eq!(adjusted_minutes(0.0, 1.5), 0);
    }

    #[test]
    fn test_swapped() {
        let a = GeoPoint { lat: 1.0, lon: 2.0 };
        let b = GeoPoint { lat: 3.0, lon: 4.0 };
        let request = RouteRequest::new(a, b, TravelMode::Walking).swapped();
        assert_eq!(request.origin, Some(b));
        assert_eq!(request.destination, Some(a));
        assert_eq!(request.mode, TravelMode::Walking);
    }

    #[test]
    fn test_result_card() {
        let result = RouteResult {
            coordinates: vec![],
            segments: vec![],
            distance_meters: 1500.0,
            travel_time_minutes: 7,
            congestion: CongestionClass::LowMedium,
        };
        assert_eq!(
            result.to_string(),
            "Distance: 1.50 km\nEstimated Travel Time: 7 mins\nTraffic Level: Low-Medium"
        );
    }
}
