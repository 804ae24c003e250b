//! Provider seams for the route planner.
//!
//! The planner only talks to routing and traffic services through these
//! traits. Concrete HTTP clients live in `ors` and `here`; tests plug in
//! in-memory implementations.

use crate::error::RouteError;
use crate::geo::{BoundingBox, GeoPoint};
use crate::mode::TravelMode;
use crate::traffic::TrafficFlowPayload;

/// A provider's route, normalized to lat-first coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub coordinates: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Fetches one route between two resolved points.
pub trait RouteProvider: Send + Sync {
    /// Returns `NoRouteFound` when the service answers without a route and
    /// `ProviderUnavailable` on transport or HTTP failure.
    fn fetch_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Result<RouteGeometry, RouteError>;
}

/// Best-effort traffic flow lookup.
///
/// Failures are logged by the implementation and reported as `None`; traffic
/// is enrichment and never fails a route computation.
pub trait TrafficFlowProvider: Send + Sync {
    fn fetch_flow(&self, bbox: &BoundingBox) -> Option<TrafficFlowPayload>;
}

/// A traffic source that never has data. Useful when no flow key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTraffic;

impl TrafficFlowProvider for NoTraffic {
    fn fetch_flow(&self, _bbox: &BoundingBox) -> Option<TrafficFlowPayload> {
        None
    }
}
