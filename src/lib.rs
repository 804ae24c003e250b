//! route-planner core
//!
//! Traffic-aware route computation: fetch a route from a routing provider,
//! enrich driving routes with traffic flow, and produce colored segments plus
//! a congestion-adjusted travel time.

pub mod config;
pub mod error;
pub mod geo;
pub mod here;
pub mod mode;
pub mod ors;
pub mod planner;
pub mod polyline;
pub mod segments;
pub mod session;
pub mod traffic;
pub mod traits;

pub use error::{ConfigError, DecodeError, RouteError};
pub use geo::{BoundingBox, GeoPoint};
pub use mode::TravelMode;
pub use planner::{RoutePlanner, RouteRequest, RouteResult};
pub use traffic::CongestionClass;
