//! Splits a route path into colored edges for drawing.

use serde::Serialize;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub positions: (GeoPoint, GeoPoint),
    pub color: String,
}

/// Joins each pair of consecutive coordinates into one segment, all sharing `color`.
pub fn build_segments(coords: &[GeoPoint], color: &str) -> Vec<RouteSegment> {
    coords
        .windows(2)
        .map(|pair| RouteSegment {
            positions: (pair[0], pair[1]),
            color: color.to_string(),
        })
        .collect()
}
