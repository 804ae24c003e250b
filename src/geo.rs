//! Geographic primitives shared by every stage of route computation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Builds a point, rejecting coordinates outside the WGS84 ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, RouteError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RouteError::InvalidInput(format!("latitude {} out of range", lat)));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(RouteError::InvalidInput(format!("longitude {} out of range", lon)));
        }
        Ok(Self { lat, lon })
    }

    /// `"lon,lat"`, the order directions services expect.
    pub fn lon_lat(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }

    /// `"lat,lon"`, the order the transit service expects.
    pub fn lat_lon(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}

impl FromStr for GeoPoint {
    type Err = RouteError;

    /// Parses `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| RouteError::InvalidInput(format!("expected lat,lon but got {:?}", s)))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| RouteError::InvalidInput(format!("not a number: {:?}", part)))
        };
        GeoPoint::new(parse(lat)?, parse(lon)?)
    }
}

/// Minimal lat/lng-aligned rectangle enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Returns `None` for an empty point set.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let seed = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lon,
            max_lng: first.lon,
        };
        Some(points[1..].iter().fold(seed, |bbox, p| Self {
            min_lat: bbox.min_lat.min(p.lat),
            max_lat: bbox.max_lat.max(p.lat),
            min_lng: bbox.min_lng.min(p.lon),
            max_lng: bbox.max_lng.max(p.lon),
        }))
    }

    /// `"minLat,minLng;maxLat,maxLng"` as the traffic flow service takes it.
    pub fn to_query(&self) -> String {
        format!(
            "{},{};{},{}",
            self.min_lat, self.min_lng, self.max_lat, self.max_lng
        )
    }
}
