//! Travel modes and their provider routing profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Car,
    Bicycle,
    Walking,
    Transit,
}

/// Which provider family answers a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    Directions,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Car,
        TravelMode::Bicycle,
        TravelMode::Walking,
        TravelMode::Transit,
    ];

    /// Provider routing profile identifier.
    pub fn profile(self) -> &'static str {
        match self {
            TravelMode::Car => "driving-car",
            TravelMode::Bicycle => "cycling-regular",
            TravelMode::Walking => "foot-walking",
            TravelMode::Transit => "commute",
        }
    }

    pub fn family(self) -> ProviderFamily {
        match self {
            TravelMode::Transit => ProviderFamily::Transit,
            _ => ProviderFamily::Directions,
        }
    }

    /// Only driving routes are enriched with traffic flow.
    pub fn uses_traffic(self) -> bool {
        self == TravelMode::Car
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TravelMode::Car => "car",
            TravelMode::Bicycle => "bicycle",
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
        };
        f.write_str(name)
    }
}

impl FromStr for TravelMode {
    type Err = RouteError;

    /// Accepts the short name or the profile identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TravelMode::ALL
            .into_iter()
            .find(|mode| mode.to_string() == needle || mode.profile() == needle)
            .ok_or_else(|| RouteError::InvalidInput(format!("unknown travel mode {:?}", s)))
    }
}
