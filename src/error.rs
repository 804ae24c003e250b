//! Error taxonomy for route computation.

use thiserror::Error;

/// Failure while decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("encoded polyline ends inside a value at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    #[error("polyline value starting at byte {offset} does not fit in 64 bits")]
    Overflow { offset: usize },

    #[error("polyline point starting at byte {offset} is outside latitude/longitude range")]
    OutOfRange { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// An endpoint is missing or out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider returned no usable route")]
    NoRouteFound,

    /// Transport failure, timeout, or non-success status on the routing call.
    #[error("routing provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered but the body did not have the documented shape.
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("malformed route geometry: {0}")]
    Decode(#[from] DecodeError),
}

impl RouteError {
    /// The single message shown to the person who asked for the route.
    pub fn user_message(&self) -> &'static str {
        match self {
            RouteError::InvalidInput(_) => "Please select both origin and destination.",
            RouteError::NoRouteFound => "No route found.",
            _ => "Failed to fetch route or traffic data.",
        }
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RouteError::InvalidResponse(err.to_string())
        } else {
            RouteError::ProviderUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        RouteError::InvalidResponse(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
