//! Provider configuration sourced from the environment.

use crate::error::ConfigError;
use crate::here::HereConfig;
use crate::ors::OrsConfig;

pub const ORS_API_KEY: &str = "ORS_API_KEY";
pub const HERE_API_KEY: &str = "HERE_API_KEY";
pub const ORS_BASE_URL: &str = "ORS_BASE_URL";
pub const HERE_TRANSIT_BASE_URL: &str = "HERE_TRANSIT_BASE_URL";
pub const HERE_TRAFFIC_BASE_URL: &str = "HERE_TRAFFIC_BASE_URL";
pub const TIMEOUT_SECS: &str = "ROUTE_PLANNER_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub ors: OrsConfig,
    pub here: HereConfig,
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let timeout_secs = match get(TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: TIMEOUT_SECS,
                        value: raw,
                    });
                }
            },
            None => OrsConfig::default().timeout_secs,
        };

        let ors_defaults = OrsConfig::default();
        let here_defaults = HereConfig::default();

        Ok(Self {
            ors: OrsConfig {
                base_url: get(ORS_BASE_URL).unwrap_or(ors_defaults.base_url),
                api_key: required(ORS_API_KEY)?,
                timeout_secs,
            },
            here: HereConfig {
                transit_base_url: get(HERE_TRANSIT_BASE_URL)
                    .unwrap_or(here_defaults.transit_base_url),
                traffic_base_url: get(HERE_TRAFFIC_BASE_URL)
                    .unwrap_or(here_defaults.traffic_base_url),
                api_key: required(HERE_API_KEY)?,
                timeout_secs,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_keys_only() {
        let config =
            ProviderConfig::from_lookup(lookup(&[(ORS_API_KEY, "ors"), (HERE_API_KEY, "here")]))
                .unwrap();
        assert_eq!(config.ors.api_key, "ors");
        assert_eq!(config.ors.base_url, "https://api.openrouteservice.org");
        assert_eq!(config.here.api_key, "here");
        assert_eq!(config.here.transit_base_url, "https://transit.router.hereapi.com");
        assert_eq!(config.ors.timeout_secs, 10);
        assert_eq!(config.here.timeout_secs, 10);
    }

    #[test]
    fn test_overrides() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (ORS_API_KEY, "ors"),
            (HERE_API_KEY, "here"),
            (ORS_BASE_URL, "http://localhost:8080"),
            (HERE_TRAFFIC_BASE_URL, "http://localhost:8081"),
            (TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(config.ors.base_url, "http://localhost:8080");
        assert_eq!(config.here.traffic_base_url, "http://localhost:8081");
        assert_eq!(config.here.timeout_secs, 3);
    }

    #[test]
    fn test_missing_key() {
        let err = ProviderConfig::from_lookup(lookup(&[(ORS_API_KEY, "ors"), (HERE_API_KEY, " ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(HERE_API_KEY));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ProviderConfig::from_lookup(lookup(&[
            (ORS_API_KEY, "ors"),
            (HERE_API_KEY, "here"),
            (TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: TIMEOUT_SECS, .. }));
    }
}
