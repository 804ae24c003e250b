//! Traffic flow payloads and congestion classification.
//!
//! The flow service reports jam factors (0 free-flowing, 10 blocked) nested
//! as roadways → roads → flow items → confidence records. The classifier
//! flattens those readings, averages them and maps the average onto one of
//! four congestion classes through a fixed threshold table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw traffic flow response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficFlowPayload {
    #[serde(rename = "RWS", default)]
    pub roadways: Vec<Roadway>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Roadway {
    #[serde(rename = "RW", default)]
    pub roads: Vec<Road>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Road {
    #[serde(rename = "FIS", default)]
    pub flow_items: Vec<FlowItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowItem {
    #[serde(rename = "CF", default)]
    pub confidence: Vec<ConfidenceRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfidenceRecord {
    #[serde(rename = "JamFactor", alias = "JF", default)]
    pub jam_factor: Option<f64>,
}

impl TrafficFlowPayload {
    /// Every jam factor in the payload, in document order.
    pub fn jam_factors(&self) -> Vec<f64> {
        self.roadways
            .iter()
            .flat_map(|rw| &rw.roads)
            .flat_map(|road| &road.flow_items)
            .flat_map(|item| &item.confidence)
            .filter_map(|conf| conf.jam_factor)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CongestionClass {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    High,
}

/// Ordered top-down; the first row whose threshold the average reaches wins.
const THRESHOLDS: [(f64, CongestionClass); 3] = [
    (7.0, CongestionClass::High),
    (4.0, CongestionClass::Medium),
    (2.0, CongestionClass::LowMedium),
];

impl CongestionClass {
    pub fn from_average_jam(avg_jam: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(threshold, _)| avg_jam >= *threshold)
            .map(|(_, class)| *class)
            .unwrap_or(CongestionClass::Low)
    }

    /// Factor applied to the provider's free-flow duration.
    pub const fn multiplier(self) -> f64 {
        match self {
            CongestionClass::High => 1.5,
            CongestionClass::Medium => 1.3,
            CongestionClass::LowMedium => 1.15,
            CongestionClass::Low => 1.0,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            CongestionClass::High => "red",
            CongestionClass::Medium => "orange",
            CongestionClass::LowMedium => "#1E90FF",
            CongestionClass::Low => "blue",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CongestionClass::High => "High",
            CongestionClass::Medium => "Medium",
            CongestionClass::LowMedium => "Low-Medium",
            CongestionClass::Low => "Low",
        }
    }
}

impl fmt::Display for CongestionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub multiplier: f64,
    pub color: &'static str,
    pub class: CongestionClass,
}

impl Classification {
    /// Used when no traffic data exists for a route.
    pub const DEFAULT: Classification = Classification::of(CongestionClass::Low);

    pub const fn of(class: CongestionClass) -> Self {
        Self {
            multiplier: class.multiplier(),
            color: class.color(),
            class,
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Classifies averaged jam-factor samples. An empty set averages to 0.
pub fn classify(samples: &[f64]) -> Classification {
    let avg_jam = if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    };
    Classification::of(CongestionClass::from_average_jam(avg_jam))
}

/// Classifies an optional payload; absence yields [`Classification::DEFAULT`].
pub fn classify_payload(payload: Option<&TrafficFlowPayload>) -> Classification {
    match payload {
        Some(payload) => classify(&payload.jam_factors()),
        None => Classification::DEFAULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_round_up_at_boundaries() {
        let cases = [
            (-1.0, CongestionClass::Low),
            (0.0, CongestionClass::Low),
            (1.9, CongestionClass::Low),
            (2.0, CongestionClass::LowMedium),
            (3.9, CongestionClass::LowMedium),
            (4.0, CongestionClass::Medium),
            (6.9, CongestionClass::Medium),
            (7.0, CongestionClass::High),
            (10.0, CongestionClass::High),
        ];
        for (avg, expected) in cases {
            assert_eq!(CongestionClass::from_average_jam(avg), expected, "avg {}", avg);
        }
    }

    #[test]
    fn test_table_values() {
        assert_eq!(classify(&[8.0]), Classification { multiplier: 1.5, color: "red", class: CongestionClass::High });
        assert_eq!(classify(&[5.0]), Classification { multiplier: 1.3, color: "orange", class: CongestionClass::Medium });
        assert_eq!(classify(&[2.5]), Classification { multiplier: 1.15, color: "#1E90FF", class: CongestionClass::LowMedium });
        assert_eq!(classify(&[1.0]), Classification { multiplier: 1.0, color: "blue", class: CongestionClass::Low });
    }

    #[test]
    fn test_class_accessors_match_table() {
        for class in [
            CongestionClass::Low,
            CongestionClass::LowMedium,
            CongestionClass::Medium,
            CongestionClass::High,
        ] {
            let c = Classification::of(class);
            assert_eq!(c.multiplier, class.multiplier());
            assert_eq!(c.color, class.color());
        }
    }

    #[test]
    fn test_empty_samples_match_missing_payload() {
        assert_eq!(classify(&[]), Classification::DEFAULT);
        assert_eq!(classify_payload(None), Classification::DEFAULT);
        assert_eq!(
            classify_payload(Some(&TrafficFlowPayload::default())),
            Classification::DEFAULT
        );
    }

    #[test]
    fn test_averages_samples() {
        // (3 + 5 + 7) / 3 = 5
        assert_eq!(classify(&[3.0, 5.0, 7.0]).class, CongestionClass::Medium);
    }

    #[test]
    fn test_payload_flattening() {
        let payload: TrafficFlowPayload = serde_json::from_str(
            r#"{
                "RWS": [
                    {"RW": [
                        {"FIS": [{"CF": [{"JamFactor": 6.0}, {"JF": 8.0}]}]},
                        {"FIS": [{"CF": [{"TY": "TR"}]}, {}]}
                    ]},
                    {"RW": [{"FIS": [{"CF": [{"JamFactor": 1.0}]}]}]},
                    {}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.jam_factors(), vec![6.0, 8.0, 1.0]);
        assert_eq!(classify_payload(Some(&payload)).class, CongestionClass::Medium);
    }

    #[test]
    fn test_payload_without_roadways() {
        let payload: TrafficFlowPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.jam_factors().is_empty());
    }
}
