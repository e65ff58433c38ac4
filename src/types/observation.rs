//! Defines the per-city weather snapshot collected on every cycle.

use crate::utils::iso8601;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conditions reported by the weather API for one city, before they are stamped
/// with the time of the fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Air temperature in degrees Fahrenheit.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Short free-text description, e.g. "light rain".
    pub condition: String,
}

/// One city's weather at the moment it was fetched.
///
/// `timestamp` is the fetch-completion instant on our side, not the observation time
/// reported by the provider; the two can differ by several minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub city: String,
    pub temperature: f64,
    pub humidity: u8,
    pub condition: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

impl Observation {
    pub fn new(city: &str, conditions: CurrentConditions, timestamp: DateTime<Utc>) -> Self {
        Self {
            city: city.to_string(),
            temperature: conditions.temperature,
            humidity: conditions.humidity,
            condition: conditions.condition,
            timestamp,
        }
    }
}
