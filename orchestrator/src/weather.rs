// orchestrator/src/weather.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Key used when the farmer's location is blank.
pub const DEFAULT_LOCATION: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub summary: String,
    /// Degrees Celsius.
    pub temperature: f64,
    pub precipitation: String,
    /// km/h
    pub wind_speed: f64,
    /// Percent.
    pub humidity: f64,
}

/// External forecast lookup. `None` means the location is not known.
#[async_trait]
pub trait ForecastLookup: Send + Sync {
    async fn forecast(&self, location: &str) -> Option<Forecast>;
}

/// Trimmed, lowercased, single-spaced; `default` when nothing is left.
pub fn normalize_location(location: &str) -> String {
    let normalized = location.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if normalized.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        normalized
    }
}

/// In-memory forecast table keyed by normalized district name.
#[derive(Debug, Clone, Default)]
pub struct SampleForecasts {
    table: HashMap<String, Forecast>,
}

impl SampleForecasts {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A handful of districts with typical pre-monsoon conditions.
    pub fn new() -> Self {
        let entries = [
            ("patna", "Hot and humid with a chance of evening thunderstorms", 36.0, "40% chance of light rain", 14.0, 68.0),
            ("delhi", "Clear skies and dry heat", 41.0, "No rain expected", 18.0, 22.0),
            ("lucknow", "Partly cloudy and warm", 38.0, "10% chance of drizzle", 12.0, 45.0),
            ("pune", "Mild with scattered clouds", 31.0, "20% chance of showers", 16.0, 55.0),
            ("ludhiana", "Sunny and dry", 39.0, "No rain expected", 20.0, 30.0),
            ("nagpur", "Very hot with hazy sunshine", 43.0, "No rain expected", 10.0, 18.0),
        ];

        let mut forecasts = Self::empty();
        for (location, summary, temperature, precipitation, wind_speed, humidity) in entries {
            forecasts.insert(
                location,
                Forecast {
                    summary: summary.to_string(),
                    temperature,
                    precipitation: precipitation.to_string(),
                    wind_speed,
                    humidity,
                },
            );
        }
        forecasts
    }

    pub fn insert(&mut self, location: &str, forecast: Forecast) {
        self.table.insert(normalize_location(location), forecast);
    }
}

#[async_trait]
impl ForecastLookup for SampleForecasts {
    async fn forecast(&self, location: &str) -> Option<Forecast> {
        let found = self.table.get(&normalize_location(location)).cloned();
        info!("[Weather] Forecast lookup for '{}': {}", location, if found.is_some() { "found" } else { "not found" });
        found
    }
}
