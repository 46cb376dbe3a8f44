//! Reshaped forecast model served to clients

use serde::{Deserialize, Serialize};

/// One forecast time slot with every weather field flattened to a string.
///
/// A field is empty when the upstream did not report that element for the
/// slot. An element reported with an empty value looks the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub start_time: String,
    pub end_time: String,
    /// Weather condition text (`Wx`)
    pub weather: String,
    /// Probability of precipitation with a `%` suffix (`PoP`)
    pub rain: String,
    /// Minimum temperature with a `°C` suffix (`MinT`)
    pub min_temp: String,
    /// Maximum temperature with a `°C` suffix (`MaxT`)
    pub max_temp: String,
    /// Comfort index text (`CI`)
    pub comfort: String,
    /// Wind speed as reported (`WS`)
    pub wind_speed: String,
}

/// Forecast for a single county or city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationWeather {
    /// Region name as reported upstream
    pub city: String,
    /// Upstream dataset description
    pub update_time: String,
    /// Records in upstream time order
    pub forecasts: Vec<ForecastRecord>,
}

impl LocationWeather {
    /// Create a new location forecast
    #[must_use]
    pub fn new(city: String, update_time: String, forecasts: Vec<ForecastRecord>) -> Self {
        Self {
            city,
            update_time,
            forecasts,
        }
    }
}
