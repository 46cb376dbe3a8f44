//! CWA open-data response structures and conversion to the flat forecast model

use serde::Deserialize;

use crate::models::{ForecastRecord, LocationWeather};

/// Top-level datastore response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatastoreResponse {
    pub records: Records,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Records {
    pub dataset_description: String,
    pub location: Vec<CwaLocation>,
}

/// One county or city in the datastore response
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CwaLocation {
    pub location_name: String,
    pub weather_element: Vec<WeatherElement>,
}

/// A named weather variable reported as a time series
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeatherElement {
    pub element_name: String,
    pub time: Vec<TimeSlot>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    pub parameter: Parameter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameter {
    pub parameter_name: String,
    pub parameter_value: Option<String>,
    pub parameter_unit: Option<String>,
}

/// Element kinds the reshaper knows how to place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `Wx`
    Weather,
    /// `PoP`
    RainProbability,
    /// `MinT`
    MinTemperature,
    /// `MaxT`
    MaxTemperature,
    /// `CI`
    Comfort,
    /// `WS`
    WindSpeed,
    Unrecognized,
}

impl ElementKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Wx" => ElementKind::Weather,
            "PoP" => ElementKind::RainProbability,
            "MinT" => ElementKind::MinTemperature,
            "MaxT" => ElementKind::MaxTemperature,
            "CI" => ElementKind::Comfort,
            "WS" => ElementKind::WindSpeed,
            _ => ElementKind::Unrecognized,
        }
    }

    /// Write `value` into the record field this kind maps to
    fn apply(self, record: &mut ForecastRecord, value: &str) {
        match self {
            ElementKind::Weather => record.weather = value.to_string(),
            ElementKind::RainProbability => record.rain = format!("{value}%"),
            ElementKind::MinTemperature => record.min_temp = format!("{value}°C"),
            ElementKind::MaxTemperature => record.max_temp = format!("{value}°C"),
            ElementKind::Comfort => record.comfort = value.to_string(),
            ElementKind::WindSpeed => record.wind_speed = value.to_string(),
            ElementKind::Unrecognized => {}
        }
    }
}

/// Flatten element-oriented time series into one record per time slot.
///
/// The first element's time array is the index; its start and end times
/// label every record.
#[must_use]
pub fn reshape_elements(elements: &[WeatherElement]) -> Vec<ForecastRecord> {
    let Some(axis) = elements.first() else {
        return Vec::new();
    };

    axis.time
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let mut record = ForecastRecord {
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                ..ForecastRecord::default()
            };

            for element in elements {
                if let Some(entry) = element.time.get(i) {
                    ElementKind::from_name(&element.element_name)
                        .apply(&mut record, &entry.parameter.parameter_name);
                }
            }

            record
        })
        .collect()
}

impl LocationWeather {
    /// Create a location forecast from a CWA datastore location entry
    #[must_use]
    pub fn from_cwa(location: &CwaLocation, dataset_description: &str) -> Self {
        Self::new(
            location.location_name.clone(),
            dataset_description.to_string(),
            reshape_elements(&location.weather_element),
        )
    }
}

impl DatastoreResponse {
    /// Reshape every returned location, keeping upstream order
    #[must_use]
    pub fn into_location_weather(self) -> Vec<LocationWeather> {
        let description = self.records.dataset_description;
        self.records
            .location
            .iter()
            .map(|location| LocationWeather::from_cwa(location, &description))
            .collect()
    }
}
