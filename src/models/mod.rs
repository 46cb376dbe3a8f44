//! Data models served by the proxy

pub mod forecast;

pub use forecast::{ForecastRecord, LocationWeather};
