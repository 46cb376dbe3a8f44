//! `cwa-weather-proxy` - Taiwan county and city forecasts over a small REST API
//!
//! Forwards requests to the Central Weather Administration open-data API,
//! flattens the element-oriented forecast into one record per time slot
//! and serves the result as JSON.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod regions;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::AppConfig;
pub use error::ProxyError;
pub use models::{ForecastRecord, LocationWeather};
pub use weather::{CwaClient, ForecastSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ProxyError>;
