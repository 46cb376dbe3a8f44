//! Configuration management for the weather proxy
//!
//! Settings are layered: an optional TOML file, then `WEATHER_PROXY__`
//! prefixed environment variables, then the well-known `CWA_API_KEY` and
//! `PORT` variables. The result is validated once at startup and passed
//! explicitly to the client and the server.

use crate::ProxyError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Variable holding the CWA open-data API key
pub const API_KEY_VAR: &str = "CWA_API_KEY";
/// Variable holding the listen port
pub const PORT_VAR: &str = "PORT";

const ENV_PREFIX: &str = "WEATHER_PROXY";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream weather API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// CWA API key; data endpoints answer 500 without it
    pub api_key: Option<String>,
    /// Base URL of the CWA open-data API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Forecast dataset identifier
    #[serde(default = "default_dataset_id")]
    pub dataset_id: String,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_weather_base_url() -> String {
    "https://opendata.cwa.gov.tw/api".to_string()
}

fn default_dataset_id() -> String {
    "F-C0032-001".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            dataset_id: default_dataset_id(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the given file and the process environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(config_path, &env)
    }

    /// Load configuration from the given file and an explicit environment map
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(env.clone().into_iter().collect())),
            )
            .set_override_option("weather.api_key", env.get(API_KEY_VAR).cloned())
            .with_context(|| format!("Failed to apply {API_KEY_VAR}"))?
            .set_override_option("server.port", env.get(PORT_VAR).cloned())
            .with_context(|| format!("Failed to apply {PORT_VAR}"))?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Normalize values that deserialized but carry no information
    pub fn apply_defaults(&mut self) {
        if self
            .weather
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.weather.api_key = None;
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.dataset_id.is_empty() {
            self.weather.dataset_id = default_dataset_id();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    ///
    /// A missing API key is not an error here; the data endpoints report it.
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ProxyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ProxyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(
                ProxyError::config("Weather API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }

    /// Socket address string the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
