//! Error types for the weather proxy

use serde_json::Value;
use thiserror::Error;

use crate::regions;

/// Everything that can end a forecast request early
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Service started without the settings it needs to talk upstream
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Region name outside the allow-list
    #[error("Invalid city: '{city}'")]
    InvalidCity { city: String },

    /// Upstream answered but had no matching location
    #[error("No data: {message}")]
    NotFound { message: String },

    /// Upstream answered with a non-2xx status
    #[error("Upstream error: status {status}")]
    Upstream { status: u16, body: Value },

    /// Upstream could not be reached at all
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Upstream answered 2xx with a body we could not decode
    #[error("Invalid upstream response: {message}")]
    InvalidResponse { message: String },
}

impl ProxyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid-city error
    pub fn invalid_city<S: Into<String>>(city: S) -> Self {
        Self::InvalidCity { city: city.into() }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// HTTP status code this error is answered with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Config { .. }
            | ProxyError::Transport { .. }
            | ProxyError::InvalidResponse { .. } => 500,
            ProxyError::InvalidCity { .. } => 400,
            ProxyError::NotFound { .. } => 404,
            ProxyError::Upstream { status, .. } => *status,
        }
    }

    /// Short machine-readable kind, used as the `error` field
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Config { .. } => "server misconfigured",
            ProxyError::InvalidCity { .. } => "invalid city",
            ProxyError::NotFound { .. } => "no data",
            ProxyError::Upstream { .. } => "upstream error",
            ProxyError::Transport { .. } => "upstream unreachable",
            ProxyError::InvalidResponse { .. } => "invalid upstream response",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ProxyError::Config { .. } => {
                "Server is missing its CWA API key. Set CWA_API_KEY and restart.".to_string()
            }
            ProxyError::InvalidCity { city } => format!(
                "Unknown city '{city}'. Valid cities: {}",
                regions::valid_cities_list()
            ),
            ProxyError::NotFound { message } => message.clone(),
            ProxyError::Upstream { status, .. } => {
                format!("CWA API responded with status {status}")
            }
            ProxyError::Transport { .. } => {
                "Unable to reach the CWA API. Please try again later.".to_string()
            }
            ProxyError::InvalidResponse { message } => {
                format!("CWA API returned data that could not be read: {message}")
            }
        }
    }

    /// Extra payload forwarded in the `details` field
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            ProxyError::InvalidCity { .. } => Some(Value::from(regions::VALID_CITIES.to_vec())),
            ProxyError::Upstream { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        if err.is_decode() {
            ProxyError::invalid_response(err.to_string())
        } else {
            ProxyError::transport(err.to_string())
        }
    }
}
