//! Upstream forecast access
//!
//! [`ForecastSource`] is the seam the HTTP handlers depend on;
//! [`CwaClient`] implements it against the CWA open-data REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::LocationWeather;
use crate::{ProxyError, Result};

pub mod cwa;

use cwa::DatastoreResponse;

/// Something that can answer a forecast query for one region or all of them
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fail fast when the source cannot serve any request at all
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch reshaped forecasts, in upstream order.
    ///
    /// `None` asks for every region.
    async fn fetch(&self, location_name: Option<&str>) -> Result<Vec<LocationWeather>>;
}

/// Client for the CWA datastore endpoint
#[derive(Debug, Clone)]
pub struct CwaClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl CwaClient {
    /// Create a new client from the weather settings
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cwa-weather-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/v1/rest/datastore/{}",
                config.base_url.trim_end_matches('/'),
                config.dataset_id
            ),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProxyError::config("CWA_API_KEY is not set"))
    }

    /// Full datastore URL queried by this client
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one datastore request and decode the body
    #[instrument(skip(self))]
    pub async fn fetch_datastore(&self, location_name: Option<&str>) -> Result<DatastoreResponse> {
        let api_key = self.api_key()?;

        let mut query = vec![("Authorization", api_key)];
        if let Some(name) = location_name {
            query.push(("locationName", name));
        }

        debug!("CWA API request: {}", self.endpoint);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key.
                let e = e.without_url();
                warn!("CWA API request failed: {}", e);
                ProxyError::transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read CWA error body: {}", e.without_url());
                    String::new()
                }
            };
            let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            warn!("CWA API responded with {}", status);
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let datastore: DatastoreResponse = response.json().await?;

        info!(
            "CWA API returned {} locations in {:.3}s",
            datastore.records.location.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(datastore)
    }
}

#[async_trait]
impl ForecastSource for CwaClient {
    fn ensure_ready(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn fetch(&self, location_name: Option<&str>) -> Result<Vec<LocationWeather>> {
        let datastore = self.fetch_datastore(location_name).await?;
        Ok(datastore.into_location_weather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let client = CwaClient::new(&WeatherConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = WeatherConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..WeatherConfig::default()
        };
        let client = CwaClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/api/v1/rest/datastore/F-C0032-001"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let client = CwaClient::new(&WeatherConfig::default()).unwrap();
        assert!(matches!(client.ensure_ready(), Err(ProxyError::Config { .. })));

        let err = client.fetch(Some("高雄市")).await.unwrap_err();
        assert!(matches!(err, ProxyError::Config { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let config = WeatherConfig {
            api_key: Some("SECRET-KEY-123".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            ..WeatherConfig::default()
        };
        let client = CwaClient::new(&config).unwrap();
        let err = client.fetch(None).await.unwrap_err();

        assert!(matches!(err, ProxyError::Transport { .. }));
        assert!(!err.to_string().contains("SECRET-KEY-123"), "{err}");
        assert!(!err.user_message().contains("SECRET-KEY-123"));
    }
}
