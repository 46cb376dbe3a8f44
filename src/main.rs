use anyhow::Result;
use cwa_weather_proxy::{AppConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        "Starting cwa-weather-proxy {} against {}",
        cwa_weather_proxy::VERSION,
        config.weather.base_url
    );

    web::run(&config).await
}
