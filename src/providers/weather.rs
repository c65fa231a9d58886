use super::{send_json, types::ForecastResponse, validate_coordinates, ProviderError};
use crate::config::Config;
use reqwest::Client;

const PROVIDER: &str = "Weather";

pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.weather_base_url.clone(),
            api_key: config.weather_api_key.clone(),
        }
    }

    /// Daily forecast for a coordinate pair. The key and coordinates are path segments.
    pub async fn get_forecast(&self, lat: f64, lon: f64) -> Result<ForecastResponse, ProviderError> {
        validate_coordinates(lat, lon)?;

        let url = format!("{}/forecast/{}/{},{}", self.base_url, self.api_key, lat, lon);
        tracing::debug!("Fetching forecast for {},{}", lat, lon);

        send_json(PROVIDER, self.client.get(&url)).await
    }
}
