use super::{send_json, types::GeocodeResponse, ProviderError};
use crate::config::Config;
use reqwest::Client;

const PROVIDER: &str = "Geocoding";

pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.geocode_base_url.clone(),
            api_key: config.geocode_api_key.clone(),
        }
    }

    pub async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        tracing::debug!("Geocoding {:?}", address);

        let request = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())]);

        send_json(PROVIDER, request).await
    }
}
