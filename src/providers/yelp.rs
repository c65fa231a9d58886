use super::{send_json, types::BusinessSearchResponse, validate_coordinates, ProviderError};
use crate::config::Config;
use reqwest::Client;

const PROVIDER: &str = "Yelp";

pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YelpClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.yelp_base_url.clone(),
            api_key: config.yelp_api_key.clone(),
        }
    }

    pub async fn search_restaurants(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<BusinessSearchResponse, ProviderError> {
        validate_coordinates(lat, lon)?;

        let url = format!("{}/v3/businesses/search", self.base_url);
        tracing::debug!("Searching restaurants near {},{}", lat, lon);

        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("term", "restaurants".to_string()),
            ]);

        send_json(PROVIDER, request).await
    }
}
