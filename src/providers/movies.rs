use super::{send_json, types::MovieSearchResponse, ProviderError};
use crate::config::Config;
use reqwest::Client;

const PROVIDER: &str = "TMDB";

pub struct MovieClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MovieClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.movie_base_url.clone(),
            api_key: config.movie_api_key.clone(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<MovieSearchResponse, ProviderError> {
        let url = format!("{}/3/search/movie", self.base_url);
        tracing::debug!("Searching movies for {:?}", query);

        let request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)]);

        send_json(PROVIDER, request).await
    }
}
