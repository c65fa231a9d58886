use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub geocode_api_key: String,
    pub geocode_base_url: String,
    pub weather_api_key: String,
    pub weather_base_url: String,
    pub yelp_api_key: String,
    pub yelp_base_url: String,
    pub movie_api_key: String,
    pub movie_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {:?}", raw))?,
            Err(_) => 5000,
        };

        Ok(Config {
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./city_explorer.db".to_string()),
            geocode_api_key: credential("GEOCODE_API_KEY"),
            geocode_base_url: env::var("GEOCODE_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            weather_api_key: credential("WEATHER_API_KEY"),
            weather_base_url: env::var("WEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.darksky.net".to_string()),
            yelp_api_key: credential("YELP_API_KEY"),
            yelp_base_url: env::var("YELP_BASE_URL")
                .unwrap_or_else(|_| "https://api.yelp.com".to_string()),
            movie_api_key: credential("MOVIE_API_KEY"),
            movie_base_url: env::var("MOVIE_BASE_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org".to_string()),
        })
    }
}

// Missing credentials are not fatal: the provider rejects the call later.
fn credential(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        tracing::warn!("{} not set, requests to that provider will fail", name);
        String::new()
    })
}
