pub mod geocode;
pub mod movies;
pub mod types;
pub mod weather;
pub mod yelp;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("{provider} API error: {message}")]
    ApiError {
        provider: &'static str,
        message: String,
    },
    #[error("Invalid coordinates: {0}, {1}")]
    InvalidCoordinates(f64, f64),
}

/// Builds the HTTP client shared by every provider.
pub fn http_client() -> Result<Client, ProviderError> {
    let client = Client::builder()
        .user_agent("CityExplorer/1.0")
        .timeout(Duration::from_secs(30))
        .build()?;

    Ok(client)
}

/// Sends a single GET and decodes the body. Provider calls are never retried.
async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;

    match response.status() {
        status if status.is_success() => {
            let json: Value = response.json().await?;
            Ok(serde_json::from_value(json)?)
        }
        status => {
            let error_text = response.text().await.unwrap_or_default();
            Err(ProviderError::ApiError {
                provider,
                message: format!("HTTP {}: {}", status, error_text),
            })
        }
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ProviderError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(ProviderError::InvalidCoordinates(lat, lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}
