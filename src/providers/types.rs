use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: GeocodeGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeGeometry {
    pub location: GeocodeLatLng,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub daily: ForecastDaily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDaily {
    pub data: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Sent as seconds since the Unix epoch. Out-of-range values fail decoding.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSearchResponse {
    pub businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YelpBusiness {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSearchResponse {
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovie {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub poster_path: Option<String>,
    pub popularity: f64,
    #[serde(default)]
    pub release_date: String,
}
