use serde::{Deserialize, Serialize};

/// A geocoded location that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A persisted location. `id` is the join key for every dependent domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WeatherDay {
    pub time: String,
    pub forecast: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Business {
    pub name: String,
    pub image_url: String,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub total_votes: i64,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
}

/// The location a dependent lookup is made for, as sent by the client.
///
/// Clients echo back the whole object returned by `/location`. Only its id is
/// read; coordinates and city come from the stored row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocationRef {
    pub id: Option<i64>,
}
