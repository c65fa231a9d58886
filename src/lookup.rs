//! Cache-aside resolution for every domain.
//!
//! The store answers each lookup with a [`CacheLookup`]. On `Hit` the stored
//! rows are returned as-is and no provider is called. On `Miss` the provider
//! is called once, the payload is normalized, persisted, and returned.

use crate::database::DatabaseError;
use crate::error::AppError;
use crate::models::{Business, Location, LocationRef, Movie, WeatherDay};
use crate::normalize;
use crate::routes::AppState;

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<Vec<T>> {
    /// Zero rows is a miss.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            CacheLookup::Miss
        } else {
            CacheLookup::Hit(rows)
        }
    }
}

impl<T> From<Option<T>> for CacheLookup<T> {
    fn from(row: Option<T>) -> Self {
        match row {
            Some(row) => CacheLookup::Hit(row),
            None => CacheLookup::Miss,
        }
    }
}

pub async fn resolve_location(state: &AppState, search_query: &str) -> Result<Location, AppError> {
    match state.database.find_location(search_query).await? {
        CacheLookup::Hit(location) => {
            tracing::debug!(search_query, id = location.id, "location cache hit");
            Ok(location)
        }
        CacheLookup::Miss => {
            tracing::debug!(search_query, "location cache miss");
            let response = state.geocoder.geocode(search_query).await?;
            let location = normalize::location_from_geocode(search_query, &response)
                .ok_or_else(|| AppError::NoData(search_query.to_string()))?;

            // The id is part of the response, so this write must succeed.
            let stored = state.database.insert_location(&location).await?;
            tracing::info!(search_query, id = stored.id, "location cached");
            Ok(stored)
        }
    }
}

pub async fn resolve_weather(
    state: &AppState,
    location: &LocationRef,
) -> Result<Vec<WeatherDay>, AppError> {
    let location = stored_location(state, location).await?;
    let location_id = location.id;

    match state.database.find_weather(location_id).await? {
        CacheLookup::Hit(days) => {
            tracing::debug!(location_id, count = days.len(), "weather cache hit");
            Ok(days)
        }
        CacheLookup::Miss => {
            tracing::debug!(location_id, "weather cache miss");
            let response = state
                .weather_client
                .get_forecast(location.latitude, location.longitude)
                .await?;
            let days = normalize::weather_days(&response);

            let persisted = state.database.insert_weather(location_id, &days).await;
            log_persist_result("weather", location_id, days.len(), persisted);
            Ok(days)
        }
    }
}

pub async fn resolve_businesses(
    state: &AppState,
    location: &LocationRef,
) -> Result<Vec<Business>, AppError> {
    let location = stored_location(state, location).await?;
    let location_id = location.id;

    match state.database.find_businesses(location_id).await? {
        CacheLookup::Hit(businesses) => {
            tracing::debug!(location_id, count = businesses.len(), "yelp cache hit");
            Ok(businesses)
        }
        CacheLookup::Miss => {
            tracing::debug!(location_id, "yelp cache miss");
            let response = state
                .yelp_client
                .search_restaurants(location.latitude, location.longitude)
                .await?;
            let businesses = normalize::businesses(&response);

            let persisted = state.database.insert_businesses(location_id, &businesses).await;
            log_persist_result("yelp", location_id, businesses.len(), persisted);
            Ok(businesses)
        }
    }
}

pub async fn resolve_movies(
    state: &AppState,
    location: &LocationRef,
) -> Result<Vec<Movie>, AppError> {
    let location = stored_location(state, location).await?;
    let location_id = location.id;

    match state.database.find_movies(location_id).await? {
        CacheLookup::Hit(movies) => {
            tracing::debug!(location_id, count = movies.len(), "movies cache hit");
            Ok(movies)
        }
        CacheLookup::Miss => {
            let city = normalize::city_name(&location.formatted_query);
            tracing::debug!(location_id, city, "movies cache miss");
            let response = state.movie_client.search(city).await?;
            let movies = normalize::movies(&response);

            let persisted = state.database.insert_movies(location_id, &movies).await;
            log_persist_result("movies", location_id, movies.len(), persisted);
            Ok(movies)
        }
    }
}

/// Dependent rows describe the stored location, so coordinates and city come
/// from its row. Only the id is taken from the request.
async fn stored_location(state: &AppState, location: &LocationRef) -> Result<Location, AppError> {
    let location_id = require_id(location)?;

    state
        .database
        .find_location_by_id(location_id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("unknown location id {}", location_id)))
}

fn require_id(location: &LocationRef) -> Result<i64, AppError> {
    location
        .id
        .ok_or_else(|| AppError::Validation("data.id is required".to_string()))
}

// Dependent rows are a cache only; a failed write must not fail the request.
fn log_persist_result(
    domain: &str,
    location_id: i64,
    count: usize,
    result: Result<(), DatabaseError>,
) {
    match result {
        Ok(()) => tracing::info!(domain, location_id, count, "records cached"),
        Err(e) => tracing::error!(domain, location_id, "Failed to cache records: {}", e),
    }
}
