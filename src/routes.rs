use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    config::Config,
    database::Database,
    error::AppError,
    lookup,
    models::{Business, Location, LocationRef, Movie, WeatherDay},
    providers::{
        geocode::GeocodeClient, http_client, movies::MovieClient, weather::WeatherClient,
        yelp::YelpClient, ProviderError,
    },
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub geocoder: Arc<GeocodeClient>,
    pub weather_client: Arc<WeatherClient>,
    pub yelp_client: Arc<YelpClient>,
    pub movie_client: Arc<MovieClient>,
}

impl AppState {
    pub fn new(config: &Config, database: Arc<Database>) -> Result<Self, ProviderError> {
        let client = http_client()?;

        Ok(Self {
            database,
            geocoder: Arc::new(GeocodeClient::new(client.clone(), config)),
            weather_client: Arc::new(WeatherClient::new(client.clone(), config)),
            yelp_client: Arc::new(YelpClient::new(client.clone(), config)),
            movie_client: Arc::new(MovieClient::new(client, config)),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

// Route handlers
pub async fn root() -> &'static str {
    "server is on"
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status) = match state.database.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn get_location(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<Location>, AppError> {
    let search_query = params
        .data
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation("data is required".to_string()))?;

    let location = lookup::resolve_location(&state, &search_query).await?;
    Ok(Json(location))
}

pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<WeatherDay>>, AppError> {
    let location = location_ref(&params)?;
    let days = lookup::resolve_weather(&state, &location).await?;
    Ok(Json(days))
}

pub async fn get_yelp(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Business>>, AppError> {
    let location = location_ref(&params)?;
    let businesses = lookup::resolve_businesses(&state, &location).await?;
    Ok(Json(businesses))
}

pub async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let location = location_ref(&params)?;
    let movies = lookup::resolve_movies(&state, &location).await?;
    Ok(Json(movies))
}

/// Reads the location a dependent request is for.
///
/// Accepts either `data=<json object>` or bracketed form fields such as
/// `data[id]=1&data[latitude]=47.6`, which is how browsers encode nested objects.
/// Only the id is kept.
fn location_ref(params: &HashMap<String, String>) -> Result<LocationRef, AppError> {
    if let Some(raw) = params.get("data") {
        return serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("data is not a location object: {}", e)));
    }

    if !params.keys().any(|key| key.starts_with("data[")) {
        return Err(AppError::Validation("data is required".to_string()));
    }

    Ok(LocationRef {
        id: parse_field(params, "id")?,
    })
}

fn form_field<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(&format!("data[{}]", name))
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn parse_field<T: FromStr>(
    params: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, AppError> {
    form_field(params, name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| {
                AppError::Validation(format!("data[{}] is not a number: {:?}", name, value))
            })
        })
        .transpose()
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/location", get(get_location))
        .route("/weather", get(get_weather))
        .route("/yelp", get(get_yelp))
        .route("/movies", get(get_movies))
        .with_state(state)
}
