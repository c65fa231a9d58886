//! Reshapes provider payloads into the local record types.
//!
//! Every function here is pure and preserves upstream order.

use crate::models::{Business, Movie, NewLocation, WeatherDay};
use crate::providers::types::{
    BusinessSearchResponse, ForecastDay, ForecastResponse, GeocodeResponse, MovieSearchResponse,
    TmdbMovie, YelpBusiness,
};
use chrono::{DateTime, Utc};

pub const MOVIE_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Takes the first geocoder result only. `None` when the geocoder found nothing.
pub fn location_from_geocode(search_query: &str, response: &GeocodeResponse) -> Option<NewLocation> {
    let first = response.results.first()?;

    Some(NewLocation {
        search_query: search_query.to_string(),
        formatted_query: first.formatted_address.clone(),
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
    })
}

pub fn weather_days(response: &ForecastResponse) -> Vec<WeatherDay> {
    response.daily.data.iter().map(WeatherDay::from).collect()
}

pub fn businesses(response: &BusinessSearchResponse) -> Vec<Business> {
    response.businesses.iter().map(Business::from).collect()
}

pub fn movies(response: &MovieSearchResponse) -> Vec<Movie> {
    response.results.iter().map(Movie::from).collect()
}

/// Renders a forecast day as a UTC calendar date, e.g. `Tue Nov 14 2023`.
pub fn forecast_date(time: DateTime<Utc>) -> String {
    time.format("%a %b %d %Y").to_string()
}

/// The city part of a formatted address: everything before the first comma.
pub fn city_name(formatted_query: &str) -> &str {
    formatted_query
        .split(',')
        .next()
        .unwrap_or(formatted_query)
        .trim()
}

impl From<&ForecastDay> for WeatherDay {
    fn from(day: &ForecastDay) -> Self {
        Self {
            time: forecast_date(day.time),
            forecast: day.summary.clone(),
        }
    }
}

impl From<&YelpBusiness> for Business {
    fn from(business: &YelpBusiness) -> Self {
        Self {
            name: business.name.clone(),
            image_url: business.image_url.clone(),
            price: business.price.clone(),
            rating: business.rating,
            url: business.url.clone(),
        }
    }
}

impl From<&TmdbMovie> for Movie {
    fn from(movie: &TmdbMovie) -> Self {
        Self {
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            average_votes: movie.vote_average,
            total_votes: movie.vote_count,
            image_url: format!(
                "{}{}",
                MOVIE_IMAGE_BASE_URL,
                movie.poster_path.as_deref().unwrap_or_default()
            ),
            popularity: movie.popularity,
            released_on: movie.release_date.clone(),
        }
    }
}
