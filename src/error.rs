use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::providers::ProviderError;

const GENERIC_MESSAGE: &str = "Sorry we didn't catch that, please try again";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("No Data for {0:?}")]
    NoData(String),
    #[error("Upstream request failed: {0}")]
    Upstream(ProviderError),
    #[error("Store failure: {0}")]
    Store(#[from] DatabaseError),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidCoordinates(lat, lon) => {
                AppError::Validation(format!("invalid coordinates: {}, {}", lat, lon))
            }
            other => AppError::Upstream(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NoData(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NoData(_) => "NO_DATA",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Store(_) => "STORE_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NoData(_) => "No Data".to_string(),
            AppError::Upstream(ProviderError::ApiError { provider, .. }) => {
                format!("{} service is unavailable", provider)
            }
            AppError::Upstream(_) => "Upstream service is unavailable".to_string(),
            AppError::Store(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(_) | AppError::NoData(_) => tracing::warn!("{}", self),
            AppError::Upstream(_) | AppError::Store(_) => tracing::error!("{}", self),
        }

        let body = ErrorResponse::new(&self.public_message(), self.code());
        (self.status_code(), Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
            timestamp: Utc::now(),
        }
    }
}
