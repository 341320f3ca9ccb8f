use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown endpoint")]
    UnknownEndpoint(String),

    #[error("Invalid {field}: {value}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Seed generation failed: {0}")]
    Seed(#[from] rand::distributions::WeightedError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownEndpoint(_) | AppError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log line for this error. Unlike the response body, it names the
    /// rejected endpoint.
    pub fn log_detail(&self) -> String {
        match self {
            AppError::UnknownEndpoint(name) => format!("Unknown endpoint: {}", name),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("Request failed: {}", self.log_detail());
            "Internal server error".to_string()
        } else {
            log::warn!("Rejected request: {}", self.log_detail());
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let error = AppError::UnknownEndpoint("heatmap".to_string());
        assert_eq!(error.to_string(), "Unknown endpoint");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

        let error = AppError::InvalidFilter {
            field: "tier",
            value: "gold".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid tier: gold");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn log_detail_names_the_rejected_endpoint() {
        let error = AppError::UnknownEndpoint("heatmap".to_string());
        assert_eq!(error.log_detail(), "Unknown endpoint: heatmap");

        let error = AppError::InvalidFilter {
            field: "segment",
            value: "dormant".to_string(),
        };
        assert_eq!(error.log_detail(), "Invalid segment: dormant");
    }

    #[test]
    fn store_failures_are_generic_server_errors() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
