//! Sales Insights is a small analytics backend over a collection of sale
//! transactions.
//!
//! The library seeds the transaction store from an external JSON document,
//! serves a searchable, paginated listing, and computes monthly reports:
//! sale statistics, a price-range histogram and a category distribution.
//! Everything is exposed as a JSON REST API through [build_router].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod insights;
mod logging;
mod month;
mod pagination;
mod routing;
mod sale;
mod seed;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use month::{DEFAULT_REFERENCE_YEAR, WindowConfig, WindowEnd, is_valid_reference_year};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, SeedConfig};
pub use timezone::is_valid_timezone;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The `month` query parameter was missing, not an integer, or outside
    /// of 1 to 12.
    ///
    /// Holds the raw value that the client sent, if any.
    #[error("invalid month {0:?}")]
    InvalidMonth(String),

    /// The seed document could not be fetched or was not a JSON array.
    ///
    /// Covers unreachable hosts, non-success statuses, timeouts and
    /// malformed bodies.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The configured reference year cannot hold every month window.
    #[error("invalid reference year {0}")]
    InvalidReferenceYear(i32),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Error::SeedFetch(format!("request timed out: {value}"))
        } else {
            Error::SeedFetch(value.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidMonth(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Invalid month provided." })),
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Not found" })),
            )
                .into_response(),
            Error::SeedFetch(ref detail) => {
                tracing::error!("Seeding failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "Error initializing data",
                        "error": self.to_string(),
                    })),
                )
                    .into_response()
            }
            Error::InvalidTimezone(ref timezone) => {
                tracing::error!("Could not resolve timezone {timezone}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "Invalid timezone settings",
                        "error": self.to_string(),
                    })),
                )
                    .into_response()
            }
            Error::InvalidReferenceYear(year) => {
                tracing::error!("Could not build month windows for reference year {year}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "Invalid reference year settings",
                        "error": self.to_string(),
                    })),
                )
                    .into_response()
            }
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "Error accessing the sale store",
                        "error": error.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::Error;

    async fn into_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request_without_detail() {
        let (status, body) = into_json(Error::InvalidMonth("13".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid month provided.");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn seed_fetch_error_includes_message_and_error() {
        let (status, body) = into_json(Error::SeedFetch("connection refused".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error initializing data");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("connection refused")
        );
    }

    #[tokio::test]
    async fn store_errors_are_internal_server_errors() {
        let (status, body) = into_json(Error::DatabaseLockError).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error accessing the sale store");
        assert_eq!(body["error"], "could not acquire the database lock");
    }

    #[tokio::test]
    async fn invalid_reference_year_is_server_error() {
        let (status, body) = into_json(Error::InvalidReferenceYear(10_000)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Invalid reference year settings");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, _) = into_json(Error::NotFound).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
