//! Sales Dashboard is a web app for exploring a month of sales transactions.
//!
//! This library provides a JSON API over a single collection of sales
//! transactions, seeded from a remote dataset, and a dashboard page that shows
//! a searchable table, summary statistics, and charts for a selected month.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod month;
mod not_found;
mod pagination;
mod routing;
mod seed;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, FileSeedSource, HttpSeedSource, SeedSource};
pub use transaction::{NewTransaction, Transaction, replace_all_transactions};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

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
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The seed dataset could not be downloaded or read.
    ///
    /// This covers network errors, non-success HTTP statuses, and I/O errors
    /// when reading a local seed file.
    #[error("could not fetch the seed dataset: {0}")]
    SeedFetch(String),

    /// The seed dataset was fetched but is not a JSON array of transactions.
    #[error("could not parse the seed dataset: {0}")]
    SeedParse(String),

    /// The query string of an API request could not be parsed, e.g. a
    /// non-numeric page number.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A task running blocking database work panicked or was cancelled.
    #[error("a database task did not complete: {0}")]
    BlockingTask(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that best describes this error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::SeedFetch(_) | Error::SeedParse(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::BlockingTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message that is safe to show to a client.
    ///
    /// Errors from the database are replaced with a generic message, the
    /// details are only written to the server logs.
    pub fn client_message(&self) -> String {
        match self {
            Error::SeedFetch(_)
            | Error::SeedParse(_)
            | Error::InvalidQuery(_)
            | Error::NotFound => self.to_string(),
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            _ => "An unexpected error occurred, check the server logs for more details.".to_owned(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(ref timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::SeedFetch(_) | Error::SeedParse(_) => {
                tracing::error!("Could not load the seed dataset: {}", self);
                InternalServerError {
                    description: "Could not load the sales data",
                    fix: "The remote dataset is unavailable. Try again later.",
                    status: StatusCode::BAD_GATEWAY,
                }
                .into_response()
            }
            Error::InvalidQuery(ref message) => InternalServerError {
                description: "Invalid request",
                fix: message,
                status: StatusCode::BAD_REQUEST,
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
