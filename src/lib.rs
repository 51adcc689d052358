//! Ledger is a small web service for recording income and expenses.
//!
//! This library provides a JSON REST API over a single SQLite table of
//! transactions, plus a summary of total income, total expenses and the
//! resulting balance.

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
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod routing;
mod summary;
mod transaction;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use summary::{Summary, summarize_income_and_expense};
pub use transaction::{
    CreatedResponse, MessageResponse, Transaction, TransactionFields, TransactionRequest,
    count_transactions, create_transaction, delete_transaction, get_all_transactions,
    get_transaction, update_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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
    /// The request body was missing one or more required fields.
    ///
    /// A field counts as missing when it is absent, `null`, or an empty
    /// string. The request is rejected before the database is touched.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The request could not be parsed, e.g. the body was not valid JSON or
    /// the transaction ID in the path was not an integer.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be read within [REQUEST_BODY_LIMIT] bytes.
    #[error("Request body is larger than {0} bytes or could not be read")]
    RequestBodyTooLarge(usize),

    /// The requested transaction was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Transaction not found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("Transaction not found")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("Transaction not found")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("{0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
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
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_) | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::RequestBodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::NotFound | Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
