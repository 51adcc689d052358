//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{
        create_transaction,
        payload::{CreatedResponse, TransactionRequest, parse_body},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 Created and the new transaction's ID, or 400 Bad Request
/// if a required field is missing.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response {
    let fields = match parse_body(payload).and_then(TransactionRequest::validate) {
        Ok(fields) => fields,
        Err(error) => {
            tracing::debug!("Rejected create transaction request: {error}");
            return error.into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(&fields, &connection) {
        Ok(id) => {
            tracing::info!("Created transaction {id}");
            (StatusCode::CREATED, Json(CreatedResponse { id })).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            error.into_response()
        }
    }
}
