//! Defines the endpoint for updating a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        payload::{MessageResponse, TransactionRequest, parse_body, parse_transaction_id},
        update_transaction,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing every field of a transaction.
///
/// The body must contain the same required fields as when creating a
/// transaction, fields are never partially updated.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    path: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response {
    let transaction_id = match parse_transaction_id(path) {
        Ok(transaction_id) => transaction_id,
        Err(error) => return error.into_response(),
    };

    let fields = match parse_body(payload).and_then(TransactionRequest::validate) {
        Ok(fields) => fields,
        Err(error) => {
            tracing::debug!("Rejected update for transaction {transaction_id}: {error}");
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

    match update_transaction(transaction_id, &fields, &connection) {
        Ok(()) => {
            tracing::info!("Updated transaction {transaction_id}");
            Json(MessageResponse::new("Transaction updated successfully")).into_response()
        }
        Err(Error::UpdateMissingTransaction) => Error::UpdateMissingTransaction.into_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
