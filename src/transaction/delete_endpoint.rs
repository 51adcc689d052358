//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        delete_transaction,
        payload::{MessageResponse, parse_transaction_id},
    },
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> Response {
    let transaction_id = match parse_transaction_id(path) {
        Ok(transaction_id) => transaction_id,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            Json(MessageResponse::new("Transaction deleted successfully")).into_response()
        }
        Err(Error::DeleteMissingTransaction) => Error::DeleteMissingTransaction.into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}
