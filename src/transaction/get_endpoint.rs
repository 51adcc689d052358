//! Defines the endpoints for reading transactions.

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
    transaction::{get_all_transactions, get_transaction, payload::parse_transaction_id},
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing every transaction.
///
/// An empty database responds with an empty list.
pub async fn get_transactions_endpoint(State(state): State<GetTransactionState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_transactions(&connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => {
            tracing::error!("Could not get transactions: {error}");
            error.into_response()
        }
    }
}

/// A route handler for getting a transaction by its database ID.
///
/// This function will return the status code 404 if the requested transaction does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
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

    match get_transaction(transaction_id, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(Error::NotFound) => Error::NotFound.into_response(),
        Err(error) => {
            tracing::error!("Could not get transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::to_bytes,
        extract::{Path, State},
        http::StatusCode,
        response::Response,
    };
    use rusqlite::Connection;

    use crate::{
        initialize_db,
        transaction::{
            Transaction, TransactionFields, create_transaction,
            get_endpoint::{GetTransactionState, get_transaction_endpoint, get_transactions_endpoint},
        },
    };

    #[tokio::test]
    async fn lists_no_transactions() {
        let state = must_create_state();

        let response = get_transactions_endpoint(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(parse_list(response).await, vec![]);
    }

    #[tokio::test]
    async fn lists_all_transactions() {
        let state = must_create_state();
        for amount in [1.0, 2.0, 3.0] {
            create_transaction(
                &TransactionFields::new("expense", "Misc", amount, "2025-10-05"),
                &state.db_connection.lock().unwrap(),
            )
            .unwrap();
        }

        let response = get_transactions_endpoint(State(state)).await;

        let amounts: Vec<f64> = parse_list(response)
            .await
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn gets_transaction_by_id() {
        let state = must_create_state();
        let id = create_transaction(
            &TransactionFields::new("income", "Gift", 20.0, "2025-10-05"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_transaction_endpoint(State(state), Ok(Path(id))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let transaction: Transaction = serde_json::from_slice(&body).unwrap();
        assert_eq!(transaction.id, id);
        assert_eq!(transaction.transaction_type, "income");
    }

    #[tokio::test]
    async fn get_missing_transaction_responds_not_found() {
        let state = must_create_state();

        let response = get_transaction_endpoint(State(state), Ok(Path(1))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn parse_list(response: Response) -> Vec<Transaction> {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[track_caller]
    fn must_create_state() -> GetTransactionState {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");

        GetTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }
}
