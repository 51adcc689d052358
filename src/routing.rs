//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    summary::get_summary_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use axum::{body::Bytes, http::StatusCode};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, Summary, build_router,
        endpoints::{self, format_endpoint},
        transaction::{CreatedResponse, MessageResponse, Transaction, TransactionRequest},
    };

    fn must_create_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(connection).expect("Could not initialize database.");

        TestServer::new(build_router(state))
    }

    fn request(transaction_type: &str, amount: f64) -> TransactionRequest {
        TransactionRequest {
            transaction_type: Some(transaction_type.to_owned()),
            category: Some("Misc".to_owned()),
            amount: Some(amount),
            date: Some("2025-10-05".to_owned()),
            description: None,
        }
    }

    async fn must_create(server: &TestServer, request: &TransactionRequest) -> i64 {
        let response = server.post(endpoints::TRANSACTIONS).json(request).await;
        response.assert_status(StatusCode::CREATED);

        response.json::<CreatedResponse>().id
    }

    async fn count(server: &TestServer) -> usize {
        server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>()
            .len()
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let server = must_create_server();
        let want = TransactionRequest {
            description: Some("Weekly shop".to_owned()),
            ..request("expense", 45.99)
        };

        let id = must_create(&server, &want).await;
        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Transaction>(),
            Transaction {
                id,
                transaction_type: "expense".to_owned(),
                category: "Misc".to_owned(),
                amount: 45.99,
                date: "2025-10-05".to_owned(),
                description: Some("Weekly shop".to_owned()),
            }
        );
    }

    #[tokio::test]
    async fn transaction_json_uses_type_key() {
        let server = must_create_server();
        let id = must_create(&server, &request("income", 10.0)).await;

        let body = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .await
            .json::<serde_json::Value>();

        assert_eq!(
            body,
            json!({
                "id": id,
                "type": "income",
                "category": "Misc",
                "amount": 10.0,
                "date": "2025-10-05",
                "description": null,
            })
        );
    }

    #[tokio::test]
    async fn list_is_empty_before_any_creates() {
        let server = must_create_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![]);
    }

    #[tokio::test]
    async fn list_returns_every_created_transaction() {
        let server = must_create_server();
        let mut want_ids = Vec::new();
        for amount in [1.0, 2.0, 3.0, 4.0] {
            want_ids.push(must_create(&server, &request("expense", amount)).await);
        }

        let mut got_ids: Vec<_> = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>()
            .into_iter()
            .map(|transaction| transaction.id)
            .collect();
        got_ids.sort();

        assert_eq!(want_ids, got_ids);
    }

    #[tokio::test]
    async fn create_with_missing_amount_is_rejected() {
        let server = must_create_server();
        let body = TransactionRequest {
            amount: None,
            ..request("expense", 0.0)
        };

        let response = server.post(endpoints::TRANSACTIONS).json(&body).await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "error": "Missing required fields: amount" })
        );
        assert_eq!(count(&server).await, 0);
    }

    #[tokio::test]
    async fn create_accepts_zero_amount() {
        let server = must_create_server();

        let id = must_create(&server, &request("expense", 0.0)).await;

        server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn create_with_wrong_field_type_is_rejected() {
        let server = must_create_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "expense",
                "category": "Misc",
                "amount": "ten dollars",
                "date": "2025-10-05",
            }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(count(&server).await, 0);
    }

    #[tokio::test]
    async fn create_without_json_body_is_rejected() {
        let server = must_create_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .text("type=expense")
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn get_missing_transaction_is_not_found() {
        let server = must_create_server();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, 42))
            .await;

        response.assert_status_not_found();
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "error": "Transaction not found" })
        );
    }

    #[tokio::test]
    async fn get_with_non_integer_id_is_rejected() {
        let server = must_create_server();

        server
            .get("/api/transactions/abc")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn update_replaces_transaction() {
        let server = must_create_server();
        let id = must_create(&server, &request("expense", 10.0)).await;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .json(&request("income", 20.0))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Transaction updated successfully"
        );
        let got = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .await
            .json::<Transaction>();
        assert_eq!(got.transaction_type, "income");
        assert_eq!(got.amount, 20.0);
    }

    #[tokio::test]
    async fn update_missing_transaction_is_not_found_and_creates_nothing() {
        let server = must_create_server();

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, 42))
            .json(&request("income", 20.0))
            .await;

        response.assert_status_not_found();
        assert_eq!(count(&server).await, 0);
    }

    #[tokio::test]
    async fn update_twice_with_same_values_is_idempotent() {
        let server = must_create_server();
        let id = must_create(&server, &request("expense", 10.0)).await;
        let update = TransactionRequest {
            description: Some("Lunch".to_owned()),
            ..request("expense", 12.0)
        };
        let path = format_endpoint(endpoints::TRANSACTION, id);

        server.put(&path).json(&update).await.assert_status_ok();
        let after_first = server.get(&path).await.json::<Transaction>();
        server.put(&path).json(&update).await.assert_status_ok();
        let after_second = server.get(&path).await.json::<Transaction>();

        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let server = must_create_server();
        let id = must_create(&server, &request("expense", 10.0)).await;
        let path = format_endpoint(endpoints::TRANSACTION, id);

        let response = server.delete(&path).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Transaction deleted successfully"
        );
        server.get(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_missing_transaction_is_not_found() {
        let server = must_create_server();

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, 42))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn summary_of_empty_ledger_is_zero() {
        let server = must_create_server();

        let response = server.get(endpoints::SUMMARY).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "totalIncome": 0.0, "totalExpenses": 0.0, "balance": 0.0 })
        );
    }

    #[tokio::test]
    async fn summary_totals_income_and_expenses() {
        let server = must_create_server();
        must_create(&server, &request("income", 100.0)).await;
        must_create(&server, &request("expense", 40.0)).await;

        let summary = server.get(endpoints::SUMMARY).await.json::<Summary>();

        assert_eq!(
            summary,
            Summary {
                total_income: 100.0,
                total_expenses: 40.0,
                balance: 60.0,
            }
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = must_create_server();

        server.get("/api/coffee").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn create_with_invalid_json_is_rejected() {
        let server = must_create_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .bytes(Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await;

        response.assert_status_bad_request();
        assert_eq!(count(&server).await, 0);
    }

    #[tokio::test]
    async fn create_with_null_amount_is_rejected() {
        let server = must_create_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "expense",
                "category": "Misc",
                "amount": null,
                "date": "2025-10-05",
            }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "error": "Missing required fields: amount" })
        );
        assert_eq!(count(&server).await, 0);
    }

    #[tokio::test]
    async fn update_with_non_integer_id_is_rejected() {
        let server = must_create_server();

        server
            .put("/api/transactions/abc")
            .json(&request("income", 20.0))
            .await
            .assert_status_bad_request();
        assert_eq!(count(&server).await, 0);
    }

    #[tokio::test]
    async fn delete_with_non_integer_id_is_rejected() {
        let server = must_create_server();

        server
            .delete("/api/transactions/abc")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn poisoned_database_lock_is_server_error() {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(connection).expect("Could not initialize database.");
        let db_connection = state.db_connection.clone();
        let _ = thread::spawn(move || {
            let _guard = db_connection.lock().unwrap();
            panic!("poisoning the database lock");
        })
        .join();
        let server = TestServer::new(build_router(state));

        for response in [
            server.get(endpoints::SUMMARY).await,
            server.get(endpoints::TRANSACTIONS).await,
            server
                .post(endpoints::TRANSACTIONS)
                .json(&request("income", 1.0))
                .await,
        ] {
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                response.json::<serde_json::Value>(),
                json!({ "error": "could not acquire the database lock" })
            );
        }
    }
}
