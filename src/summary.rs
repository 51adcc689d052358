//! Totals for income, expenses and the resulting balance.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The aggregate totals over every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of the amounts of all "income" transactions.
    pub total_income: f64,
    /// The sum of the amounts of all "expense" transactions.
    pub total_expenses: f64,
    /// Total income minus total expenses.
    pub balance: f64,
}

/// Sum the income and expense transactions.
///
/// Both totals are computed by a single statement so they are read from the
/// same snapshot of the table. Transactions of any other type are ignored and
/// an empty table sums to zero.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn summarize_income_and_expense(connection: &Connection) -> Result<Summary, Error> {
    let (total_income, total_expenses): (f64, f64) = connection.query_row(
        "SELECT \
            COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0.0), \
            COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0.0) \
        FROM transactions;",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    })
}

/// The state needed to summarize transactions.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting the income and expense totals.
pub async fn get_summary_endpoint(State(state): State<SummaryState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match summarize_income_and_expense(&connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => {
            tracing::error!("Could not summarize transactions: {error}");
            error.into_response()
        }
    }
}
