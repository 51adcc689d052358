//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// Whether this is an "income" or an "expense".
    ///
    /// Other values are stored as-is but are ignored by the summary.
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// A free text category, e.g. "Groceries" or "Salary".
    pub category: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened, as provided by the client.
    pub date: String,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

/// The user editable fields of a [Transaction].
///
/// Used both to create a new transaction and to replace every field of an
/// existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    /// Whether this is an "income" or an "expense".
    pub transaction_type: String,
    /// A free text category.
    pub category: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: String,
    /// An optional description.
    pub description: Option<String>,
}

impl TransactionFields {
    /// Create the fields for a transaction without a description.
    pub fn new(transaction_type: &str, category: &str, amount: f64, date: &str) -> Self {
        Self {
            transaction_type: transaction_type.to_owned(),
            category: category.to_owned(),
            amount,
            date: date.to_owned(),
            description: None,
        }
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_owned);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database and return its ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    fields: &TransactionFields,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    let id = connection
        .prepare(
            "INSERT INTO transactions (type, category, amount, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
        )?
        .query_row(
            params![
                fields.transaction_type,
                fields.category,
                fields.amount,
                fields.date,
                fields.description,
            ],
            |row| row.get(0),
        )?;

    Ok(id)
}

/// Retrieve every transaction in the database, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, type, category, amount, date, description FROM transactions ORDER BY id",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
        .collect()
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, type, category, amount, date, description FROM transactions WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite every field of the transaction with the given `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    fields: &TransactionFields,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE transactions
        SET \
            type = ?1, \
            category = ?2, \
            amount = ?3, \
            date = ?4, \
            description = ?5 \
        WHERE id = ?6;",
        params![
            fields.transaction_type,
            fields.category,
            fields.amount,
            fields.date,
            fields.description,
            id,
        ],
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingTransaction),
        _ => Ok(()),
    }
}

/// Delete the transaction with the given `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM transactions WHERE id = :id", &[(":id", &id)])?;

    match rows_affected {
        0 => Err(Error::DeleteMissingTransaction),
        _ => Ok(()),
    }
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let transaction_type = row.get(1)?;
    let category = row.get(2)?;
    let amount = row.get(3)?;
    let date = row.get(4)?;
    let description = row.get(5)?;

    Ok(Transaction {
        id,
        transaction_type,
        category,
        amount,
        date,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================
