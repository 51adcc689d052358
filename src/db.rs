/*! Sets up the application's SQLite database. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::transaction::create_transaction_table;

/// Create all the tables for the domain models if they do not already exist.
///
/// Calling this on an already initialized database is a no-op.
///
/// # Errors
/// Returns an error if a table could not be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
