//! Transactions: the income and expense records at the heart of the ledger.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod payload;

pub use core::{
    Transaction, TransactionFields, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_all_transactions, get_transaction,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
pub use payload::{CreatedResponse, MessageResponse, TransactionRequest};
