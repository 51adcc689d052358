//! Request and response bodies for the transaction endpoints.

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::TransactionId, transaction::TransactionFields};

/// The JSON body for creating or replacing a transaction.
///
/// Every field is optional at the parsing stage so that missing fields can be
/// reported together by [TransactionRequest::validate].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Whether this is an "income" or an "expense".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    /// A free text category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The amount of money spent or earned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// When the transaction happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// An optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionRequest {
    /// Check that all of the required fields are present.
    ///
    /// Strings must be non-empty. `amount` only needs to be present, so an
    /// amount of zero is accepted.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] naming every missing field.
    pub fn validate(self) -> Result<TransactionFields, Error> {
        let mut missing = Vec::new();

        let transaction_type = non_empty(self.transaction_type, "type", &mut missing);
        let category = non_empty(self.category, "category", &mut missing);
        if self.amount.is_none() {
            missing.push("amount");
        }
        let date = non_empty(self.date, "date", &mut missing);

        match (transaction_type, category, self.amount, date) {
            (Some(transaction_type), Some(category), Some(amount), Some(date)) => {
                Ok(TransactionFields {
                    transaction_type,
                    category,
                    amount,
                    date,
                    description: self.description,
                })
            }
            _ => Err(Error::MissingFields(missing)),
        }
    }
}

fn non_empty(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            missing.push(name);
            None
        }
    }
}

/// The response body for a newly created transaction.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// The ID assigned to the new transaction.
    pub id: TransactionId,
}

/// A response body that confirms an operation succeeded.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// A human readable confirmation.
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Unwrap a JSON body, turning axum's rejection into a client error.
pub(crate) fn parse_body(
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<TransactionRequest, Error> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
}

/// Unwrap the transaction ID from the path, turning axum's rejection into a client error.
pub(crate) fn parse_transaction_id(
    path: Result<Path<TransactionId>, PathRejection>,
) -> Result<TransactionId, Error> {
    path.map(|Path(id)| id)
        .map_err(|rejection| Error::InvalidRequest(rejection.body_text()))
}
