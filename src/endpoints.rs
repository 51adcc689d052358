//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', tests use `format_endpoint`.

/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to get the income and expense totals.
pub const SUMMARY: &str = "/api/summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes the endpoint has exactly one parameter enclosed in curly braces.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{}{}",
            &endpoint_path[..start],
            id,
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_owned(),
    }
}
