//! Defines the endpoint for fetching a single transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Error,
    session::SessionId,
    transaction::{Ledger, Transaction},
};

/// The response body for fetching a transaction.
///
/// The `transactions` field is left out when the transaction does not exist
/// or belongs to another session.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// The requested transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Transaction>,
}

/// A route handler that returns the transaction `transaction_id` if it was
/// recorded under the caller's session.
///
/// Responds with `400 Bad Request` before touching the database if
/// `transaction_id` is not a valid UUID.
///
/// **Note**: Must be behind [crate::session::session_guard].
pub async fn get_transaction_endpoint(
    State(ledger): State<Ledger>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, Error> {
    let id = Uuid::parse_str(&transaction_id)
        .map_err(|_| Error::InvalidTransactionId(transaction_id))?;

    let transaction = ledger.get_transaction(session_id, id)?;

    Ok(Json(TransactionResponse {
        transactions: transaction,
    }))
}
