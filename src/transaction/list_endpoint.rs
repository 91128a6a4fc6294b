//! Defines the endpoint for listing a session's transactions.

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    session::SessionId,
    transaction::{Ledger, Transaction},
};

/// The response body for listing transactions.
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    /// The session's transactions, oldest first.
    pub transactions: Vec<Transaction>,
}

/// A route handler that returns every transaction recorded under the caller's session.
///
/// **Note**: Must be behind [crate::session::session_guard].
pub async fn get_transactions_endpoint(
    State(ledger): State<Ledger>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<TransactionsResponse>, Error> {
    let transactions = ledger.list_transactions(session_id)?;

    Ok(Json(TransactionsResponse { transactions }))
}
