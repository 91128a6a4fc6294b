//! Defines the endpoint for a session's running balance.

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::{Error, session::SessionId, transaction::Ledger};

/// The response body for the transaction summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// The session's balance.
    pub summary: Summary,
}

/// The balance of a session.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// The sum of all signed transaction amounts, zero if there are none.
    pub amount: f64,
}

/// A route handler that returns the sum of the caller's transactions.
///
/// **Note**: Must be behind [crate::session::session_guard].
pub async fn get_summary_endpoint(
    State(ledger): State<Ledger>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Json<SummaryResponse>, Error> {
    let amount = ledger.summarize(session_id)?;

    Ok(Json(SummaryResponse {
        summary: Summary { amount },
    }))
}
