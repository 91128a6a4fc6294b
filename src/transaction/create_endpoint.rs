//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{HeaderName, StatusCode, header::LOCATION},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    session::{get_session_id_from_cookies, set_session_cookie},
    transaction::{Ledger, NewTransaction, TransactionTitle, TransactionType},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The ledger to record the transaction in.
    pub ledger: Ledger,
    /// How long clients should keep a newly issued session cookie.
    pub session_duration: Duration,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            session_duration: state.session_duration,
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Text detailing the transaction.
    pub title: String,
    /// The unsigned value of the transaction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// A route handler for creating a new transaction, responds with `201 Created`,
/// the new transaction's URI in the `Location` header and an empty body on success.
///
/// If the request does not carry a valid session cookie, a new session is
/// issued and its cookie is set on the response.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    jar: CookieJar,
    body: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], CookieJar), Error> {
    let Json(body) = body.inspect_err(|rejection| {
        tracing::debug!("rejected create transaction body: {rejection}");
    })?;

    let title = TransactionTitle::new(&body.title)?;
    let transaction = NewTransaction::new(title, body.amount, body.transaction_type)?;

    let existing_session_id = get_session_id_from_cookies(&jar).ok();
    let created = state.ledger.create_transaction(transaction, existing_session_id)?;

    let jar = if created.is_new_session {
        set_session_cookie(jar, created.session_id, state.session_duration)
    } else {
        jar
    };

    let location = format_endpoint(endpoints::TRANSACTION, created.transaction.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], jar))
}
