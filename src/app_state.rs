//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::Duration;

use crate::{Error, db::initialize, session::DEFAULT_SESSION_DURATION, transaction::Ledger};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ledger that stores every session's transactions.
    pub ledger: Ledger,

    /// How long clients should keep a newly issued session cookie.
    pub session_duration: Duration,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// The connection is closed once the last clone of the state is dropped.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            ledger: Ledger::new(connection),
            session_duration: DEFAULT_SESSION_DURATION,
        })
    }
}

impl FromRef<AppState> for Ledger {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}
