//! Implements the session-scoped ledger backed by a SQLite connection.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use crate::{
    Error,
    session::SessionId,
    transaction::{
        NewTransaction, Transaction,
        core::{create_transaction, get_transaction, get_transactions, sum_transactions},
    },
};

/// The result of recording a transaction with [Ledger::create_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTransaction {
    /// The transaction as it was stored.
    pub transaction: Transaction,
    /// The session the transaction was recorded under.
    pub session_id: SessionId,
    /// Whether `session_id` was minted for this request, in which case the
    /// caller must hand it to the client for future requests.
    pub is_new_session: bool,
}

/// Records and queries transactions, scoping every operation to a session.
///
/// The ledger does not own a global connection, it is given one when it is
/// constructed and shares it between clones.
#[derive(Debug, Clone)]
pub struct Ledger {
    connection: Arc<Mutex<Connection>>,
}

impl Ledger {
    /// Create a new ledger for the SQLite `connection`.
    ///
    /// The caller should make sure the database has been initialized with
    /// [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Record `transaction` under `existing_session_id`, or under a newly
    /// minted session if there is none.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn create_transaction(
        &self,
        transaction: NewTransaction,
        existing_session_id: Option<SessionId>,
    ) -> Result<CreatedTransaction, Error> {
        let (session_id, is_new_session) = match existing_session_id {
            Some(session_id) => (session_id, false),
            None => (SessionId::new_random(), true),
        };

        let connection = self.lock()?;
        let transaction = create_transaction(transaction, session_id, &connection)?;

        if is_new_session {
            // Session IDs are credentials and must not be logged.
            tracing::info!("Issued a new session for transaction {}", transaction.id);
        }

        Ok(CreatedTransaction {
            transaction,
            session_id,
            is_new_session,
        })
    }

    /// Get every transaction recorded under `session_id`, oldest first.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn list_transactions(&self, session_id: SessionId) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;
        get_transactions(session_id, &connection)
    }

    /// Get the transaction `id` if it exists and was recorded under `session_id`.
    ///
    /// Returns `None` both for missing transactions and for transactions that
    /// belong to another session, so callers cannot learn whether an ID is in
    /// use elsewhere.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn get_transaction(
        &self,
        session_id: SessionId,
        id: Uuid,
    ) -> Result<Option<Transaction>, Error> {
        let connection = self.lock()?;
        get_transaction(id, session_id, &connection)
    }

    /// Get the signed total of the transactions recorded under `session_id`.
    ///
    /// A session without transactions sums to zero.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the database lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn summarize(&self, session_id: SessionId) -> Result<f64, Error> {
        let connection = self.lock()?;
        sum_transactions(session_id, &connection)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

#[cfg(test)]
mod ledger_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        session::SessionId,
        transaction::{Ledger, NewTransaction, TransactionTitle, TransactionType},
    };

    fn get_test_ledger() -> Ledger {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        Ledger::new(Arc::new(Mutex::new(conn)))
    }

    fn salary() -> NewTransaction {
        NewTransaction::new(
            TransactionTitle::new_unchecked("Salary"),
            5000.0,
            TransactionType::Credit,
        )
        .unwrap()
    }

    fn rent() -> NewTransaction {
        NewTransaction::new(
            TransactionTitle::new_unchecked("Rent"),
            1200.0,
            TransactionType::Debit,
        )
        .unwrap()
    }

    #[test]
    fn create_without_session_issues_new_session() {
        let ledger = get_test_ledger();

        let created = ledger.create_transaction(salary(), None).unwrap();

        assert!(created.is_new_session);
        assert_eq!(created.transaction.session_id, created.session_id);
    }

    #[test]
    fn create_without_session_issues_distinct_sessions() {
        let ledger = get_test_ledger();

        let first = ledger.create_transaction(salary(), None).unwrap();
        let second = ledger.create_transaction(salary(), None).unwrap();

        assert_ne!(first.session_id, second.session_id);
    }

    #[test]
    fn create_with_session_reuses_it() {
        let ledger = get_test_ledger();
        let session_id = SessionId::new_random();

        let created = ledger.create_transaction(rent(), Some(session_id)).unwrap();

        assert!(!created.is_new_session);
        assert_eq!(created.session_id, session_id);
        assert_eq!(created.transaction.amount, -1200.0);
    }

    #[test]
    fn created_transaction_appears_once_in_list() {
        let ledger = get_test_ledger();
        let created = ledger.create_transaction(salary(), None).unwrap();

        let transactions = ledger.list_transactions(created.session_id).unwrap();

        assert_eq!(transactions, vec![created.transaction]);
    }

    #[test]
    fn get_is_scoped_to_session() {
        let ledger = get_test_ledger();
        let session_a = ledger.create_transaction(salary(), None).unwrap();
        let session_b = ledger.create_transaction(rent(), None).unwrap();

        let own = ledger
            .get_transaction(session_a.session_id, session_a.transaction.id)
            .unwrap();
        let foreign = ledger
            .get_transaction(session_a.session_id, session_b.transaction.id)
            .unwrap();

        assert_eq!(own, Some(session_a.transaction));
        assert_eq!(foreign, None);
    }

    #[test]
    fn summarize_salary_and_rent() {
        let ledger = get_test_ledger();
        let created = ledger.create_transaction(salary(), None).unwrap();
        ledger
            .create_transaction(rent(), Some(created.session_id))
            .unwrap();

        let summary = ledger.summarize(created.session_id).unwrap();

        assert_eq!(summary, 3800.0);
    }

    #[test]
    fn summarize_empty_session_is_zero() {
        let ledger = get_test_ledger();

        let summary = ledger.summarize(SessionId::new_random()).unwrap();

        assert_eq!(summary, 0.0);
    }
}
