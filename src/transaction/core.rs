//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, session::SessionId};

// ============================================================================
// MODELS
// ============================================================================

/// Money that was either earned or spent, recorded under an anonymous session.
///
/// To create a new `Transaction`, use [NewTransaction::new] and insert it with
/// [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: Uuid,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The signed amount of money, positive for credits and negative for debits.
    pub amount: f64,
    /// The session the transaction was recorded under.
    pub session_id: SessionId,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned or received.
    Credit,
    /// Money that was spent.
    Debit,
}

impl TransactionType {
    /// Fold the transaction type into the sign of `amount`.
    ///
    /// A debit of zero comes out as `0.0`, not `-0.0`.
    pub fn apply_sign(self, amount: f64) -> f64 {
        match self {
            TransactionType::Credit => amount,
            TransactionType::Debit if amount == 0.0 => 0.0,
            TransactionType::Debit => -amount,
        }
    }
}

/// The title of a transaction, guaranteed to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTitle(String);

impl TransactionTitle {
    /// Create a transaction title.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTitle] if `title` is empty
    /// or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else {
            Ok(Self(title.to_owned()))
        }
    }

    /// Create a transaction title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_owned())
    }
}

impl AsRef<str> for TransactionTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The largest amount a single transaction may carry.
///
/// Summing any number of rows below this bound stays finite.
pub const MAX_AMOUNT: f64 = 1e15;

/// A validated transaction that has not been written to the database yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    title: TransactionTitle,
    amount: f64,
}

impl NewTransaction {
    /// Create a new transaction from an unsigned `amount` and its type.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAmount] if `amount` is
    /// negative, NaN, infinite or greater than [MAX_AMOUNT].
    pub fn new(
        title: TransactionTitle,
        amount: f64,
        transaction_type: TransactionType,
    ) -> Result<Self, Error> {
        // NaN and infinities fall outside the range too.
        if !(0.0..=MAX_AMOUNT).contains(&amount) {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Self {
            title,
            amount: transaction_type.apply_sign(amount),
        })
    }

    /// The transaction title.
    pub fn title(&self) -> &TransactionTitle {
        &self.title
    }

    /// The signed amount that will be stored.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction under `session_id` in the database.
///
/// The ID and creation time are generated here.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    session_id: SessionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (id, title, amount, session_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, title, amount, session_id, created_at",
        )?
        .query_row(
            (
                Uuid::new_v4().to_string(),
                transaction.title.as_ref(),
                transaction.amount,
                session_id.to_string(),
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` if it was recorded under `session_id`.
///
/// A transaction that belongs to another session is treated the same as one
/// that does not exist.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: Uuid,
    session_id: SessionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE id = :id AND session_id = :session_id",
        )?
        .query_row(
            &[
                (":id", &id.to_string()),
                (":session_id", &session_id.to_string()),
            ],
            map_transaction_row,
        )
        .optional()?;

    Ok(transaction)
}

/// Retrieve all transactions recorded under `session_id`, oldest first.
///
/// Transactions with the same creation time are returned in insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    session_id: SessionId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, session_id, created_at FROM transactions
             WHERE session_id = :session_id
             ORDER BY created_at ASC, rowid ASC",
        )?
        .query_map(
            &[(":session_id", &session_id.to_string())],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Sum the amounts of all transactions recorded under `session_id`.
///
/// Returns zero for a session without transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn sum_transactions(session_id: SessionId, connection: &Connection) -> Result<f64, Error> {
    // TOTAL, unlike SUM, returns 0.0 instead of NULL for an empty set.
    connection
        .query_row(
            "SELECT TOTAL(amount) FROM transactions WHERE session_id = ?1",
            (session_id.to_string(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                session_id TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query is scoped by session.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_session_id ON transactions(session_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = get_uuid(row, 0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let session_id = SessionId::new(get_uuid(row, 3)?);
    let created_at = row.get(4)?;

    Ok(Transaction {
        id,
        title,
        amount,
        session_id,
        created_at,
    })
}

fn get_uuid(row: &Row, index: usize) -> Result<Uuid, rusqlite::Error> {
    let text: String = row.get(index)?;

    Uuid::parse_str(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use uuid::Uuid;

    use crate::{
        db::initialize,
        session::SessionId,
        transaction::{
            MAX_AMOUNT, NewTransaction, TransactionTitle, TransactionType,
            core::{create_transaction, get_transaction, get_transactions, sum_transactions},
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(
        title: &str,
        amount: f64,
        transaction_type: TransactionType,
    ) -> NewTransaction {
        NewTransaction::new(TransactionTitle::new_unchecked(title), amount, transaction_type)
            .unwrap()
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();

        let result = create_transaction(
            new_transaction("Salary", 5000.0, TransactionType::Credit),
            session_id,
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.title, "Salary");
                assert_eq!(transaction.amount, 5000.0);
                assert_eq!(transaction.session_id, session_id);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_debit_as_negative() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();

        let created = create_transaction(
            new_transaction("Rent", 1200.0, TransactionType::Debit),
            session_id,
            &conn,
        )
        .unwrap();

        let got = get_transaction(created.id, session_id, &conn).unwrap();
        assert_eq!(got.map(|transaction| transaction.amount), Some(-1200.0));
    }

    #[test]
    fn create_generates_unique_ids() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();

        let first = create_transaction(
            new_transaction("Coffee", 4.5, TransactionType::Debit),
            session_id,
            &conn,
        )
        .unwrap();
        let second = create_transaction(
            new_transaction("Coffee", 4.5, TransactionType::Debit),
            session_id,
            &conn,
        )
        .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_round_trips_created_transaction() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();
        let created = create_transaction(
            new_transaction("Groceries", 87.25, TransactionType::Debit),
            session_id,
            &conn,
        )
        .unwrap();

        let got = get_transaction(created.id, session_id, &conn).unwrap();

        assert_eq!(got, Some(created));
    }

    #[test]
    fn get_from_other_session_returns_none() {
        let conn = get_test_connection();
        let owner = SessionId::new_random();
        let other = SessionId::new_random();
        let created = create_transaction(
            new_transaction("Salary", 5000.0, TransactionType::Credit),
            owner,
            &conn,
        )
        .unwrap();

        let got = get_transaction(created.id, other, &conn).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn get_missing_returns_none() {
        let conn = get_test_connection();

        let got = get_transaction(Uuid::new_v4(), SessionId::new_random(), &conn).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn get_transactions_is_scoped_and_ordered() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();
        let other = SessionId::new_random();
        let mut want = Vec::new();
        for i in 1..=5 {
            want.push(
                create_transaction(
                    new_transaction(
                        &format!("Transaction {i}"),
                        i as f64,
                        TransactionType::Credit,
                    ),
                    session_id,
                    &conn,
                )
                .unwrap(),
            );
            create_transaction(
                new_transaction("Someone else's", 1.0, TransactionType::Debit),
                other,
                &conn,
            )
            .unwrap();
        }

        let got = get_transactions(session_id, &conn).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn get_transactions_for_new_session_is_empty() {
        let conn = get_test_connection();

        let got = get_transactions(SessionId::new_random(), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn sum_is_scoped_to_session() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();
        let other = SessionId::new_random();
        for (title, amount, transaction_type) in [
            ("Salary", 5000.0, TransactionType::Credit),
            ("Rent", 1200.0, TransactionType::Debit),
            ("Bonus", 250.5, TransactionType::Credit),
        ] {
            create_transaction(
                new_transaction(title, amount, transaction_type),
                session_id,
                &conn,
            )
            .unwrap();
        }
        create_transaction(
            new_transaction("Lottery", 1_000_000.0, TransactionType::Credit),
            other,
            &conn,
        )
        .unwrap();

        let got = sum_transactions(session_id, &conn).unwrap();

        assert_eq!(got, 4050.5);
    }

    #[test]
    fn sum_of_empty_session_is_zero() {
        let conn = get_test_connection();

        let got = sum_transactions(SessionId::new_random(), &conn).unwrap();

        assert_eq!(got, 0.0);
    }

    #[test]
    fn sum_of_largest_amounts_is_finite() {
        let conn = get_test_connection();
        let session_id = SessionId::new_random();
        for _ in 0..2 {
            create_transaction(
                new_transaction("Windfall", MAX_AMOUNT, TransactionType::Credit),
                session_id,
                &conn,
            )
            .unwrap();
        }

        let got = sum_transactions(session_id, &conn).unwrap();

        assert!(got.is_finite());
        assert_eq!(got, 2.0 * MAX_AMOUNT);
    }
}
