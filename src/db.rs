//! Sets up the application database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::transaction::create_transaction_table;

/// Create the tables and indexes for the domain models if they do not exist yet.
///
/// All tables are created in a single exclusive transaction, so a failure
/// leaves the database untouched.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
