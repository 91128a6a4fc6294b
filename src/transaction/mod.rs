//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `NewTransaction`
//! - Database functions for storing and querying transactions
//! - The `Ledger` that scopes every operation to a session
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod get_endpoint;
mod ledger;
mod list_endpoint;
mod summary_endpoint;

pub use core::{
    MAX_AMOUNT, NewTransaction, Transaction, TransactionTitle, TransactionType,
    create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use ledger::{CreatedTransaction, Ledger};
pub use list_endpoint::get_transactions_endpoint;
pub use summary_endpoint::get_summary_endpoint;
