use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use pocket_ledger::{Ledger, NewTransaction, TransactionTitle, TransactionType, initialize_db};

/// A utility for creating a test database for the REST API server of pocket_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let ledger = Ledger::new(Arc::new(Mutex::new(conn)));
    let mut session_id = None;

    for (title, amount, transaction_type) in [
        ("Salary", 5000.0, TransactionType::Credit),
        ("Rent", 1200.0, TransactionType::Debit),
        ("Groceries", 87.25, TransactionType::Debit),
        ("Freelance work", 640.0, TransactionType::Credit),
    ] {
        let transaction =
            NewTransaction::new(TransactionTitle::new(title)?, amount, transaction_type)?;
        let created = ledger.create_transaction(transaction, session_id)?;
        session_id = Some(created.session_id);
    }

    if let Some(session_id) = session_id {
        println!("Success! Send the cookie 'sessionId={session_id}' to use the test session.");
    }

    Ok(())
}
