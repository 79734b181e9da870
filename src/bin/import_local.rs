use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{LocalStore, import_transactions, initialize_db};

/// A utility for moving transactions from a local store file into the
/// finance tracker's SQLite database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the local store JSON file.
    #[arg(long)]
    local_store: String,

    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,
}

/// Copy every transaction in the local store into the database.
///
/// The local store is left unchanged. Running the import twice will insert
/// the transactions twice.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let store_path = Path::new(&args.local_store);

    if !store_path.is_file() {
        eprintln!("No local store found at {store_path:#?}!");
        exit(1);
    }

    let store = LocalStore::open(store_path);
    let transactions = store.try_get_transactions()?;

    if transactions.is_empty() {
        println!("The local store at {store_path:#?} has no transactions, nothing to import.");
        return Ok(());
    }

    println!("Opening database at {:#?}", args.db_path);
    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    println!("Importing {} transactions...", transactions.len());
    let imported = import_transactions(&transactions, &connection)?;

    println!("Success! Imported {} transactions.", imported.len());

    Ok(())
}
