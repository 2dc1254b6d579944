use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{FileSeedSource, SeedSource, initialize_db, replace_all_transactions};

/// A utility for loading a JSON sales dataset into a database for the sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// File path to a JSON array of transactions.
    #[arg(long, short)]
    input: String,
}

/// Replace the transactions in a database with the records in a JSON file.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let input_path = Path::new(&args.input);

    if !input_path.is_file() {
        eprintln!("Could not find the dataset at {input_path:#?}.");
        exit(1);
    }

    println!("Reading transactions from {input_path:#?}...");
    let transactions = FileSeedSource::new(input_path).fetch().await?;

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;

    initialize_db(&conn)?;

    let inserted = replace_all_transactions(&transactions, &conn)?;

    println!("Loaded {} transactions. Success!", inserted.len());

    Ok(())
}
