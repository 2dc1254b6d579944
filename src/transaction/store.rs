//! Database functions for the transaction collection.
//!
//! The collection is only ever written in bulk: the seed dataset replaces the
//! entire collection and individual transactions are never edited.

use std::ops::Range;

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::Error;

use super::core::{NewTransaction, Transaction, map_transaction_row, to_unix_millis};

/// Delete every transaction in the database.
///
/// Returns the number of deleted transactions. Clearing an empty table is not
/// an error.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn clear_transactions(connection: &Connection) -> Result<usize, Error> {
    let deleted = connection.execute("DELETE FROM \"transaction\"", ())?;

    Ok(deleted)
}

/// Insert all of `transactions` in order, returning the stored transactions
/// with their IDs.
///
/// This function does not wrap the inserts in a database transaction, callers
/// that need all-or-nothing semantics should use [replace_all_transactions] or
/// open their own.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn insert_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut stmt = connection.prepare(
        "INSERT INTO \"transaction\" (title, description, price, category, date_of_sale, sold)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING id, title, description, price, category, date_of_sale, sold",
    )?;

    let mut inserted = Vec::with_capacity(transactions.len());

    for transaction in transactions {
        let stored = stmt.query_row(
            (
                &transaction.title,
                &transaction.description,
                transaction.price,
                &transaction.category,
                to_unix_millis(transaction.date_of_sale),
                transaction.sold,
            ),
            map_transaction_row,
        )?;

        inserted.push(stored);
    }

    Ok(inserted)
}

/// Replace the entire transaction collection with `transactions`.
///
/// The delete and the inserts run in a single database transaction, so
/// readers see either the old collection or the new one and never an empty
/// table in between. If any insert fails, the old collection is kept.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn replace_all_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let tx = connection.unchecked_transaction()?;

    let deleted = clear_transactions(&tx)?;
    let inserted = insert_transactions(transactions, &tx)?;

    tx.commit()?;

    tracing::debug!(
        "replaced {deleted} transactions with {} transactions",
        inserted.len()
    );

    Ok(inserted)
}

/// Get the transactions with a date of sale in the half-open `date_range`,
/// in the order they were inserted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_in_range(
    date_range: Range<OffsetDateTime>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, description, price, category, date_of_sale, sold
             FROM \"transaction\"
             WHERE date_of_sale >= ?1 AND date_of_sale < ?2
             ORDER BY id ASC",
        )?
        .query_map(
            (
                to_unix_millis(date_range.start),
                to_unix_millis(date_range.end),
            ),
            map_transaction_row,
        )?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(*) FROM \"transaction\"", [], |row| row.get(0))?;

    Ok(count as usize)
}
