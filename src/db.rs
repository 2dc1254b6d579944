//! Database setup and the helper for running queries off the async runtime.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, transaction::create_transaction_table};

/// Create the tables for the domain models.
///
/// This function is idempotent, it is safe to call on a database that has
/// already been initialized.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `query` against the shared database connection on the blocking thread pool.
///
/// The connection lock is held for the duration of `query`.
///
/// # Errors
/// Returns:
/// - [Error::DatabaseLockError] if the lock has been poisoned,
/// - [Error::BlockingTask] if the task panicked or was cancelled,
/// - or whatever error `query` returns.
pub(crate) async fn with_connection<T, F>(
    db_connection: &Arc<Mutex<Connection>>,
    query: F,
) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    let db_connection = db_connection.clone();

    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    })
    .await
    .map_err(|error| {
        tracing::error!("database task did not complete: {error}");
        Error::BlockingTask(error.to_string())
    })?
}
