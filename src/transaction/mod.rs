//! Sales transactions.
//!
//! This module contains everything related to the transaction collection:
//! - The `Transaction` model and the `NewTransaction` seed record
//! - Database functions for bulk replacing and querying transactions by date

mod core;
mod store;

pub use core::{NewTransaction, Transaction, create_transaction_table};
pub use store::{
    count_transactions, get_transactions_in_range, insert_transactions, replace_all_transactions,
};
