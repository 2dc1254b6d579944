//! Defines the core data models for transactions and their table schema.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::database_id::DatabaseId;

// ============================================================================
// MODELS
// ============================================================================

/// A sale of a single product listing.
///
/// Transactions are only created in bulk from a seed dataset, see
/// [crate::replace_all_transactions]. To create the record for a new
/// transaction, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: DatabaseId,
    /// The product title.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// A free-form category label, e.g. "electronics".
    pub category: String,
    /// When the sale happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
}

impl Transaction {
    /// Create the record for a new transaction.
    ///
    /// The description and category default to empty strings and the
    /// transaction defaults to unsold.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            date_of_sale,
            sold: false,
        }
    }
}

/// A transaction that has not been stored yet.
///
/// This is also the shape of the records in the seed dataset. Fields in the
/// dataset that are not listed here (e.g., `id`, `image`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The product title.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// A free-form category label.
    pub category: String,
    /// When the sale happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// Whether the product was sold.
    pub sold: bool,
}

impl NewTransaction {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the transaction was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table and the index used for date range queries.
///
/// Dates are stored as UTC unix timestamps in milliseconds so that range
/// queries compare integers rather than formatted strings.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL,
            category TEXT NOT NULL,
            date_of_sale INTEGER NOT NULL,
            sold INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale
            ON \"transaction\"(date_of_sale);",
    )
}

/// Map a database row to a [Transaction].
///
/// The row must contain the columns `id, title, description, price, category,
/// date_of_sale, sold` in that order.
///
/// # Errors
/// Returns an error if a column is missing, has the wrong type, or the stored
/// timestamp is out of range.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date_of_sale: i64 = row.get(5)?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        date_of_sale: from_unix_millis(date_of_sale).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, error.into())
        })?,
        sold: row.get(6)?,
    })
}

pub(super) fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    date_time.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{NewTransaction, Transaction, from_unix_millis, to_unix_millis};

    #[test]
    fn deserializes_seed_record_and_ignores_unknown_fields() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven  - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 329.85,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;

        let got: NewTransaction = serde_json::from_str(json).unwrap();

        assert_eq!(
            got,
            Transaction::build(
                "Fjallraven  - Foldsack No. 1 Backpack, Fits 15 Laptops",
                329.85,
                datetime!(2021-11-27 20:29:54 +05:30),
            )
            .description("Your perfect pack for everyday use and walks in the forest.")
            .category("men's clothing")
            .sold(false)
        );
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let transaction = Transaction {
            id: 7,
            title: "Mug".to_owned(),
            description: "A mug".to_owned(),
            price: 12.5,
            category: "kitchen".to_owned(),
            date_of_sale: datetime!(2024-03-04 05:06:07 UTC),
            sold: true,
        };

        let got = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            got,
            serde_json::json!({
                "id": 7,
                "title": "Mug",
                "description": "A mug",
                "price": 12.5,
                "category": "kitchen",
                "dateOfSale": "2024-03-04T05:06:07Z",
                "sold": true
            })
        );
    }

    #[test]
    fn unix_millis_keeps_millisecond_precision() {
        let date_time = datetime!(2024-02-29 23:59:59.999 UTC);

        let millis = to_unix_millis(date_time);

        assert_eq!(from_unix_millis(millis).unwrap(), date_time);
    }

    #[test]
    fn unix_millis_normalises_offset_to_utc() {
        let local = datetime!(2021-11-27 20:29:54 +05:30);

        let got = from_unix_millis(to_unix_millis(local)).unwrap();

        assert_eq!(got, local);
        assert_eq!(got.offset(), time::UtcOffset::UTC);
    }
}
