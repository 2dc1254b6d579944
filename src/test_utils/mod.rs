#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    Error,
    db::initialize,
    seed::SeedSource,
    transaction::{NewTransaction, Transaction, insert_transactions},
};

pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};

/// A seed source that always returns the same records.
#[derive(Debug, Clone)]
pub(crate) struct StaticSeedSource(pub Vec<NewTransaction>);

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        Ok(self.0.clone())
    }
}

/// A seed source whose upstream is always down.
#[derive(Debug, Clone)]
pub(crate) struct FailingSeedSource;

#[async_trait]
impl SeedSource for FailingSeedSource {
    async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        Err(Error::SeedFetch("connection refused".to_owned()))
    }
}

pub(crate) fn get_test_db_connection() -> Arc<Mutex<Connection>> {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}

/// Three transactions on the 15th of January, February and March of `year`
/// priced 50, 150 and 950 in the categories "A", "A" and "B".
pub(crate) fn fixture_transactions(year: i32) -> Vec<NewTransaction> {
    let mid_month = |month| {
        Date::from_calendar_date(year, month, 15)
            .expect("Invalid fixture date")
            .with_hms(12, 0, 0)
            .expect("Invalid fixture time")
            .assume_utc()
    };

    vec![
        Transaction::build("January item", 50.0, mid_month(Month::January))
            .description("Sold in January")
            .category("A")
            .sold(true),
        Transaction::build("February item", 150.0, mid_month(Month::February))
            .description("Listed in February")
            .category("A"),
        Transaction::build("March item", 950.0, mid_month(Month::March))
            .description("Sold in March")
            .category("B")
            .sold(true),
    ]
}

pub(crate) fn insert_fixture(db_connection: &Arc<Mutex<Connection>>, year: i32) {
    let connection = db_connection.lock().expect("Could not lock database");

    insert_transactions(&fixture_transactions(year), &connection)
        .expect("Could not insert fixture");
}
