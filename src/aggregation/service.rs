//! Loads a month of transactions from the store and derives the requested view.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::with_connection,
    month::MonthFilter,
    pagination::paginate,
    transaction::{Transaction, get_transactions_in_range},
};

use super::views::{
    LabelCount, Statistics, calculate_statistics, category_histogram, price_histogram,
    search_transactions,
};

/// Every view of a month in one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedView {
    /// All transactions in the month, unsearched and unpaginated.
    pub transactions: Vec<Transaction>,
    /// Totals over the month.
    pub statistics: Statistics,
    /// Transaction counts per price range.
    pub bar_chart: Vec<LabelCount>,
    /// Transaction counts per category.
    pub pie_chart: Vec<LabelCount>,
}

/// A page of the transactions that match a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// The transactions on the requested page.
    pub transactions: Vec<Transaction>,
    /// The number of transactions that matched the search across all pages.
    pub total_matches: usize,
}

/// Get the transactions selected by `month_filter`, in insertion order.
///
/// [MonthFilter::NoMatch] short-circuits to an empty list without touching the
/// database.
pub async fn load_month(
    db_connection: &Arc<Mutex<Connection>>,
    month_filter: &MonthFilter,
) -> Result<Vec<Transaction>, Error> {
    let date_range = match month_filter {
        MonthFilter::Interval(date_range) => date_range.clone(),
        MonthFilter::NoMatch => return Ok(Vec::new()),
    };

    with_connection(db_connection, move |connection| {
        get_transactions_in_range(date_range, connection)
            .inspect_err(|error| tracing::error!("could not get transactions for month: {error}"))
    })
    .await
}

/// Filter the month by `search` and select the 1-based `page` of `per_page`
/// transactions.
pub async fn search_page(
    db_connection: &Arc<Mutex<Connection>>,
    month_filter: &MonthFilter,
    search: &str,
    page: i64,
    per_page: i64,
) -> Result<SearchPage, Error> {
    let transactions = load_month(db_connection, month_filter).await?;
    let matches = search_transactions(transactions, search);
    let total_matches = matches.len();

    Ok(SearchPage {
        transactions: paginate(matches, page, per_page),
        total_matches,
    })
}

/// Get the totals for the month.
pub async fn get_statistics(
    db_connection: &Arc<Mutex<Connection>>,
    month_filter: &MonthFilter,
) -> Result<Statistics, Error> {
    let transactions = load_month(db_connection, month_filter).await?;

    Ok(calculate_statistics(&transactions))
}

/// Get the price histogram for the month.
pub async fn get_bar_chart(
    db_connection: &Arc<Mutex<Connection>>,
    month_filter: &MonthFilter,
) -> Result<Vec<LabelCount>, Error> {
    let transactions = load_month(db_connection, month_filter).await?;

    Ok(price_histogram(&transactions))
}

/// Get the category histogram for the month.
pub async fn get_pie_chart(
    db_connection: &Arc<Mutex<Connection>>,
    month_filter: &MonthFilter,
) -> Result<Vec<LabelCount>, Error> {
    let transactions = load_month(db_connection, month_filter).await?;

    Ok(category_histogram(&transactions))
}

/// Compute every view of the month.
///
/// The four views are loaded concurrently and the first error fails the
/// whole view.
pub async fn get_combined(
    db_connection: &Arc<Mutex<Connection>>,
    month_filter: &MonthFilter,
) -> Result<CombinedView, Error> {
    let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
        load_month(db_connection, month_filter),
        get_statistics(db_connection, month_filter),
        get_bar_chart(db_connection, month_filter),
        get_pie_chart(db_connection, month_filter),
    )?;

    Ok(CombinedView {
        transactions,
        statistics,
        bar_chart,
        pie_chart,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        month::MonthFilter,
        test_utils::{get_test_db_connection, insert_fixture},
        transaction::Transaction,
    };

    use super::{get_combined, load_month, search_page};

    fn march_2024() -> MonthFilter {
        MonthFilter::Interval(datetime!(2024-03-01 0:00 UTC)..datetime!(2024-04-01 0:00 UTC))
    }

    #[tokio::test]
    async fn no_match_returns_nothing() {
        let db_connection = get_test_db_connection();
        insert_fixture(&db_connection, 2024);

        let got = load_month(&db_connection, &MonthFilter::NoMatch)
            .await
            .unwrap();

        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn search_page_counts_all_matches() {
        let db_connection = get_test_db_connection();
        let transactions: Vec<_> = (1..=15)
            .map(|i| {
                Transaction::build(
                    &format!("Shirt {i}"),
                    i as f64,
                    datetime!(2024-03-10 9:00 UTC),
                )
            })
            .collect();
        crate::transaction::insert_transactions(&transactions, &db_connection.lock().unwrap())
            .unwrap();

        let got = search_page(&db_connection, &march_2024(), "shirt", 2, 10)
            .await
            .unwrap();

        assert_eq!(got.total_matches, 15);
        let titles: Vec<_> = got.transactions.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Shirt 11", "Shirt 12", "Shirt 13", "Shirt 14", "Shirt 15"]
        );
    }

    #[tokio::test]
    async fn combined_view_agrees_with_its_parts() {
        let db_connection = get_test_db_connection();
        insert_fixture(&db_connection, 2024);

        let got = get_combined(&db_connection, &march_2024()).await.unwrap();

        assert_eq!(got.transactions.len(), 1);
        assert_eq!(got.statistics.total, 950.0);
        assert_eq!(
            got.statistics.sold_items + got.statistics.not_sold_items,
            got.transactions.len()
        );
        assert_eq!(got.bar_chart.len(), 10);
        assert_eq!(got.bar_chart[9].count, 1);
        assert_eq!(got.pie_chart.len(), 1);
        assert_eq!(got.pie_chart[0].label, "B");
    }

    #[tokio::test]
    async fn combined_view_fails_when_store_is_unavailable() {
        let db_connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let poisoner = db_connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let result = get_combined(&db_connection, &march_2024()).await;

        assert!(matches!(result, Err(Error::DatabaseLockError)));
    }
}
