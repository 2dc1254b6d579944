//! Derived views over a month of transactions.
//!
//! Every view is recomputed from the transactions passed in, nothing is cached
//! between requests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Totals over a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the price of every transaction.
    pub total: f64,
    /// The number of transactions that were sold.
    pub sold_items: usize,
    /// The number of transactions that were not sold.
    pub not_sold_items: usize,
}

/// The number of transactions with a given label, e.g. a price range or a
/// category, as plotted by the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    /// The price range or category label.
    #[serde(rename = "_id")]
    pub label: String,
    /// The number of transactions with this label.
    pub count: usize,
}

impl LabelCount {
    fn new(label: &str, count: usize) -> Self {
        Self {
            label: label.to_owned(),
            count,
        }
    }
}

/// A bucket of the price histogram, covering prices up to and including
/// `max`. The lower bound is the previous bucket's `max`, exclusive.
#[derive(Debug, Clone, Copy)]
pub struct PriceRange {
    /// The label shown on the chart.
    pub label: &'static str,
    /// The inclusive upper bound, `None` for the open-ended last bucket.
    pub max: Option<f64>,
}

/// The fixed buckets of the price histogram, in chart order.
pub const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange {
        label: "0-100",
        max: Some(100.0),
    },
    PriceRange {
        label: "101-200",
        max: Some(200.0),
    },
    PriceRange {
        label: "201-300",
        max: Some(300.0),
    },
    PriceRange {
        label: "301-400",
        max: Some(400.0),
    },
    PriceRange {
        label: "401-500",
        max: Some(500.0),
    },
    PriceRange {
        label: "501-600",
        max: Some(600.0),
    },
    PriceRange {
        label: "601-700",
        max: Some(700.0),
    },
    PriceRange {
        label: "701-800",
        max: Some(800.0),
    },
    PriceRange {
        label: "801-900",
        max: Some(900.0),
    },
    PriceRange {
        label: "901-above",
        max: None,
    },
];

/// Calculate the total sales amount and the sold/not sold counts.
pub fn calculate_statistics(transactions: &[Transaction]) -> Statistics {
    let total = transactions
        .iter()
        .map(|transaction| transaction.price)
        .sum();
    let sold_items = transactions
        .iter()
        .filter(|transaction| transaction.sold)
        .count();

    Statistics {
        total,
        sold_items,
        not_sold_items: transactions.len() - sold_items,
    }
}

/// Get the index into [PRICE_RANGES] of the bucket that contains `price`.
///
/// Returns `None` for negative prices and NaN, which belong to no bucket.
pub fn price_range_index(price: f64) -> Option<usize> {
    if price.is_nan() || price < 0.0 {
        return None;
    }

    PRICE_RANGES
        .iter()
        .position(|range| range.max.is_none_or(|max| price <= max))
}

/// Count the transactions in each of the [PRICE_RANGES].
///
/// Always returns one entry per price range, in the order of [PRICE_RANGES].
pub fn price_histogram(transactions: &[Transaction]) -> Vec<LabelCount> {
    let mut counts = [0usize; PRICE_RANGES.len()];

    for index in transactions
        .iter()
        .filter_map(|transaction| price_range_index(transaction.price))
    {
        counts[index] += 1;
    }

    PRICE_RANGES
        .iter()
        .zip(counts)
        .map(|(range, count)| LabelCount::new(range.label, count))
        .collect()
}

/// Count the transactions in each category.
///
/// Categories are compared by exact string match and listed in the order they
/// are first seen in `transactions`.
pub fn category_histogram(transactions: &[Transaction]) -> Vec<LabelCount> {
    let mut histogram: Vec<LabelCount> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        match index_by_category.get(transaction.category.as_str()) {
            Some(&index) => histogram[index].count += 1,
            None => {
                index_by_category.insert(&transaction.category, histogram.len());
                histogram.push(LabelCount::new(&transaction.category, 1));
            }
        }
    }

    histogram
}

/// Whether `transaction` matches the search term `search`.
///
/// A transaction matches if `search` is a case-insensitive substring of its
/// title or description, or a substring of its price written as a decimal
/// number (e.g. "99" matches a price of 199). An empty search matches
/// everything.
pub fn matches_search(transaction: &Transaction, search: &str) -> bool {
    let search_lowercase = search.to_lowercase();

    transaction
        .title
        .to_lowercase()
        .contains(&search_lowercase)
        || transaction
            .description
            .to_lowercase()
            .contains(&search_lowercase)
        || transaction.price.to_string().contains(search)
}

/// Keep the transactions that match `search`, preserving their order.
pub fn search_transactions(transactions: Vec<Transaction>, search: &str) -> Vec<Transaction> {
    if search.is_empty() {
        return transactions;
    }

    transactions
        .into_iter()
        .filter(|transaction| matches_search(transaction, search))
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::transaction::Transaction;

    use super::{
        LabelCount, PRICE_RANGES, Statistics, calculate_statistics, category_histogram,
        matches_search, price_histogram, price_range_index, search_transactions,
    };

    fn create_test_transaction(id: i64, price: f64, category: &str, sold: bool) -> Transaction {
        Transaction {
            id,
            title: format!("Item {id}"),
            description: String::new(),
            price,
            category: category.to_owned(),
            date_of_sale: datetime!(2024-03-15 12:00 UTC),
            sold,
        }
    }

    fn with_text(title: &str, description: &str, price: f64) -> Transaction {
        Transaction {
            title: title.to_owned(),
            description: description.to_owned(),
            ..create_test_transaction(1, price, "", false)
        }
    }

    #[test]
    fn statistics_sums_prices_and_counts_sold() {
        let transactions = [
            create_test_transaction(1, 10.5, "A", true),
            create_test_transaction(2, 20.0, "A", false),
            create_test_transaction(3, 30.0, "B", true),
        ];

        let got = calculate_statistics(&transactions);

        assert_eq!(
            got,
            Statistics {
                total: 60.5,
                sold_items: 2,
                not_sold_items: 1,
            }
        );
    }

    #[test]
    fn statistics_counts_partition_the_input() {
        let transactions: Vec<_> = (0..17)
            .map(|i| create_test_transaction(i, i as f64, "A", i % 3 == 0))
            .collect();

        let got = calculate_statistics(&transactions);

        assert_eq!(got.sold_items + got.not_sold_items, transactions.len());
    }

    #[test]
    fn statistics_of_nothing_is_zero() {
        let got = calculate_statistics(&[]);

        assert_eq!(
            got,
            Statistics {
                total: 0.0,
                sold_items: 0,
                not_sold_items: 0,
            }
        );
    }

    #[test]
    fn price_range_boundaries() {
        assert_eq!(price_range_index(0.0), Some(0));
        assert_eq!(price_range_index(100.0), Some(0));
        assert_eq!(price_range_index(100.5), Some(1));
        assert_eq!(price_range_index(101.0), Some(1));
        assert_eq!(price_range_index(200.0), Some(1));
        assert_eq!(price_range_index(900.0), Some(8));
        assert_eq!(price_range_index(900.01), Some(9));
        assert_eq!(price_range_index(950.0), Some(9));
        assert_eq!(price_range_index(f64::INFINITY), Some(9));
    }

    #[test]
    fn negative_and_nan_prices_have_no_range() {
        assert_eq!(price_range_index(-0.01), None);
        assert_eq!(price_range_index(f64::NAN), None);
    }

    #[test]
    fn every_non_negative_price_has_exactly_one_range() {
        for cents in (0..120_000).step_by(7) {
            let price = cents as f64 / 100.0;

            let matching_ranges = PRICE_RANGES
                .iter()
                .enumerate()
                .filter(|(index, range)| {
                    let min = if *index == 0 {
                        f64::NEG_INFINITY
                    } else {
                        PRICE_RANGES[index - 1].max.unwrap()
                    };
                    price > min && range.max.is_none_or(|max| price <= max)
                })
                .count();

            assert_eq!(
                matching_ranges,
                1,
                "price {price} matched {matching_ranges} ranges"
            );
            assert!(price_range_index(price).is_some());
        }
    }

    #[test]
    fn price_histogram_has_fixed_labels_in_order() {
        let transactions = [
            create_test_transaction(1, 100.0, "A", true),
            create_test_transaction(2, 101.0, "A", true),
            create_test_transaction(3, 950.0, "A", true),
            create_test_transaction(4, 50.0, "A", true),
        ];

        let got = price_histogram(&transactions);

        let labels: Vec<_> = got.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700",
                "701-800", "801-900", "901-above"
            ]
        );
        let counts: Vec<_> = got.iter().map(|bucket| bucket.count).collect();
        assert_eq!(counts, [2, 1, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn price_histogram_of_nothing_has_ten_zero_buckets() {
        let got = price_histogram(&[]);

        assert_eq!(got.len(), 10);
        assert!(got.iter().all(|bucket| bucket.count == 0));
    }

    #[test]
    fn category_histogram_keeps_first_seen_order() {
        let transactions = [
            create_test_transaction(1, 1.0, "Zebra", true),
            create_test_transaction(2, 1.0, "Apple", true),
            create_test_transaction(3, 1.0, "Zebra", false),
            create_test_transaction(4, 1.0, "apple", false),
        ];

        let got = category_histogram(&transactions);

        assert_eq!(
            got,
            vec![
                LabelCount::new("Zebra", 2),
                LabelCount::new("Apple", 1),
                LabelCount::new("apple", 1),
            ]
        );
    }

    #[test]
    fn label_count_serializes_label_as_id() {
        let got = serde_json::to_value(LabelCount::new("0-100", 3)).unwrap();

        assert_eq!(got, serde_json::json!({"_id": "0-100", "count": 3}));
    }

    #[test]
    fn search_is_case_insensitive_on_title_and_description() {
        let transaction = with_text("Mens Casual Slim Fit", "Great for Spring", 15.99);

        assert!(matches_search(&transaction, "casual"));
        assert!(matches_search(&transaction, "SLIM"));
        assert!(matches_search(&transaction, "spring"));
        assert!(!matches_search(&transaction, "winter"));
    }

    #[test]
    fn search_matches_price_text() {
        let cheap = with_text("Hat", "", 199.0);
        let expensive = with_text("Coat", "", 990.0);
        let other = with_text("Scarf", "", 909.0);

        assert!(matches_search(&cheap, "99"));
        assert!(matches_search(&expensive, "99"));
        assert!(!matches_search(&other, "99"));
        assert!(matches_search(&with_text("Pen", "", 15.99), "5.9"));
    }

    #[test]
    fn empty_search_matches_everything() {
        let transactions = vec![with_text("A", "", 1.0), with_text("B", "", 2.0)];

        let got = search_transactions(transactions.clone(), "");

        assert_eq!(got, transactions);
    }

    #[test]
    fn search_preserves_order() {
        let transactions = vec![
            with_text("Blue shirt", "", 1.0),
            with_text("Red hat", "", 2.0),
            with_text("Red shirt", "", 3.0),
        ];

        let got = search_transactions(transactions, "shirt");

        let titles: Vec<_> = got.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Blue shirt", "Red shirt"]);
    }
}
