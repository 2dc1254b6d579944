//! Month views over the transaction collection.
//!
//! This module contains:
//! - Pure functions that derive statistics and histograms from transactions
//! - Async service functions that load a month from the store
//! - The JSON endpoints that expose each view

mod api;
mod service;
mod views;

pub use api::{
    JsonError, ListQuery, MonthQuery, bar_chart_endpoint, combined_endpoint,
    list_transactions_endpoint, pie_chart_endpoint, statistics_endpoint,
};
pub use service::{CombinedView, get_combined, search_page};
pub use views::{LabelCount, Statistics};
