//! Dashboard module
//!
//! Provides a page showing a month of sales: summary statistics, a price range
//! chart, a category chart and a searchable transaction table.

mod cards;
mod charts;
mod handlers;
mod table;

pub use handlers::{DashboardState, get_dashboard_page, get_transactions_table};
