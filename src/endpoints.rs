//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page for a selected month.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The partial for the dashboard's transaction table.
pub const DASHBOARD_TRANSACTIONS: &str = "/dashboard/transactions";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route that replaces the transactions with the seed dataset.
pub const INIT_API: &str = "/api/init";
/// The route to list a month's transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for a month's totals.
pub const STATISTICS_API: &str = "/api/statistics";
/// The route for a month's price histogram.
pub const BAR_CHART_API: &str = "/api/barchart";
/// The route for a month's category histogram.
pub const PIE_CHART_API: &str = "/api/piechart";
/// The route for every view of a month at once.
pub const COMBINED_API: &str = "/api/combined";
