//! Application router configuration with the page and JSON API route definitions.

use axum::{Router, response::Redirect, routing::get};

use crate::{
    AppState,
    aggregation::{
        bar_chart_endpoint, combined_endpoint, list_transactions_endpoint, pie_chart_endpoint,
        statistics_endpoint,
    },
    dashboard::{get_dashboard_page, get_transactions_table},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    seed::init_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::DASHBOARD_TRANSACTIONS,
            get(get_transactions_table),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::INIT_API, get(init_endpoint))
        .route(endpoints::TRANSACTIONS_API, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS_API, get(statistics_endpoint))
        .route(endpoints::BAR_CHART_API, get(bar_chart_endpoint))
        .route(endpoints::PIE_CHART_API, get(pie_chart_endpoint))
        .route(endpoints::COMBINED_API, get(combined_endpoint));

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
