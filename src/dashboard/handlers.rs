//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and its transaction table partial
//! - HTML view functions for rendering the dashboard UI
//! - The state used by the handlers

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Month, UtcOffset};

use crate::{
    AppState, Error,
    aggregation::{CombinedView, ListQuery, MonthQuery, get_combined, search_page},
    dashboard::{
        cards::statistics_view,
        charts::{DashboardChart, category_chart, charts_script, charts_view, price_range_chart},
        table::{TableFilters, table_section_view, transactions_table_view},
    },
    db::with_connection,
    endpoints,
    html::{
        ECHARTS_SCRIPT, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE,
        base, link,
    },
    month::{MONTH_NAMES, MonthFilter, parse_month},
    pagination::{PaginationConfig, create_pagination_indicators, page_count},
    timezone::get_local_offset,
    transaction::count_transactions,
};

/// The month shown when the client does not select one.
const DEFAULT_MONTH: &str = "March";

/// The state needed for displaying the dashboard page.
///
/// Contains the database connection, timezone and pagination settings
/// required by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The page size and the number of page links in the table.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Display the dashboard for the selected month.
///
/// htmx requests, e.g. from the month selector, receive only the dashboard
/// content so that it can be swapped into the existing page.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset(&state.local_timezone)?;

    let transaction_count = with_connection(&state.db_connection, count_transactions)
        .await
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;

    if transaction_count == 0 {
        return Ok(page_or_partial(is_htmx_request, &[], dashboard_no_data_view()));
    }

    let month = query.month.as_deref().unwrap_or(DEFAULT_MONTH);
    let month_filter = MonthFilter::resolve(Some(month), query.year, &state.local_timezone)?;
    let per_page = state.pagination_config.default_page_size;

    let (combined, first_page) = tokio::try_join!(
        get_combined(&state.db_connection, &month_filter),
        search_page(&state.db_connection, &month_filter, "", 1, per_page),
    )?;

    let pagination = create_pagination_indicators(
        1,
        page_count(first_page.total_matches, per_page),
        state.pagination_config.max_pages,
    );
    let table = transactions_table_view(&first_page.transactions, &pagination, local_offset);
    let filters = TableFilters {
        month,
        year: query.year,
        search: "",
        per_page,
    };

    let content = dashboard_content_view(
        &month_label(month, &month_filter),
        parse_month(month),
        query.year,
        &combined,
        table_section_view(&filters, table),
    );

    let head_elements = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    Ok(page_or_partial(is_htmx_request, &head_elements, content))
}

/// Render the table rows for a search or page of the selected month.
pub async fn get_transactions_table(
    State(state): State<DashboardState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let local_offset = local_offset(&state.local_timezone)?;
    let month_filter =
        MonthFilter::resolve(query.month.as_deref(), query.year, &state.local_timezone)?;

    let page = search_page(
        &state.db_connection,
        &month_filter,
        &query.search,
        query.page,
        query.per_page,
    )
    .await?;

    let page_count = page_count(page.total_matches, query.per_page);
    let curr_page = query.page.clamp(1, page_count.max(1) as i64) as u64;
    let pagination =
        create_pagination_indicators(curr_page, page_count, state.pagination_config.max_pages);

    Ok(transactions_table_view(&page.transactions, &pagination, local_offset).into_response())
}

fn local_offset(local_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone);
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })
}

/// The heading for the selected month, e.g. "March 2024".
fn month_label(month: &str, month_filter: &MonthFilter) -> String {
    match month_filter {
        MonthFilter::Interval(interval) => {
            format!("{} {}", interval.start.month(), interval.start.year())
        }
        MonthFilter::NoMatch => format!("Unknown month \"{month}\""),
    }
}

fn page_or_partial(
    is_htmx_request: bool,
    head_elements: &[HeadElement],
    content: Markup,
) -> Response {
    if is_htmx_request {
        content.into_response()
    } else {
        base("Dashboard", head_elements, &content).into_response()
    }
}

/// Creates the charts for the selected month.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(month_label: &str, combined: &CombinedView) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(month_label, &combined.bar_chart).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(month_label, &combined.pie_chart).to_string(),
        },
    ]
}

/// Renders the dashboard content when the store is empty.
///
/// Displays a message with a link to load the seed dataset.
fn dashboard_no_data_view() -> Markup {
    let init_link = link(endpoints::INIT_API, "loading the sales dataset");
    let init_script = format!(
        "fetch('{}').then(() => window.location.reload())",
        endpoints::INIT_API
    );

    html!(
        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "The dashboard will show up here once there are some transactions.
                Start by " (init_link) "."
            }

            button
                type="button"
                onclick=(init_script)
                class="mt-4 px-5 py-2.5 rounded text-sm font-medium text-white
                    bg-blue-600 hover:bg-blue-700"
            {
                "Load Sales Data"
            }
        }
    )
}

/// Renders the month selector, statistics, charts and transaction table.
///
/// The content replaces itself when a different month is selected.
fn dashboard_content_view(
    month_label: &str,
    selected_month: Option<Month>,
    year: Option<i32>,
    combined: &CombinedView,
    table_section: Markup,
) -> Markup {
    let charts = build_dashboard_charts(month_label, combined);

    html!(
        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (month_selector_view(selected_month, year))
            (statistics_view(month_label, &combined.statistics))
            (charts_view(&charts))
            (table_section)
            (charts_script(&charts))
        }
    )
}

fn month_selector_view(selected_month: Option<Month>, year: Option<i32>) -> Markup {
    html!(
        form class="w-full mb-8"
        {
            label for="month" class=(FORM_LABEL_STYLE) { "Month" }

            @if let Some(year) = year {
                input type="hidden" name="year" value=(year);
            }

            select
                id="month"
                name="month"
                class=(FORM_TEXT_INPUT_STYLE)
                hx-get=(endpoints::DASHBOARD_VIEW)
                hx-trigger="change"
                hx-target="#dashboard-content"
                hx-swap="outerHTML"
                hx-include="closest form"
                hx-sync="this:replace"
                hx-push-url="true"
            {
                @for name in MONTH_NAMES {
                    option value=(name) selected[parse_month(name) == selected_month] { (name) }
                }
            }
        }
    )
}
