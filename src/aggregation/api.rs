//! JSON endpoints for the month views.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, FromRequestParts, Query, State},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{AppState, Error, month::MonthFilter, transaction::Transaction};

use super::{
    service::{
        CombinedView, get_bar_chart, get_combined, get_pie_chart, get_statistics, search_page,
    },
    views::{LabelCount, Statistics},
};

/// The state needed by the month view endpoints.
#[derive(Debug, Clone)]
pub struct AggregationState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AggregationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The month selection shared by every view.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// A month name or number. Missing means no transactions are selected.
    pub month: Option<String>,
    /// The calendar year, defaults to the current year.
    pub year: Option<i32>,
}

impl MonthQuery {
    /// Resolve the query into the filter for the selected month.
    pub fn resolve(&self, local_timezone: &str) -> Result<MonthFilter, Error> {
        MonthFilter::resolve(self.month.as_deref(), self.year, local_timezone)
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// The 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    /// The number of transactions per page.
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    /// Text to match against the title, description or price.
    #[serde(default)]
    pub search: String,
    /// A month name or number.
    pub month: Option<String>,
    /// The calendar year, defaults to the current year.
    pub year: Option<i32>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

/// An [Error] rendered as a JSON body, `{"error": "..."}`, with the matching
/// status code.
#[derive(Debug)]
pub struct JsonError(pub Error);

impl From<Error> for JsonError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        if status.is_server_error() {
            tracing::error!("could not complete API request: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.client_message() }))).into_response()
    }
}

/// Query string parameters that are rejected with a [JsonError] instead of
/// a plain text body.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| JsonError(Error::InvalidQuery(rejection.body_text())))?;

        Ok(Self(query))
    }
}

/// List a page of the month's transactions that match the search term.
pub async fn list_transactions_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Transaction>>, JsonError> {
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

    Ok(Json(page.transactions))
}

/// Get the total sales and sold counts for the month.
pub async fn statistics_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Statistics>, JsonError> {
    let month_filter = query.resolve(&state.local_timezone)?;
    let statistics = get_statistics(&state.db_connection, &month_filter).await?;

    Ok(Json(statistics))
}

/// Get the number of transactions in each price range for the month.
pub async fn bar_chart_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<LabelCount>>, JsonError> {
    let month_filter = query.resolve(&state.local_timezone)?;
    let buckets = get_bar_chart(&state.db_connection, &month_filter).await?;

    Ok(Json(buckets))
}

/// Get the number of transactions in each category for the month.
pub async fn pie_chart_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<LabelCount>>, JsonError> {
    let month_filter = query.resolve(&state.local_timezone)?;
    let categories = get_pie_chart(&state.db_connection, &month_filter).await?;

    Ok(Json(categories))
}

/// Get every view of the month in one response.
pub async fn combined_endpoint(
    State(state): State<AggregationState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<CombinedView>, JsonError> {
    let month_filter = query.resolve(&state.local_timezone)?;
    let combined = get_combined(&state.db_connection, &month_filter).await?;

    Ok(Json(combined))
}
