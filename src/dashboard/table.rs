//! The searchable, paginated transaction table.
//!
//! The table is split into two parts so that htmx can refresh the rows
//! without touching the search box:
//! - [table_section_view] renders the search form and the initial table
//! - [transactions_table_view] renders the rows and the pagination indicator

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, loading_spinner,
    },
    pagination::PaginationIndicator,
    transaction::Transaction,
};

const TABLE_ID: &str = "transactions-table";
const FILTERS_ID: &str = "table-filters";

const PAGE_BUTTON_STYLE: &str = "block px-3 py-2 rounded leading-tight \
    text-gray-700 bg-white border border-gray-300 hover:bg-gray-100 \
    dark:bg-gray-800 dark:border-gray-700 dark:text-gray-300 dark:hover:bg-gray-700";

const CURRENT_PAGE_STYLE: &str = "block px-3 py-2 rounded leading-tight \
    text-white bg-blue-600 border border-blue-600";

/// The query that selected the rows in the table.
///
/// Every field is sent back to the server when the search text or the page
/// changes.
pub(super) struct TableFilters<'a> {
    /// The month as given by the client, e.g. "March".
    pub month: &'a str,
    pub year: Option<i32>,
    pub search: &'a str,
    pub per_page: i64,
}

/// Renders the search form followed by the transaction table.
pub(super) fn table_section_view(filters: &TableFilters, table: Markup) -> Markup {
    html! {
        section id="transactions" class="w-full mx-auto mb-8"
        {
            form
                id=(FILTERS_ID)
                class="mb-4"
                onsubmit="return false;"
            {
                input type="hidden" name="month" value=(filters.month);

                @if let Some(year) = filters.year {
                    input type="hidden" name="year" value=(year);
                }

                input type="hidden" name="perPage" value=(filters.per_page);

                label for="search" class=(FORM_LABEL_STYLE)
                {
                    "Search transactions"
                    span id="indicator" class="htmx-indicator ms-2" { (loading_spinner()) }
                }

                input
                    id="search"
                    type="search"
                    name="search"
                    value=(filters.search)
                    placeholder="Search by title, description or price"
                    class=(FORM_TEXT_INPUT_STYLE)
                    hx-get=(endpoints::DASHBOARD_TRANSACTIONS)
                    hx-trigger="input changed delay:300ms, search"
                    hx-target={ "#" (TABLE_ID) }
                    hx-swap="outerHTML"
                    hx-include="closest form"
                    hx-sync="this:replace"
                    hx-indicator="#indicator";
            }

            (table)
        }
    }
}

/// Renders a page of transactions and the pagination indicator.
///
/// Dates of sale are shown in `local_timezone`.
pub(super) fn transactions_table_view(
    transactions: &[Transaction],
    pagination: &[PaginationIndicator],
    local_timezone: UtcOffset,
) -> Markup {
    html! {
        div id=(TABLE_ID) class="w-full"
        {
            div class="overflow-x-auto rounded shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date of Sale" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row_view(transaction, local_timezone))
                        }

                        @if transactions.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="6" class={ (TABLE_CELL_STYLE) " text-center" }
                                {
                                    "No transactions found."
                                }
                            }
                        }
                    }
                }
            }

            (pagination_view(pagination))
        }
    }
}

fn transaction_row_view(transaction: &Transaction, local_timezone: UtcOffset) -> Markup {
    let date_of_sale = transaction.date_of_sale.to_offset(local_timezone).date();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white" }
            {
                (transaction.title)
            }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
            {
                (format_currency(transaction.price))
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if !transaction.category.is_empty() {
                    span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(date_of_sale) { (date_of_sale) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if transaction.sold { "Yes" } @else { "No" }
            }
        }
    }
}

fn pagination_view(pagination: &[PaginationIndicator]) -> Markup {
    html! {
        nav class="pagination flex justify-center mt-4" aria-label="Table pages"
        {
            ul class="pagination flex items-center gap-1 text-sm"
            {
                @for indicator in pagination {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(page) => {
                                p aria-current="page" class=(CURRENT_PAGE_STYLE) { (page) }
                            }
                            PaginationIndicator::Page(page) => {
                                (page_button(*page, &page.to_string()))
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-3 py-2" { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                (page_button(*page, "Next"))
                            }
                            PaginationIndicator::BackButton(page) => {
                                (page_button(*page, "Back"))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn page_button(page: u64, text: &str) -> Markup {
    html! {
        button
            type="button"
            class=(PAGE_BUTTON_STYLE)
            hx-get=(endpoints::DASHBOARD_TRANSACTIONS)
            hx-include={ "#" (FILTERS_ID) }
            hx-vals=(format!(r#"{{"page": {page}}}"#))
            hx-target={ "#" (TABLE_ID) }
            hx-swap="outerHTML"
        {
            (text)
        }
    }
}
