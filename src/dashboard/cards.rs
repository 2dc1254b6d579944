//! The statistics banner shown above the dashboard charts.

use maud::{Markup, html};

use crate::{aggregation::Statistics, html::format_currency};

/// Renders the month's totals as a row of cards.
///
/// # Arguments
/// * `month_label` - The selected month, e.g. "March 2024"
/// * `statistics` - The totals over the selected month
pub(super) fn statistics_view(month_label: &str, statistics: &Statistics) -> Markup {
    let cards = [
        ("Total Sales Amount", format_currency(statistics.total)),
        ("Total Sold Items", statistics.sold_items.to_string()),
        ("Total Not Sold Items", statistics.not_sold_items.to_string()),
    ];

    html! {
        section id="statistics" class="w-full mx-auto mb-4"
        {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month_label) }

            dl class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                @for (label, value) in &cards {
                    div
                        class="rounded border border-gray-200 bg-white p-4 shadow-sm
                            dark:border-gray-700 dark:bg-gray-800"
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { (label) }
                        dd class="mt-1 text-2xl font-semibold tabular-nums" { (value) }
                    }
                }
            }
        }
    }
}
