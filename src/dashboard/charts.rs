//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for a month of sales:
//! - **Price Range Chart**: Bar chart of the number of items per price range
//! - **Category Chart**: Pie chart of the number of items per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::aggregation::LabelCount;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100 shadow"
                    {}
                }
            }
        }
    )
}

/// Generates the script that draws `charts` into their containers.
///
/// The script runs as soon as it is parsed, so it must be placed after the
/// chart containers. Any chart already drawn in a container is disposed
/// first, which lets htmx swap in new content without leaking instances.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom || typeof echarts === 'undefined') {{
                        return;
                    }}
                    echarts.getInstanceByDom(chartDom)?.dispose();
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!(
        script { (PreEscaped(script_content)) }
    )
}

/// The number of items in each price range for `month_label`.
pub(super) fn price_range_chart(month_label: &str, buckets: &[LabelCount]) -> Chart {
    let labels: Vec<String> = buckets.iter().map(|bucket| bucket.label.clone()).collect();
    let counts: Vec<f64> = buckets.iter().map(|bucket| bucket.count as f64).collect();

    Chart::new()
        .title(Title::new().text("Bar Chart Stats").subtext(month_label))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Number of Items").data(counts))
}

/// The number of items in each category for `month_label`.
pub(super) fn category_chart(month_label: &str, categories: &[LabelCount]) -> Chart {
    let data: Vec<(i64, &str)> = categories
        .iter()
        .map(|category| (category.count as i64, category.label.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Pie Chart Stats").subtext(month_label))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Number of Items")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}
