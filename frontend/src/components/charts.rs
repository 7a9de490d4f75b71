//! Chart display: the four SVG documents rendered by the backend.

use leptos::*;

use crate::types::DashboardResponse;

#[component]
pub fn ChartsSection(dashboard: ReadSignal<Option<DashboardResponse>>) -> impl IntoView {
    view! {
        <Show
            when=move || dashboard.get().is_some()
            fallback=|| view! { }
        >
            {move || {
                let charts = dashboard.get().unwrap().charts;
                view! {
                    <div class="charts-section">
                        <div class="chart-card">
                            <h2>"📈 CO₂ Trend"</h2>
                            <div class="chart-svg" inner_html=charts.line_svg.clone()></div>
                        </div>
                        <div class="chart-card">
                            <h2>"📊 Exceedance Count by AHU"</h2>
                            <div class="chart-svg" inner_html=charts.bar_svg.clone()></div>
                        </div>
                        <div class="chart-card">
                            <h2>"📦 CO₂ Distribution"</h2>
                            <div class="chart-svg" inner_html=charts.box_svg.clone()></div>
                        </div>
                        <div class="chart-card">
                            <h2>"🕒 Hourly CO₂ Heatmap"</h2>
                            <div class="chart-svg" inner_html=charts.heatmap_svg.clone()></div>
                        </div>
                    </div>
                }
            }}
        </Show>
    }
}
