//! Summary tables: management summary and exceedance details.

use leptos::*;

use crate::types::DashboardResponse;

#[component]
pub fn SummarySection(dashboard: ReadSignal<Option<DashboardResponse>>) -> impl IntoView {
    view! {
        <Show
            when=move || dashboard.get().is_some()
            fallback=|| view! { }
        >
            {move || {
                let data = dashboard.get().unwrap();
                let threshold = data.threshold_ppm;
                let summary = data.summary;
                let exceedances = data.exceedances;
                let has_rows = !summary.is_empty();
                let has_exceed = !exceedances.is_empty();

                view! {
                    <div class="summary-section">
                        <h2>"📊 Management Summary"</h2>
                        <Show
                            when=move || has_rows
                            fallback=move || view! {
                                <p class="all-clear">
                                    {format!("✅ No readings above {} ppm", threshold)}
                                </p>
                            }
                        >
                            <table class="summary-table">
                                <thead>
                                    <tr>
                                        <th>"AHU"</th>
                                        <th>"Max CO₂ (ppm)"</th>
                                        <th>"Avg CO₂ (ppm)"</th>
                                        <th>"Exceedances"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {summary.iter().map(|row| view! {
                                        <tr>
                                            <td>{row.ahu.clone()}</td>
                                            <td>{format!("{:.0}", row.max_co2)}</td>
                                            <td>{format!("{:.1}", row.avg_co2)}</td>
                                            <td>{row.exceed_count}</td>
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </Show>

                        <Show
                            when=move || has_exceed
                            fallback=|| view! { }
                        >
                            <h2>"🚨 CO₂ Exceedance Details"</h2>
                            <table class="exceedance-table">
                                <thead>
                                    <tr>
                                        <th>"Timestamp"</th>
                                        <th>"Hour"</th>
                                        <th>"AHU"</th>
                                        <th>"CO₂ (ppm)"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {exceedances.iter().map(|row| view! {
                                        <tr>
                                            <td>{row.timestamp.clone()}</td>
                                            <td>{row.hour}</td>
                                            <td>{row.ahu.clone()}</td>
                                            <td>{format!("{:.0}", row.co2_ppm)}</td>
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </Show>
                    </div>
                }
            }}
        </Show>
    }
}
