//! Top navigation bar with the active threshold badge.

use leptos::*;

#[component]
pub fn Header(threshold_ppm: ReadSignal<Option<f64>>) -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"CO2WATCH"</a>
                <span class="tagline">"AHU CO₂ Monitoring"</span>
            </div>
            <div class="header-right">
                <span class="threshold-badge">
                    {move || match threshold_ppm.get() {
                        Some(t) => format!("Threshold: {} ppm", t),
                        None => "Threshold: 1000 ppm (default)".to_string(),
                    }}
                </span>
            </div>
        </header>
    }
}
