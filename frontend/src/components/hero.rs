//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"🏢 AHU CO₂ Monitoring Dashboard"</h1>
            <p class="subtitle">
                "Upload a spreadsheet of CO₂ sensor readings (one column per "
                "air-handling unit) to flag threshold exceedances and explore "
                "trends, distributions and hourly patterns."
            </p>
        </div>
    }
}
