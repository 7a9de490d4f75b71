//! co2watch - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading CO₂ sensor spreadsheets and
//! exploring the resulting exceedance dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (threshold badge)                                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection or LogsPanel                             │
//! │  ├── SummarySection (tables, when loaded)                   │
//! │  └── ChartsSection (four SVGs, when loaded)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (DashboardResponse, LogEntry, etc.)
//! - [`components`] - UI components (Header, Upload, Summary, Charts)
//! - [`services`] - Backend communication (upload, remote fetch)

use leptos::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // API
    ChartSet, DashboardResponse, ExceedanceCount, ExceedanceRow, HourlyHeatmap, SheetMetadata,
    SummaryRow,
    // Logs
    LogEntry, LogLevel,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 co2watch - Starting Leptos App");

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Global state for the application
    let (dashboard, set_dashboard) = create_signal(None::<DashboardResponse>);
    let (_is_processing, set_is_processing) = create_signal(false);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // Threshold shown in the header once a dashboard is loaded.
    let (threshold_ppm, set_threshold_ppm) = create_signal(None::<f64>);
    create_effect(move |_| {
        if let Some(data) = dashboard.get() {
            set_threshold_ppm.set(Some(data.threshold_ppm));
        }
    });

    // Initialize SSE connection ONCE at app startup
    init_sse_logs(set_logs);

    view! {
        <Header threshold_ppm=threshold_ppm/>

        <div class="container">
            <Hero/>

            // Upload box stays visible so a new file can replace the
            // current dashboard at any time.
            <UploadSection
                set_dashboard=set_dashboard
                set_is_processing=set_is_processing
                set_logs=set_logs
            />

            // Show LogsPanel when logs exist
            <Show
                when=move || !logs.get().is_empty()
                fallback=|| view! { }
            >
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>

            // Tables and charts (appear after processing)
            <SummarySection dashboard=dashboard/>
            <ChartsSection dashboard=dashboard/>
        </div>

        <Footer/>
    }
}
