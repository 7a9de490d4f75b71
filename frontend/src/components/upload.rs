//! Spreadsheet upload component.
//!
//! Handles file selection, upload to the backend, and loading the
//! resulting dashboard. Also exposes the remote-fetch variant as a
//! secondary action.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use crate::services::{fetch_remote, upload_sheet};
use crate::types::{DashboardResponse, LogEntry, LogLevel};
use crate::BACKEND_URL;

#[component]
pub fn UploadSection(
    set_dashboard: WriteSignal<Option<DashboardResponse>>,
    set_is_processing: WriteSignal<bool>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_uploading, set_is_uploading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let apply_result = move |result: Result<DashboardResponse, crate::types::AppError>| {
        match result {
            Ok(response) => {
                if response.summary.is_empty() {
                    add_log(
                        set_logs,
                        LogLevel::Success,
                        &format!(
                            "✅ All {} readings within {} ppm",
                            response.long_row_count, response.threshold_ppm
                        ),
                    );
                } else {
                    add_log(
                        set_logs,
                        LogLevel::Warning,
                        &format!(
                            "🚨 {} exceedances across {} AHUs",
                            response.exceedances.len(),
                            response.summary.len()
                        ),
                    );
                }
                set_dashboard.set(Some(response));
            }
            Err(e) => {
                add_log(set_logs, LogLevel::Error, &format!("❌ {}", e));
                set_error.set(Some(e.to_string()));
            }
        }
        set_is_uploading.set(false);
        set_is_processing.set(false);
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);

        if let Some(files) = input.files() {
            if let Some(file) = files.get(0) {
                set_error.set(None);
                set_dashboard.set(None);
                set_logs.set(Vec::new());

                spawn_local(async move {
                    set_is_uploading.set(true);
                    set_is_processing.set(true);

                    add_log(set_logs, LogLevel::Info, "📤 Uploading spreadsheet...");
                    apply_result(upload_sheet(file, BACKEND_URL).await);
                });
            }
        }
    };

    let on_remote_click = move |_| {
        set_error.set(None);
        set_dashboard.set(None);
        set_logs.set(Vec::new());

        spawn_local(async move {
            set_is_uploading.set(true);
            set_is_processing.set(true);

            add_log(set_logs, LogLevel::Info, "🌐 Fetching remote spreadsheet...");
            apply_result(fetch_remote(BACKEND_URL).await);
        });
    };

    let trigger_file_input = move |_| {
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if let Some(input) = document.get_element_by_id("fileInput") {
                    if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                        html_input.click();
                    }
                }
            }
        }
    };

    view! {
        <div class="upload-section" id="uploadZone" on:click=trigger_file_input>
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_uploading.get() {
                    "⏳ Uploading and analyzing..."
                } else {
                    "Upload a CO₂ readings spreadsheet"
                }}
            </div>

            <Show
                when=move || !is_uploading.get()
                fallback=|| view! { }
            >
                <div class="upload-hint">
                    ".xlsx or delimited text, header row: Timestamp + one column per AHU"
                </div>
            </Show>

            <Show
                when=move || error.get().is_some()
                fallback=|| view! { }
            >
                <div class="error-message">
                    {move || error.get().unwrap_or_default()}
                </div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=".xlsx,.csv,.tsv,.txt"
                style="display:none"
                on:change=on_file_change
            />

            <Show
                when=move || !is_uploading.get()
                fallback=|| view! { }
            >
                <div class="upload-actions">
                    <label for="fileInput" class="upload-button">
                        "Choose a file"
                    </label>
                    <button
                        class="upload-button secondary"
                        on:click=move |ev| { ev.stop_propagation(); on_remote_click(ev); }
                    >
                        "Load from configured URL"
                    </button>
                </div>
            </Show>
        </div>
    }
}

fn add_log(set_logs: WriteSignal<Vec<LogEntry>>, level: LogLevel, message: &str) {
    let timestamp = js_sys::Date::new_0()
        .to_locale_time_string("en-GB")
        .as_string()
        .unwrap_or_else(|| "00:00:00".to_string());

    set_logs.update(|logs| {
        logs.push(LogEntry {
            level,
            message: message.to_string(),
            timestamp,
        });
    });

    log::info!("{}", message);
}
