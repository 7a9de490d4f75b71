//! UI Components for the co2watch dashboard.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with the threshold badge
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Spreadsheet upload and remote-fetch trigger
//! - [`LogsPanel`] - Real-time pipeline logs (SSE)
//! - [`SummarySection`] - Management summary and exceedance tables
//! - [`ChartsSection`] - The four rendered charts

mod charts;
mod footer;
mod header;
mod hero;
mod logs;
mod summary;
mod upload;

pub use charts::*;
pub use footer::*;
pub use header::*;
pub use hero::*;
pub use logs::*;
pub use summary::*;
pub use upload::*;
