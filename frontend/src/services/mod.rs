//! Backend communication services.
//!
//! # Services
//!
//! - [`upload`] - Spreadsheet upload to the co2watch backend
//! - [`remote`] - Trigger the backend's remote-fetch variant

pub mod remote;
pub mod upload;

pub use remote::*;
pub use upload::*;
