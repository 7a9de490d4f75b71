//! Application configuration.
//!
//! Centralized configuration for the co2watch frontend. In development
//! these are hardcoded; in production they could be loaded from the
//! environment or a config file.

/// Backend API base URL.
///
/// The co2watch backend server for spreadsheet analysis.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Maximum file size for upload (in bytes).
///
/// 50 MB limit.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;
