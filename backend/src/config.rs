//! Runtime configuration.
//!
//! All knobs are environment variables (loaded from `.env` via dotenvy at
//! startup) so the exceedance threshold is injected configuration rather
//! than a literal buried in pipeline logic. CLI flags override the
//! environment where a subcommand exposes them.

use crate::pipeline::DEFAULT_THRESHOLD_PPM;

/// Environment variable holding the exceedance threshold in ppm.
pub const ENV_THRESHOLD: &str = "CO2_THRESHOLD_PPM";

/// Environment variable holding the remote spreadsheet URL.
pub const ENV_REMOTE_URL: &str = "CO2_REMOTE_URL";

/// Environment variable holding the HTTP server port.
pub const ENV_PORT: &str = "CO2_PORT";

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Exceedance threshold in ppm. Readings strictly above this value
    /// count as exceedances.
    pub threshold_ppm: f64,

    /// Fixed URL for the remote-fetch variant, if configured.
    pub remote_url: Option<String>,

    /// HTTP server port.
    pub port: u16,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Unset variables fall back to defaults; a malformed threshold or
    /// port also falls back rather than aborting startup.
    pub fn from_env() -> Self {
        let threshold_ppm = std::env::var(ENV_THRESHOLD)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_THRESHOLD_PPM);

        let remote_url = std::env::var(ENV_REMOTE_URL)
            .ok()
            .filter(|v| !v.trim().is_empty());

        let port = std::env::var(ENV_PORT)
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            threshold_ppm,
            remote_url,
            port,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threshold_ppm: DEFAULT_THRESHOLD_PPM,
            remote_url: None,
            port: DEFAULT_PORT,
        }
    }
}
