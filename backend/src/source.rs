//! Data source abstraction.
//!
//! The upload and remote-fetch variants of the dashboard differ only in
//! where the spreadsheet bytes come from, so both are implementations
//! of one [`DataSource`] trait and the pipeline is written once against
//! it. A source yields raw bytes; format sniffing and parsing belong to
//! the parser.

use std::path::PathBuf;

use crate::error::{LoadError, LoadResult};

/// Raw spreadsheet payload as delivered by a source.
#[derive(Debug, Clone)]
pub struct RawSheet {
    /// Undecoded payload bytes.
    pub bytes: Vec<u8>,

    /// Claimed file name, when the source knows one.
    pub name: Option<String>,
}

/// A supplier of spreadsheet bytes.
///
/// `load` is attempted exactly once per run; there is no retry layer.
/// A failing load halts the run with no partial output.
pub trait DataSource {
    fn load(&self) -> impl std::future::Future<Output = LoadResult<RawSheet>> + Send;
}

// =============================================================================
// Upload variant
// =============================================================================

/// Bytes handed over by the HTTP upload endpoint (or any caller that
/// already holds the payload).
///
/// An empty source is the expected "waiting for the user" state and
/// loads as [`LoadError::NoInput`], which callers treat as idle rather
/// than as an error banner.
#[derive(Debug, Clone, Default)]
pub struct UploadSource {
    payload: Option<RawSheet>,
}

impl UploadSource {
    /// A source with nothing uploaded yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A source holding an uploaded payload.
    pub fn new(bytes: Vec<u8>, name: Option<String>) -> Self {
        Self {
            payload: Some(RawSheet { bytes, name }),
        }
    }
}

impl DataSource for UploadSource {
    async fn load(&self) -> LoadResult<RawSheet> {
        self.payload.clone().ok_or(LoadError::NoInput)
    }
}

// =============================================================================
// Remote-fetch variant
// =============================================================================

/// Fetches the spreadsheet from a fixed HTTPS URL, once per run.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    url: String,
    client: reqwest::Client,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing client (the server keeps one in its state).
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl DataSource for RemoteSource {
    async fn load(&self) -> LoadResult<RawSheet> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::FetchFailed(format!(
                "{} returned HTTP {}",
                self.url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::FetchFailed(e.to_string()))?
            .to_vec();

        let name = self.url.rsplit('/').next().map(String::from);

        Ok(RawSheet { bytes, name })
    }
}

// =============================================================================
// Local file variant (CLI)
// =============================================================================

/// Reads the spreadsheet from a local path; used by the CLI.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    async fn load(&self) -> LoadResult<RawSheet> {
        let bytes = tokio::fs::read(&self.path).await?;
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(RawSheet { bytes, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_empty_upload_is_no_input() {
        let source = UploadSource::empty();
        assert!(matches!(source.load().await, Err(LoadError::NoInput)));
    }

    #[tokio::test]
    async fn test_upload_passes_bytes_through() {
        let source = UploadSource::new(b"Timestamp,AHU1\n".to_vec(), Some("co2.csv".into()));
        let raw = source.load().await.unwrap();
        assert_eq!(raw.bytes, b"Timestamp,AHU1\n");
        assert_eq!(raw.name.as_deref(), Some("co2.csv"));
    }

    #[tokio::test]
    async fn test_file_source_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Timestamp,AHU1\n2024-01-01 08:00,1200\n")
            .unwrap();

        let source = FileSource::new(file.path());
        let raw = source.load().await.unwrap();
        assert!(raw.bytes.starts_with(b"Timestamp"));
        assert!(raw.name.is_some());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = FileSource::new("/nonexistent/co2.csv");
        assert!(matches!(source.load().await, Err(LoadError::IoError(_))));
    }

    #[tokio::test]
    async fn test_remote_fetch_failure_is_fetch_failed() {
        // Nothing listens on this port; the single attempt must surface
        // as FetchFailed, not panic or retry.
        let source = RemoteSource::new("http://127.0.0.1:9/co2.xlsx");
        assert!(matches!(
            source.load().await,
            Err(LoadError::FetchFailed(_))
        ));
    }
}
