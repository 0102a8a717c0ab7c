//! Client configuration

use std::path::PathBuf;

use crate::error::ClientResult;
use crate::http::NetworkHttpClient;
use crate::storage::FileStore;

/// Production reservation service
pub const DEFAULT_BASE_URL: &str = "https://restaurant-reservation-application-bq2w.onrender.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the reservation service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory backing the persistent session store
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new configuration for the given service
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            data_dir: default_data_dir(),
        }
    }

    /// Read `TABLEBOOK_API_URL`, `TABLEBOOK_TIMEOUT_SECS` and
    /// `TABLEBOOK_DATA_DIR`, falling back to defaults for unset values.
    pub fn from_env() -> Self {
        let base_url = std::env::var("TABLEBOOK_API_URL").unwrap_or_else(|_| {
            tracing::debug!("TABLEBOOK_API_URL not set, using production default");
            DEFAULT_BASE_URL.to_string()
        });

        let timeout = std::env::var("TABLEBOOK_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let data_dir = std::env::var("TABLEBOOK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            base_url,
            timeout,
            data_dir,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the session storage directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(&self.base_url, self.timeout)
    }

    /// Create the file-backed byte store from this configuration
    pub fn build_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// A zero timeout would fail every request immediately, so it is rejected
/// along with anything that is not a whole number of seconds.
fn parse_timeout(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => seconds,
        _ => {
            tracing::warn!(value = %raw, "Invalid TABLEBOOK_TIMEOUT_SECS, using default");
            DEFAULT_TIMEOUT_SECS
        }
    }
}
