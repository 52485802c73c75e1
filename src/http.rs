//! HTTP client wrapper shared by every network stage.
//!
//! One [`HttpClient`] is created per run and reused across page fetches,
//! detail fetches, and asset downloads to take advantage of connection
//! pooling. Asset bodies are streamed to a `.part` file and renamed into
//! place once complete, so an interrupted download never leaves a
//! half-written file under the final name.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::USER_AGENT;
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use crate::filename;

/// Browser-identifying User-Agent sent on every request.
///
/// The catalog serves reduced markup to unidentified clients, so all traffic
/// carries a standard browser UA.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout in seconds (asset bodies can be large).
const READ_TIMEOUT_SECS: u64 = 300;

/// Errors from page fetches and asset downloads.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while persisting an asset.
    #[error("IO error writing {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL is malformed or yields no usable filename.
    #[error("invalid asset URL: {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },
}

impl FetchError {
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Returns the HTTP status code for status errors, `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server signalled rate-limiting (HTTP 429).
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

/// HTTP client for catalog pages and asset downloads.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the client builder fails with the static configuration,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the client builder fails with the supplied configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a page body as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpStatus`] for non-2xx responses (including
    /// 429, which callers inspect via [`FetchError::is_rate_limited`]), and
    /// [`FetchError::Network`]/[`FetchError::Timeout`] for transport
    /// failures.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    /// Downloads an asset body into `dest_dir`, named after the final path
    /// segment of `url`. An existing file of the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when no filename can be derived,
    /// plus the same transport/status/IO errors as [`fetch_html`](Self::fetch_html).
    #[instrument(level = "debug", skip(self), fields(dest_dir = %dest_dir.display()))]
    pub async fn download_to_file(
        &self,
        url: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, FetchError> {
        let name = filename::from_url(url).ok_or_else(|| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        let final_path = dest_dir.join(&name);
        let part_path = dest_dir.join(format!("{name}.part"));

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes_written = match stream_to_file(response, url, &part_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                // Best-effort cleanup so failed assets do not litter the
                // destination directory with .part files
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &final_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(FetchError::Io {
                path: final_path.clone(),
                source: e,
            });
        }

        debug!(
            url = %url,
            path = %final_path.display(),
            bytes = bytes_written,
            "asset written"
        );
        Ok(final_path)
    }
}

/// Streams a response body into `part_path`, returning the byte count.
///
/// Callers own cleanup of `part_path` on error.
async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    part_path: &Path,
) -> Result<u64, FetchError> {
    let file = File::create(part_path).await.map_err(|e| FetchError::Io {
        path: part_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::from_reqwest(url, e))?;
        writer.write_all(&chunk).await.map_err(|e| FetchError::Io {
            path: part_path.to_path_buf(),
            source: e,
        })?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| FetchError::Io {
        path: part_path.to_path_buf(),
        source: e,
    })?;

    Ok(bytes_written)
}
