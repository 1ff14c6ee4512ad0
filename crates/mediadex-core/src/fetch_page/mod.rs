//! Listing page fetch.
//!
//! Uses the curl crate (libcurl) to GET one directory listing page and return
//! its raw body. Walkers only see the [`PageSource`] trait so tests can serve
//! pages from memory.

#[cfg(test)]
pub(crate) mod memory;

use crate::config::FetchConfig;
use std::time::Duration;

/// Error fetching a single listing page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, malformed URL, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {code} for {location}")]
    Http { location: String, code: u32 },
}

/// Source of raw listing page bytes for an absolute location.
pub trait PageSource: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking libcurl GET with per-request timeouts.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct CurlPageSource {
    connect_timeout: Duration,
    timeout: Duration,
}

impl Default for CurlPageSource {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl CurlPageSource {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
        )
    }
}

impl PageSource for CurlPageSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(location)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                location: location.to_string(),
                code,
            });
        }

        tracing::trace!(location, bytes = body.len(), "fetched listing");
        Ok(body)
    }
}
