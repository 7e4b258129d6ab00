//! Configuration types for the inventory SDK.

use std::time::Duration;
use url::Url;

/// API version appended to bare server URLs
pub const DEFAULT_API_VERSION: &str = "v6.8";

/// Snapshot used when none is given: the newest loaded one
pub const DEFAULT_SNAPSHOT: &str = "$last";

/// Rows requested per table page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Configuration for the inventory client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL as given by the user.
    pub server_url: Url,
    /// Versioned API root every request path is joined onto.
    pub api_url: Url,
    /// API token sent in the `X-API-Token` header.
    pub api_token: String,
    /// Snapshot queried when a request does not name one.
    pub snapshot_id: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
    /// Rows per page when fetching tables.
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a new configuration for the given server and token.
    pub fn new(server_url: Url, api_token: impl Into<String>) -> Result<Self, url::ParseError> {
        let api_url = api_root(&server_url, DEFAULT_API_VERSION)?;
        Ok(Self {
            server_url,
            api_url,
            api_token: api_token.into(),
            snapshot_id: DEFAULT_SNAPSHOT.to_string(),
            timeout: Duration::from_secs(15),
            retry_config: RetryConfig::no_retry(),
            accept_invalid_certs: false,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }
}

/// Versioned API root for a server URL.
///
/// URLs that already point below `/api/` are kept as they are.
pub fn api_root(server_url: &Url, api_version: &str) -> Result<Url, url::ParseError> {
    let mut base = server_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    if base.path().contains("/api/") {
        Ok(base)
    } else {
        base.join(&format!("api/{}/", api_version.trim_matches('/')))
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// HTTP status codes to retry on.
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let config = RetryConfig::default();

        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        let config = RetryConfig {
            max_backoff: Duration::from_millis(500),
            ..Default::default()
        };

        assert_eq!(config.backoff_for_attempt(10), Duration::from_millis(500));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();

        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(400));
        assert!(!config.should_retry_status(404));
    }

    #[test]
    fn test_client_config_defaults() {
        let url = Url::parse("https://ipf.example.com").unwrap();
        let config = ClientConfig::new(url.clone(), "token").unwrap();

        assert_eq!(config.server_url, url);
        assert_eq!(config.api_url.as_str(), "https://ipf.example.com/api/v6.8/");
        assert_eq!(config.snapshot_id, "$last");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.retry_config.max_retries, 0);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_api_root_keeps_explicit_api_path() {
        let url = Url::parse("https://ipf.example.com/api/v7.0").unwrap();
        assert_eq!(
            api_root(&url, DEFAULT_API_VERSION).unwrap().as_str(),
            "https://ipf.example.com/api/v7.0/"
        );
    }

    #[test]
    fn test_api_root_under_prefix() {
        let url = Url::parse("https://proxy.example.com/ipf/").unwrap();
        assert_eq!(
            api_root(&url, "v6.9").unwrap().as_str(),
            "https://proxy.example.com/ipf/api/v6.9/"
        );
    }
}
