//! Client configuration.
//!
//! ```ignore
//! use dapi::config::ClientConfig;
//!
//! let config = ClientConfig::builder("my-api-key")
//!     .timeout(Duration::from_secs(10))
//!     .build();
//! ```

use std::time::Duration;

/// Platform endpoint every request path is appended to
pub const DEFAULT_BASE_URL: &str = "https://www.bungie.net/platform/destiny";
/// Host serving manifest content archives
pub const DEFAULT_CONTENT_BASE_URL: &str = "https://www.bungie.net";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Manifest archives are tens of megabytes
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Value sent in the `X-API-Key` header
    pub api_key: String,
    pub base_url: String,
    /// Base for the content paths advertised by the manifest index
    pub content_base_url: String,
    /// Timeout for a single API call
    pub timeout: Duration,
    /// Timeout for a manifest archive download
    pub download_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with default endpoints and timeouts
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder(api_key).build()
    }

    /// Create a new configuration builder
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

/// Builder for ClientConfig
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    api_key: String,
    base_url: Option<String>,
    content_base_url: Option<String>,
    timeout: Option<Duration>,
    download_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn content_base_url(mut self, url: impl Into<String>) -> Self {
        self.content_base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            content_base_url: self
                .content_base_url
                .unwrap_or_else(|| DEFAULT_CONTENT_BASE_URL.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            download_timeout: self.download_timeout.unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.content_base_url, DEFAULT_CONTENT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.download_timeout, DEFAULT_DOWNLOAD_TIMEOUT);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::builder("key")
            .base_url("http://localhost:8080/platform")
            .timeout(Duration::from_secs(5))
            .build();
        assert_eq!(config.base_url, "http://localhost:8080/platform");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.download_timeout, DEFAULT_DOWNLOAD_TIMEOUT);
    }
}
