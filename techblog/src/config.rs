use serde::Deserialize;
use std::{collections::HashMap, time::Duration};

pub const DEFAULT_BASE_ADDRESS: &str = "http://localhost:18010";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings fixed for the lifetime of an [`ApiClient`](crate::http::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every relative request path.
    pub base_address: String,
    /// Merged into every request; per-request headers win.
    pub default_headers: HashMap<String, String>,
    /// `0` disables the timeout.
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_ADDRESS)
    }
}

impl ClientConfig {
    pub fn new(base_address: impl Into<String>) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            reqwest::header::CONTENT_TYPE.as_str().to_string(),
            "application/json".to_string(),
        );
        Self {
            base_address: base_address.into(),
            default_headers,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_address, "http://localhost:18010");
        assert_eq!(config.timeout(), Some(Duration::from_millis(10_000)));
        assert_eq!(
            config.default_headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_address": "https://api.example.com", "timeout_ms": 500}"#)
                .unwrap();
        assert_eq!(config.base_address, "https://api.example.com");
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
        assert!(config.default_headers.contains_key("content-type"));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_ms": 0}"#).unwrap();
        assert_eq!(config.timeout(), None);
        assert_eq!(ClientConfig::default().with_timeout(Duration::ZERO).timeout(), None);
    }

    #[test]
    fn test_with_timeout_saturates() {
        let config = ClientConfig::default().with_timeout(Duration::MAX);
        assert_eq!(config.timeout_ms, u64::MAX);
    }
}
