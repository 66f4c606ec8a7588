//! Configuration types for the relay resolver and the extension context.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

/// Relay queried when nothing else is configured.
pub const DEFAULT_RELAY_URL: &str = "wss://nostr-pub.wellorder.net";

/// Configuration for the nostr relay used to resolve `npub` identities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// WebSocket URL of the relay (e.g., "wss://relay.damus.io").
    #[serde(default = "default_relay_url")]
    pub url: String,

    /// Upper bound for connect + request + response, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of metadata events requested.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Subscription id sent with the `REQ`.
    #[serde(default = "default_subscription_id")]
    pub subscription_id: String,
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_limit() -> u32 {
    10
}

fn default_subscription_id() -> String {
    "splitpay".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            timeout_secs: default_timeout(),
            limit: default_limit(),
            subscription_id: default_subscription_id(),
        }
    }
}

impl RelayConfig {
    /// Create a configuration for a specific relay.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the exchange timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the event limit of the metadata query.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the subscription id.
    pub fn with_subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = id.into();
        self
    }

    /// The exchange timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration of the split extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Relay used for public-key resolution.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Time background tasks get to finish after a stop signal, in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

fn default_shutdown_grace() -> u64 {
    3
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

impl SplitConfig {
    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, StorageError> {
        toml::from_str(text).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Load a TOML file; a missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Replace the relay configuration.
    pub fn with_relay(mut self, relay: RelayConfig) -> Self {
        self.relay = relay;
        self
    }

    /// The shutdown grace period as a `Duration`.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.url, DEFAULT_RELAY_URL);
        assert_eq!(config.limit, 10);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_relay_builder() {
        let config = RelayConfig::new("wss://relay.damus.io")
            .with_timeout(2)
            .with_limit(3)
            .with_subscription_id("sub");
        assert_eq!(config.url, "wss://relay.damus.io");
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.limit, 3);
        assert_eq!(config.subscription_id, "sub");
    }

    #[test]
    fn test_partial_toml() {
        let config = SplitConfig::from_toml_str(
            r#"
            [relay]
            url = "wss://relay.example"
            "#,
        )
        .unwrap();
        assert_eq!(config.relay.url, "wss://relay.example");
        assert_eq!(config.relay.timeout_secs, 5);
        assert_eq!(config.shutdown_grace_secs, 3);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SplitConfig::from_toml_str("").unwrap();
        assert_eq!(config.relay, RelayConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SplitConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.shutdown_grace_secs, 3);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(SplitConfig::from_toml_str("relay = 5").is_err());
    }
}
