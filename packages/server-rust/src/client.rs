//! Outbound HTTP client handed to sub-protocol handlers.
//!
//! The server never calls other paymail domains itself. Handlers that need
//! to (for example to resolve a sender's public key) receive this client
//! through their [`RequestContext`](crate::context::RequestContext).

use std::time::Duration;

use bsvalias_core::ConfigurationError;

/// Settings for the outbound client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Total timeout applied to each outbound request.
    pub timeout: Duration,
    /// `User-Agent` header sent to remote paymail servers.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("bsvalias-server/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Cheaply cloneable handle to a shared connection pool.
#[derive(Debug, Clone, Default)]
pub struct OutboundClient {
    inner: reqwest::Client,
}

impl OutboundClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::OutboundClient`] if the TLS backend or
    /// resolver cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigurationError> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ConfigurationError::OutboundClient(e.to_string()))?;
        Ok(Self { inner })
    }

    /// The underlying `reqwest` client.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("bsvalias-server/"));
    }

    #[test]
    fn builds_from_config() {
        let config = ClientConfig {
            timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        };
        assert!(OutboundClient::new(&config).is_ok());
    }
}
