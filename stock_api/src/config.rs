//! Server configuration

use std::{net::SocketAddr, time::Duration};

use market_data_adapter::{
    providers::yahoo_rest::{
        YahooConfig,
        provider::{DEFAULT_BASE_URL, DEFAULT_COOKIE_URL},
    },
    service::DEFAULT_PROVIDER_TIMEOUT,
};
use shared_utils::env::{InvalidEnvVarError, parse_env_var};
use thiserror::Error;

pub const ADDR_VAR: &str = "STOCK_API_ADDR";
pub const TIMEOUT_VAR: &str = "STOCK_API_PROVIDER_TIMEOUT_SECS";
pub const YAHOO_BASE_URL_VAR: &str = "STOCK_API_YAHOO_BASE_URL";
pub const YAHOO_COOKIE_URL_VAR: &str = "STOCK_API_YAHOO_COOKIE_URL";
pub const EXPOSE_DETAIL_VAR: &str = "STOCK_API_EXPOSE_ERROR_DETAIL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidEnvVar(#[from] InvalidEnvVarError),

    #[error("Provider timeout must be greater than zero")]
    ZeroTimeout,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub addr: SocketAddr,

    /// Upper bound on any single provider call
    pub provider_timeout: Duration,

    /// Root of the Yahoo query API
    pub yahoo_base_url: String,

    /// Page that issues the Yahoo session cookie
    pub yahoo_cookie_url: String,

    /// Put raw provider error text in 500 responses instead of the stable message
    pub expose_error_detail: bool,
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_secs: Option<u64> = parse_env_var(TIMEOUT_VAR)?;
        let config = Self {
            addr: parse_env_var(ADDR_VAR)?.unwrap_or(defaults.addr),
            provider_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider_timeout),
            yahoo_base_url: parse_env_var(YAHOO_BASE_URL_VAR)?.unwrap_or(defaults.yahoo_base_url),
            yahoo_cookie_url: parse_env_var(YAHOO_COOKIE_URL_VAR)?
                .unwrap_or(defaults.yahoo_cookie_url),
            expose_error_detail: parse_env_var(EXPOSE_DETAIL_VAR)?
                .unwrap_or(defaults.expose_error_detail),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Provider settings derived from this configuration.
    pub fn yahoo(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.yahoo_base_url.clone(),
            cookie_url: self.yahoo_cookie_url.clone(),
            timeout: self.provider_timeout,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            yahoo_cookie_url: DEFAULT_COOKIE_URL.to_string(),
            expose_error_detail: false,
        }
    }
}
