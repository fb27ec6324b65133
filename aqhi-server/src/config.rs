//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::aqhi::{AqhiConfig, DEFAULT_ENDPOINT};

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);
const DEFAULT_STATIC_DIR: &str = "static";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on (`AQHI_BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// OData feed URL (`AQHI_ENDPOINT`)
    pub endpoint: String,
    /// Fetch timeout in seconds (`AQHI_TIMEOUT_SECS`); unset waits forever
    pub timeout_secs: Option<u64>,
    /// Public base URL used for the QR payload (`AQHI_PUBLIC_URL`)
    pub public_url: Option<String>,
    /// Directory served under `/static` (`AQHI_STATIC_DIR`)
    pub static_dir: String,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("AQHI_BIND_ADDR") {
            Some(value) => value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    name: "AQHI_BIND_ADDR",
                    value,
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_BIND_ADDR,
        };

        let timeout_secs = match get("AQHI_TIMEOUT_SECS") {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|e| {
                ConfigError::Invalid {
                    name: "AQHI_TIMEOUT_SECS",
                    value,
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let public_url = match get("AQHI_PUBLIC_URL") {
            Some(value) if value.starts_with("http://") || value.starts_with("https://") => {
                Some(value.trim_end_matches('/').to_string())
            }
            Some(value) => {
                return Err(ConfigError::Invalid {
                    name: "AQHI_PUBLIC_URL",
                    value,
                    reason: "must start with http:// or https://".to_string(),
                });
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            endpoint: get("AQHI_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout_secs,
            public_url,
            static_dir: get("AQHI_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        })
    }

    /// Client settings derived from this config.
    pub fn aqhi_config(&self) -> AqhiConfig {
        let config = AqhiConfig::new().with_endpoint(&self.endpoint);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(secs),
            None => config,
        }
    }
}
