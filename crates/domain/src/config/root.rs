use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "doh-gateway.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/doh-gateway/config.toml";

/// Main configuration structure for doh-gateway
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Listener bind addresses
    pub server: ServerConfig,

    /// Answer cache
    pub cache: CacheConfig,

    /// Upstream resolver
    pub upstream: UpstreamConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. doh-gateway.toml in current directory
    /// 3. /etc/doh-gateway/config.toml
    /// 4. Default configuration
    ///
    /// Command-line overrides are applied on top of whichever source won.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(bind) = overrides.http_bind {
            self.server.http_bind = bind;
        }
        if let Some(bind) = overrides.udp_bind {
            self.server.udp_bind = bind;
        }
        if let Some(bind) = overrides.tcp_bind {
            self.server.tcp_bind = bind;
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.cache.enabled = enabled;
        }
        if let Some(ttl) = overrides.cache_ttl {
            self.cache.ttl = ttl;
        }
        if let Some(server) = overrides.upstream_server {
            self.upstream.server = server;
        }
        if let Some(net) = overrides.upstream_net {
            self.upstream.net = net;
        }
        if let Some(timeout) = overrides.upstream_timeout {
            self.upstream.timeout = timeout;
        }
    }

    /// Validate configuration
    ///
    /// An unknown upstream network is only warned about here; it surfaces as
    /// an unsupported-transport error on the first query that needs it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_bind("server.http_bind", &self.server.http_bind)?;
        if self.server.udp_enabled() {
            parse_bind("server.udp_bind", &self.server.udp_bind)?;
        }
        if self.server.tcp_enabled() {
            parse_bind("server.tcp_bind", &self.server.tcp_bind)?;
        }

        if self.upstream.server.trim().is_empty() {
            return Err(ConfigError::Validation(
                "No upstream server configured".to_string(),
            ));
        }
        if self.upstream.timeout == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout must be at least 1 second".to_string(),
            ));
        }
        if self.cache.enabled && self.cache.ttl == 0 {
            return Err(ConfigError::Validation(
                "Cache TTL must be at least 1 second when the cache is enabled".to_string(),
            ));
        }

        if let Err(e) = self.upstream.net() {
            tracing::warn!(net = %self.upstream.net, error = %e, "Upstream network is not supported");
        }

        Ok(())
    }
}

fn parse_bind(field: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|e| {
        ConfigError::Validation(format!("{} '{}' is not a socket address: {}", field, value, e))
    })
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub http_bind: Option<String>,
    pub udp_bind: Option<String>,
    pub tcp_bind: Option<String>,
    pub cache_enabled: Option<bool>,
    pub cache_ttl: Option<u64>,
    pub upstream_server: Option<String>,
    pub upstream_net: Option<String>,
    pub upstream_timeout: Option<u64>,
}
