use crate::upstream_net::UpstreamNet;
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// `host:port` for udp/tcp/tcp-tls, a full URL for doh.
    pub server: String,

    /// One of `udp`, `tcp`, `tcp-tls`, `doh`. Kept as text so an unknown
    /// value only fails once a query needs the upstream.
    pub net: String,

    /// Exchange timeout in seconds.
    pub timeout: u64,
}

impl UpstreamConfig {
    pub fn net(&self) -> Result<UpstreamNet, DomainError> {
        self.net.parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            server: "8.8.8.8:53".to_string(),
            net: UpstreamNet::Udp.to_string(),
            timeout: 2,
        }
    }
}
