use serde::{Deserialize, Serialize};

/// Listener bind addresses. An empty UDP/TCP bind disables that listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub http_bind: String,

    pub udp_bind: String,

    pub tcp_bind: String,
}

impl ServerConfig {
    pub fn udp_enabled(&self) -> bool {
        !self.udp_bind.trim().is_empty()
    }

    pub fn tcp_enabled(&self) -> bool {
        !self.tcp_bind.trim().is_empty()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_bind: "0.0.0.0:8053".to_string(),
            udp_bind: String::new(),
            tcp_bind: String::new(),
        }
    }
}
