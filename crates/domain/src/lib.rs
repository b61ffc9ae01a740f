//! doh-gateway domain layer
pub mod config;
pub mod errors;
pub mod inbound;
pub mod message;
pub mod upstream_net;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use inbound::InboundKind;
pub use message::{DnsMessage, Fingerprint};
pub use upstream_net::UpstreamNet;
