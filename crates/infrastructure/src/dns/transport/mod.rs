pub mod https;
pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use doh_gateway_domain::upstream_net::split_host_port;
use doh_gateway_domain::{DomainError, UpstreamNet};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    Tls(tls::TlsTransport),
    Https(https::HttpsTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Https(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
            Self::Tls(t) => t.protocol_name(),
            Self::Https(t) => t.protocol_name(),
        }
    }

    /// DoH servers may rewrite the transaction id (RFC 8484 recommends 0),
    /// so only the stream and datagram transports are held to it.
    pub fn checks_response_id(&self) -> bool {
        !matches!(self, Self::Https(_))
    }
}

/// Builds the transport for `net`. Connector state (TLS config, HTTP client)
/// is created here once and shared by every exchange.
pub fn create_transport(
    net: UpstreamNet,
    server: &str,
    timeout: Duration,
) -> Result<Transport, DomainError> {
    match net {
        UpstreamNet::Udp => Ok(Transport::Udp(udp::UdpTransport::new(server.to_string()))),
        UpstreamNet::Tcp => Ok(Transport::Tcp(tcp::TcpTransport::new(server.to_string()))),
        UpstreamNet::TcpTls => Ok(Transport::Tls(tls::TlsTransport::new(server.to_string())?)),
        UpstreamNet::Doh => Ok(Transport::Https(https::HttpsTransport::new(
            server.to_string(),
            timeout,
        )?)),
    }
}

/// Resolves `host:port` to the first socket address, literal IPs without a lookup.
pub(crate) async fn resolve_server(
    server: &str,
    timeout: Duration,
) -> Result<SocketAddr, DomainError> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let (host, port) = split_host_port(server).ok_or_else(|| {
        DomainError::TransportError(format!("Upstream address '{}' is not host:port", server))
    })?;

    let mut addrs = tokio::time::timeout(timeout, tokio::net::lookup_host((host, port)))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.to_string(),
        })?
        .map_err(|e| {
            DomainError::TransportError(format!("Failed to resolve upstream {}: {}", server, e))
        })?;

    addrs.next().ok_or_else(|| {
        DomainError::TransportError(format!("Upstream {} resolved to no addresses", server))
    })
}
