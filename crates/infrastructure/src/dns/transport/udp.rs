//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). A truncated answer is returned
//! as received; there is no fallback to TCP.

use super::{resolve_server, DnsTransport, TransportResponse};
use async_trait::async_trait;
use doh_gateway_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    server: String,
}

impl UdpTransport {
    pub fn new(server: String) -> Self {
        Self { server }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let server_addr = resolve_server(&self.server, timeout).await?;

        // Ephemeral port in the server's address family
        let bind_addr: SocketAddr = if server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::TransportError(format!("Failed to bind UDP socket: {}", e))
        })?;

        socket.connect(server_addr).await.map_err(|e| {
            DomainError::TransportError(format!(
                "Failed to connect UDP socket to {}: {}",
                server_addr, e
            ))
        })?;

        let deadline = Instant::now() + timeout;

        let bytes_sent = tokio::time::timeout_at(deadline, socket.send(message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server.clone(),
            })?
            .map_err(|e| {
                DomainError::TransportError(format!(
                    "Failed to send UDP query to {}: {}",
                    server_addr, e
                ))
            })?;

        debug!(server = %server_addr, bytes_sent, "UDP query sent");

        let query_id = message_id(message_bytes);
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        // The connected socket only delivers datagrams from the server; stray
        // ids are skipped until the deadline.
        let bytes_received = loop {
            let received = tokio::time::timeout_at(deadline, socket.recv(&mut recv_buf))
                .await
                .map_err(|_| DomainError::TransportTimeout {
                    server: self.server.clone(),
                })?
                .map_err(|e| {
                    DomainError::TransportError(format!(
                        "Failed to receive UDP response from {}: {}",
                        server_addr, e
                    ))
                })?;

            let response_id = message_id(&recv_buf[..received]);
            if response_id.is_some() && response_id == query_id {
                break received;
            }
            warn!(
                server = %server_addr,
                expected_id = ?query_id,
                received_id = ?response_id,
                "Ignoring UDP datagram with mismatched id"
            );
        };

        recv_buf.truncate(bytes_received);

        debug!(server = %server_addr, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

fn message_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
