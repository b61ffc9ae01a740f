//! TLS Transport for DNS queries (DNS-over-TLS, RFC 7858)
//!
//! The `ClientConfig` is built once per transport and shared by every
//! exchange; rustls resumes sessions from it automatically. Each exchange
//! opens its own connection.

use super::tcp::{connect, read_with_length_prefix, send_with_length_prefix};
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use doh_gateway_domain::upstream_net::split_host_port;
use doh_gateway_domain::DomainError;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// DNS-over-TLS transport (RFC 7858)
pub struct TlsTransport {
    server: String,
    server_name: ServerName<'static>,
    connector: TlsConnector,
}

impl TlsTransport {
    /// The SNI name is the host part of `server`.
    pub fn new(server: String) -> Result<Self, DomainError> {
        let (host, _) = split_host_port(&server).ok_or_else(|| {
            DomainError::TransportError(format!("TLS upstream '{}' is not host:port", server))
        })?;

        let server_name = ServerName::try_from(host.to_string()).map_err(|e| {
            DomainError::TransportError(format!("Invalid TLS server name '{}': {}", host, e))
        })?;

        Ok(Self {
            connector: TlsConnector::from(client_config()?),
            server_name,
            server,
        })
    }
}

fn client_config() -> Result<Arc<rustls::ClientConfig>, DomainError> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| DomainError::TransportError(format!("TLS configuration failed: {}", e)))?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Arc::new(config))
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let tcp_stream = connect(&self.server, timeout).await?;

        let mut stream = tokio::time::timeout(
            timeout,
            self.connector.connect(self.server_name.clone(), tcp_stream),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: self.server.clone(),
        })?
        .map_err(|e| {
            DomainError::TransportError(format!("TLS handshake failed with {}: {}", self.server, e))
        })?;

        debug!(server = %self.server, "TLS connection established");

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server.clone(),
            })??;

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server.clone(),
            })??;

        debug!(
            server = %self.server,
            response_len = response_bytes.len(),
            "TLS response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TLS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
