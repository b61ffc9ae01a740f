use super::transport::{create_transport, Transport};
use async_trait::async_trait;
use doh_gateway_application::ports::UpstreamExchange;
use doh_gateway_domain::config::UpstreamConfig;
use doh_gateway_domain::message::{decode_wire, encode_wire};
use doh_gateway_domain::{DnsMessage, DomainError};
use std::time::Duration;
use tracing::{debug, warn};

/// Exchanges queries with the single configured upstream resolver.
///
/// An unknown network is kept as an error and returned by every exchange,
/// so a bad `upstream.net` fails queries rather than startup.
pub struct UpstreamClient {
    server: String,
    timeout: Duration,
    transport: Result<Transport, DomainError>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let timeout = config.timeout();
        let transport = config
            .net()
            .and_then(|net| create_transport(net, &config.server, timeout));

        if let Err(e) = &transport {
            warn!(server = %config.server, net = %config.net, error = %e, "Upstream transport unavailable");
        }

        Self {
            server: config.server.clone(),
            timeout,
            transport,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }
}

#[async_trait]
impl UpstreamExchange for UpstreamClient {
    async fn exchange(&self, query: &DnsMessage) -> Result<DnsMessage, DomainError> {
        let transport = self.transport.as_ref().map_err(Clone::clone)?;

        let message_bytes = encode_wire(query)?;

        let response = tokio::time::timeout(self.timeout, transport.send(&message_bytes, self.timeout))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server.clone(),
            })??;

        let mut answer = decode_wire(&response.bytes).map_err(|e| {
            DomainError::TransportError(format!(
                "Unparsable answer from {}: {}",
                self.server, e
            ))
        })?;

        if !transport.checks_response_id() {
            // DoH servers may answer with id 0.
            answer.set_id(query.id());
        } else if answer.id() != query.id() {
            return Err(DomainError::TransportError(format!(
                "Answer from {} has id {} but query had {}",
                self.server,
                answer.id(),
                query.id()
            )));
        }

        debug!(
            server = %self.server,
            protocol = response.protocol_used,
            response_len = response.bytes.len(),
            "Upstream exchange complete"
        );

        Ok(answer)
    }

    fn describe(&self) -> String {
        match &self.transport {
            Ok(transport) => format!("{} ({})", self.server, transport.protocol_name()),
            Err(_) => self.server.clone(),
        }
    }
}
