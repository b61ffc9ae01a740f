use async_trait::async_trait;
use doh_gateway_domain::{DnsMessage, DomainError};

/// Sends one query to the configured upstream resolver and returns its answer.
///
/// Implementations never consult the answer cache. A non-success response
/// code is an answer, not an error.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn exchange(&self, query: &DnsMessage) -> Result<DnsMessage, DomainError>;

    /// Human-readable upstream target for log events.
    fn describe(&self) -> String {
        String::from("upstream")
    }
}
