use crate::adapters::{InboundRequest, OutboundResponse};
use crate::ports::{AnswerCache, UpstreamExchange};
use doh_gateway_domain::message::{answer_summary, reply_to};
use doh_gateway_domain::{DnsMessage, DomainError, Fingerprint, InboundKind};
use hickory_proto::op::ResponseCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves one canonical query: cache first, upstream on miss.
pub struct ResolveQueryUseCase {
    cache: Arc<dyn AnswerCache>,
    upstream: Arc<dyn UpstreamExchange>,
}

impl ResolveQueryUseCase {
    pub fn new(cache: Arc<dyn AnswerCache>, upstream: Arc<dyn UpstreamExchange>) -> Self {
        Self { cache, upstream }
    }

    /// Decoded request in, encoded response out.
    pub async fn handle(&self, request: InboundRequest) -> Result<OutboundResponse, DomainError> {
        let (kind, query) = request.into_parts();
        let answer = self.execute(kind, &query).await?;
        OutboundResponse::encode(kind, answer)
    }

    pub async fn execute(
        &self,
        kind: InboundKind,
        query: &DnsMessage,
    ) -> Result<DnsMessage, DomainError> {
        let fingerprint = Fingerprint::of_message(query)?;
        debug!(inbound = kind.label(), fingerprint = %fingerprint, "Query received");

        if let Some(cached) = self.cache.get(&fingerprint) {
            let reply = reply_to(&cached, query);
            info!(
                inbound = kind.label(),
                fingerprint = %fingerprint,
                answer = %answer_summary(&reply),
                "Cache hit"
            );
            return Ok(reply);
        }

        debug!(
            inbound = kind.label(),
            fingerprint = %fingerprint,
            upstream = %self.upstream.describe(),
            "Cache miss, forwarding upstream"
        );

        let answer = self.upstream.exchange(query).await?;

        let rcode = answer.response_code();
        if rcode != ResponseCode::NoError {
            warn!(
                inbound = kind.label(),
                fingerprint = %fingerprint,
                rcode = %rcode,
                "Upstream answered with non-success response code"
            );
        }
        info!(
            inbound = kind.label(),
            fingerprint = %fingerprint,
            answer = %answer_summary(&answer),
            "Upstream answer"
        );

        // Store off the response path; a concurrent identical query may still miss.
        let cache = Arc::clone(&self.cache);
        let stored = answer.clone();
        tokio::spawn(async move {
            cache.put(fingerprint, stored);
        });

        Ok(answer)
    }
}
