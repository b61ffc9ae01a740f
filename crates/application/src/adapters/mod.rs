//! Protocol adapters between external request shapes and the canonical
//! message handled by the query engine.

pub mod json;
pub mod raw;
pub mod wire;

use doh_gateway_domain::{DnsMessage, DomainError, InboundKind};

pub use json::{JsonAnswer, JsonQueryParams, JsonQuestion, JsonRecord};

/// A decoded query together with the protocol it arrived on.
#[derive(Debug, Clone)]
pub enum InboundRequest {
    Wire(DnsMessage),
    Json(DnsMessage),
    Raw(DnsMessage),
}

impl InboundRequest {
    pub fn into_parts(self) -> (InboundKind, DnsMessage) {
        match self {
            InboundRequest::Wire(query) => (InboundKind::Wire, query),
            InboundRequest::Json(query) => (InboundKind::Json, query),
            InboundRequest::Raw(query) => (InboundKind::Raw, query),
        }
    }
}

/// An answer encoded for the protocol its query arrived on.
#[derive(Debug, Clone)]
pub enum OutboundResponse {
    /// Wire bytes served as `application/dns-message`.
    Wire(Vec<u8>),
    Json(JsonAnswer),
    /// Handed back to the raw listener, which serializes and writes it.
    Raw(DnsMessage),
}

impl OutboundResponse {
    pub fn encode(kind: InboundKind, answer: DnsMessage) -> Result<Self, DomainError> {
        match kind {
            InboundKind::Wire => Ok(OutboundResponse::Wire(wire::encode(&answer)?)),
            InboundKind::Json => Ok(OutboundResponse::Json(JsonAnswer::from_message(&answer))),
            InboundKind::Raw => Ok(OutboundResponse::Raw(raw::encode(answer))),
        }
    }
}
