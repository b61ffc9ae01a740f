//! Canonical DNS message helpers.
//!
//! Every inbound protocol is normalized into a [`DnsMessage`] (hickory's
//! `Message`) before it reaches the query engine. This module holds the pieces
//! of message handling that carry gateway semantics: cache fingerprints, reply
//! framing for cached answers, and wire (de)serialization with gateway errors.

use crate::errors::DomainError;
use hickory_proto::op::{MessageType, Query};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::fmt;

pub use hickory_proto::op::Message as DnsMessage;

/// Cache key derived from a question's type, class and name.
///
/// The name is taken as received, so `Example.com.` and `example.com.`
/// produce different fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_query(query: &Query) -> Self {
        Self(format!(
            "{} {} {}",
            query.query_type(),
            query.query_class(),
            query.name().to_ascii()
        ))
    }

    /// Fingerprint of the single question carried by `message`.
    pub fn of_message(message: &DnsMessage) -> Result<Self, DomainError> {
        single_question(message).map(Self::from_query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the only question of a query, rejecting empty and multi-question queries.
pub fn single_question(message: &DnsMessage) -> Result<&Query, DomainError> {
    match message.queries() {
        [query] => Ok(query),
        [] => Err(DomainError::InvalidQuery("empty question".to_string())),
        queries => Err(DomainError::InvalidQuery(format!(
            "expected exactly one question, got {}",
            queries.len()
        ))),
    }
}

pub fn decode_wire(bytes: &[u8]) -> Result<DnsMessage, DomainError> {
    DnsMessage::from_vec(bytes)
        .map_err(|e| DomainError::DecodeError(format!("unparsable DNS message: {}", e)))
}

pub fn encode_wire(message: &DnsMessage) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::EncodeError(e.to_string()))?;
    Ok(buf)
}

/// Re-frames a cached answer as the reply to `request`.
///
/// Transaction id, opcode, RD/CD flags and the question come from the
/// request; records, response code and the remaining flags from the cache.
pub fn reply_to(cached: &DnsMessage, request: &DnsMessage) -> DnsMessage {
    let mut reply = cached.clone();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_checking_disabled(request.checking_disabled());
    reply.take_queries();
    for query in request.queries() {
        reply.add_query(query.clone());
    }
    reply
}

/// One-line rendering of the answer section for log events.
pub fn answer_summary(message: &DnsMessage) -> String {
    let records: Vec<String> = message.answers().iter().map(|r| r.to_string()).collect();
    format!("[{}]", records.join(", "))
}
