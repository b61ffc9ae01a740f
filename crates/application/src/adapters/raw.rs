//! Plain DNS over UDP/TCP. Messages arrive decoded and leave as messages; the
//! listener owns the framing.

use doh_gateway_domain::message::decode_wire;
use doh_gateway_domain::{DnsMessage, DomainError};
use hickory_proto::op::{MessageType, OpCode, ResponseCode};

pub fn decode(packet: &[u8]) -> Result<DnsMessage, DomainError> {
    decode_wire(packet)
}

pub fn encode(answer: DnsMessage) -> DnsMessage {
    answer
}

/// FORMERR for client mistakes, SERVFAIL for everything else.
pub fn response_code_for(error: &DomainError) -> ResponseCode {
    if error.is_client_error() {
        ResponseCode::FormErr
    } else {
        ResponseCode::ServFail
    }
}

/// Error reply to a query that decoded but could not be answered.
pub fn error_reply(request: &DnsMessage, error: &DomainError) -> DnsMessage {
    let mut reply = DnsMessage::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_checking_disabled(request.checking_disabled())
        .set_response_code(response_code_for(error));
    for query in request.queries() {
        reply.add_query(query.clone());
    }
    reply
}

/// FORMERR for a packet that did not decode. `None` when even the
/// transaction id is missing, in which case nothing is sent back.
pub fn undecodable_reply(packet: &[u8]) -> Option<DnsMessage> {
    let id = u16::from_be_bytes([*packet.first()?, *packet.get(1)?]);
    let mut reply = DnsMessage::new();
    reply
        .set_id(id)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_response_code(ResponseCode::FormErr);
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undecodable_reply_keeps_id() {
        let reply = undecodable_reply(&[0x12, 0x34, 0xff]).unwrap();
        assert_eq!(reply.id(), 0x1234);
        assert_eq!(reply.response_code(), ResponseCode::FormErr);
        assert!(undecodable_reply(&[0x12]).is_none());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            response_code_for(&DomainError::InvalidQuery("empty question".into())),
            ResponseCode::FormErr
        );
        assert_eq!(
            response_code_for(&DomainError::TransportTimeout {
                server: "8.8.8.8:53".into()
            }),
            ResponseCode::ServFail
        );
    }
}
