#![allow(dead_code)]

mod dns_server_mock;
mod doh_server_mock;

pub use dns_server_mock::{answer_for, MockBehavior, MockDnsServer, MOCK_ANSWER_IP};
pub use doh_server_mock::MockDohServer;

use doh_gateway_domain::DnsMessage;
use hickory_proto::op::{MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use std::str::FromStr;

pub fn query(id: u16, name: &str, rtype: RecordType) -> DnsMessage {
    let mut msg = DnsMessage::new();
    msg.set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    msg.add_query(Query::query(Name::from_str(name).unwrap(), rtype));
    msg
}
