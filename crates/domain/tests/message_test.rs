use doh_gateway_domain::message::{decode_wire, encode_wire, reply_to, single_question};
use doh_gateway_domain::{DnsMessage, DomainError, Fingerprint};
use hickory_proto::op::{MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;

fn request(id: u16, name: &str, rtype: RecordType) -> DnsMessage {
    let mut msg = DnsMessage::new();
    msg.set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    msg.add_query(Query::query(Name::from_str(name).unwrap(), rtype));
    msg
}

fn answered(req: &DnsMessage, ip: Ipv4Addr) -> DnsMessage {
    let mut resp = req.clone();
    resp.set_message_type(MessageType::Response)
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError);
    let name = req.queries()[0].name().clone();
    resp.add_answer(Record::from_rdata(name, 300, RData::A(A(ip))));
    resp
}

#[test]
fn test_fingerprint_differs_by_type() {
    let a = Fingerprint::of_message(&request(1, "example.com.", RecordType::A)).unwrap();
    let aaaa = Fingerprint::of_message(&request(1, "example.com.", RecordType::AAAA)).unwrap();
    assert_ne!(a, aaaa);
    assert_eq!(aaaa.as_str(), "AAAA IN example.com.");
}

#[test]
fn test_fingerprint_ignores_id_and_flags() {
    let mut first = request(1, "example.com.", RecordType::A);
    let second = request(2, "example.com.", RecordType::A);
    first.set_recursion_desired(false);
    assert_eq!(
        Fingerprint::of_message(&first).unwrap(),
        Fingerprint::of_message(&second).unwrap()
    );
}

#[test]
fn test_fingerprint_is_case_sensitive() {
    let upper = Fingerprint::of_message(&request(1, "Example.com.", RecordType::A)).unwrap();
    let lower = Fingerprint::of_message(&request(1, "example.com.", RecordType::A)).unwrap();
    assert_ne!(upper, lower);
}

#[test]
fn test_multiple_questions_are_invalid() {
    let mut msg = request(1, "example.com.", RecordType::A);
    msg.add_query(Query::query(
        Name::from_str("example.org.").unwrap(),
        RecordType::A,
    ));
    assert!(matches!(
        single_question(&msg),
        Err(DomainError::InvalidQuery(_))
    ));
}

#[test]
fn test_wire_encoding_preserves_answer() {
    let req = request(0x1234, "example.com.", RecordType::A);
    let resp = answered(&req, Ipv4Addr::new(93, 184, 216, 34));

    let decoded = decode_wire(&encode_wire(&resp).unwrap()).unwrap();

    assert_eq!(decoded.id(), 0x1234);
    assert_eq!(decoded.answers().len(), 1);
    assert_eq!(
        decoded.answers()[0].data(),
        &RData::A(A(Ipv4Addr::new(93, 184, 216, 34)))
    );
}

#[test]
fn test_reply_to_takes_identity_from_request() {
    let original = request(10, "example.com.", RecordType::A);
    let cached = answered(&original, Ipv4Addr::new(10, 0, 0, 1));

    let mut later = request(99, "example.com.", RecordType::A);
    later.set_recursion_desired(false).set_checking_disabled(true);

    let reply = reply_to(&cached, &later);

    assert_eq!(reply.id(), 99);
    assert_eq!(reply.message_type(), MessageType::Response);
    assert!(!reply.recursion_desired());
    assert!(reply.checking_disabled());
    assert!(reply.recursion_available());
    assert_eq!(reply.queries(), later.queries());
    assert_eq!(reply.answers(), cached.answers());
}

#[test]
fn test_reply_to_keeps_cached_response_code() {
    let original = request(10, "missing.example.", RecordType::A);
    let mut cached = original.clone();
    cached
        .set_message_type(MessageType::Response)
        .set_response_code(ResponseCode::NXDomain);

    let reply = reply_to(&cached, &request(11, "missing.example.", RecordType::A));

    assert_eq!(reply.response_code(), ResponseCode::NXDomain);
}
