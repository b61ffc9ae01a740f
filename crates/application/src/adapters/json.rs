//! JSON query API adapter, shaped after Google's `resolve` JSON API.

use doh_gateway_domain::{DnsMessage, DomainError};
use hickory_proto::op::{MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use serde::{Deserialize, Serialize};

fn default_record_type() -> u16 {
    u16::from(RecordType::A)
}

/// Query string of `GET /resolve`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JsonQueryParams {
    pub name: String,

    /// Numeric record type, A when absent.
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
    pub data: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonAnswer {
    #[serde(rename = "Status")]
    pub status: u16,
    #[serde(rename = "TC")]
    pub truncated: bool,
    #[serde(rename = "RD")]
    pub recursion_desired: bool,
    #[serde(rename = "RA")]
    pub recursion_available: bool,
    #[serde(rename = "AD")]
    pub authentic_data: bool,
    #[serde(rename = "CD")]
    pub checking_disabled: bool,
    #[serde(rename = "Question")]
    pub question: JsonQuestion,
    #[serde(rename = "Answer", default, skip_serializing_if = "Vec::is_empty")]
    pub answer: Vec<JsonRecord>,
}

impl JsonQueryParams {
    /// Synthesizes a recursion-desired query for the requested name and type.
    pub fn to_query(&self) -> Result<DnsMessage, DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::DecodeError(
                "missing name query parameter".to_string(),
            ));
        }
        let fqdn = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{}.", name)
        };
        let name = Name::from_ascii(&fqdn)
            .map_err(|e| DomainError::DecodeError(format!("invalid name '{}': {}", fqdn, e)))?;

        let mut msg = DnsMessage::new();
        msg.set_id(fastrand::u16(..))
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        msg.add_query(Query::query(name, RecordType::from(self.record_type)));
        Ok(msg)
    }
}

impl JsonAnswer {
    pub fn from_message(answer: &DnsMessage) -> Self {
        let question = answer
            .queries()
            .first()
            .map(|q| JsonQuestion {
                name: q.name().to_ascii(),
                record_type: u16::from(q.query_type()),
            })
            .unwrap_or_default();

        let records = answer
            .answers()
            .iter()
            .chain(answer.name_servers())
            .chain(answer.additionals())
            .flat_map(json_records)
            .collect();

        Self {
            status: u16::from(answer.response_code()),
            truncated: answer.truncated(),
            recursion_desired: answer.recursion_desired(),
            recursion_available: answer.recursion_available(),
            authentic_data: answer.authentic_data(),
            checking_disabled: answer.checking_disabled(),
            question,
            answer: records,
        }
    }
}

/// TXT records expand to one entry per character-string.
fn json_records(record: &Record) -> Vec<JsonRecord> {
    let entry = |data: String| JsonRecord {
        name: record.name().to_ascii(),
        record_type: u16::from(record.record_type()),
        data,
        ttl: record.ttl(),
    };

    match record.data() {
        RData::A(a) => vec![entry(a.0.to_string())],
        RData::AAAA(aaaa) => vec![entry(aaaa.0.to_string())],
        RData::CNAME(cname) => vec![entry(cname.0.to_ascii())],
        RData::MX(mx) => vec![entry(mx.exchange().to_ascii())],
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|s| entry(String::from_utf8_lossy(s).into_owned()))
            .collect(),
        RData::SOA(soa) => vec![entry(soa.mname().to_ascii())],
        RData::SRV(srv) => vec![entry(srv.target().to_ascii())],
        _ => vec![entry(record.to_string())],
    }
}
