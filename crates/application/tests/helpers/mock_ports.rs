use async_trait::async_trait;
use doh_gateway_application::ports::{AnswerCache, UpstreamExchange};
use doh_gateway_domain::{DnsMessage, DomainError, Fingerprint};
use hickory_proto::op::{MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn query(id: u16, name: &str, rtype: RecordType) -> DnsMessage {
    let mut msg = DnsMessage::new();
    msg.set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    msg.add_query(Query::query(Name::from_str(name).unwrap(), rtype));
    msg
}

pub fn a_record(name: &str, ttl: u32, ip: Ipv4Addr) -> Record {
    Record::from_rdata(Name::from_str(name).unwrap(), ttl, RData::A(A(ip)))
}

/// Upstream that answers from a fixed table and counts exchanges.
#[derive(Clone, Default)]
pub struct MockUpstream {
    records: Arc<Mutex<HashMap<String, (ResponseCode, Vec<Record>)>>>,
    failure: Arc<Mutex<Option<DomainError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, name: &str, records: Vec<Record>) {
        self.answer_with_code(name, ResponseCode::NoError, records);
    }

    pub fn answer_with_code(&self, name: &str, rcode: ResponseCode, records: Vec<Record>) {
        self.records
            .lock()
            .unwrap()
            .insert(name.to_string(), (rcode, records));
    }

    pub fn fail_with(&self, error: DomainError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstream {
    async fn exchange(&self, query: &DnsMessage) -> Result<DnsMessage, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let name = query.queries()[0].name().to_ascii();
        let (rcode, records) = self
            .records
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .unwrap_or((ResponseCode::NXDomain, vec![]));

        let mut answer = query.clone();
        answer
            .set_message_type(MessageType::Response)
            .set_recursion_available(true)
            .set_response_code(rcode);
        for record in records {
            answer.add_answer(record);
        }
        Ok(answer)
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// In-memory cache without expiry. `disabled()` mirrors a cache turned off
/// in configuration.
#[derive(Clone)]
pub struct MockAnswerCache {
    entries: Arc<Mutex<HashMap<Fingerprint, DnsMessage>>>,
    enabled: bool,
    puts: Arc<AtomicUsize>,
}

impl MockAnswerCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            enabled: true,
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Yields until the detached store tasks have run `count` puts.
    pub async fn wait_for_puts(&self, count: usize) {
        for _ in 0..1000 {
            if self.puts() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} cache stores, saw {}", count, self.puts());
    }
}

impl AnswerCache for MockAnswerCache {
    fn get(&self, fingerprint: &Fingerprint) -> Option<DnsMessage> {
        if !self.enabled {
            return None;
        }
        self.entries.lock().unwrap().get(fingerprint).cloned()
    }

    fn put(&self, fingerprint: Fingerprint, answer: DnsMessage) {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.enabled {
            self.entries.lock().unwrap().insert(fingerprint, answer);
        }
    }
}
