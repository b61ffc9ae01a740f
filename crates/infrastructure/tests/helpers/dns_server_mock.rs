use doh_gateway_domain::message::{decode_wire, encode_wire};
use doh_gateway_domain::DnsMessage;
use hickory_proto::op::MessageType;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_ANSWER_IP: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockBehavior {
    /// A record for the question name, TTL 60.
    Answer,
    /// Valid answer carrying a different transaction id.
    WrongId,
    /// A wrong-id datagram first, then the real answer.
    WrongIdThenAnswer,
    /// Reads the query and never replies.
    Silent,
}

/// Upstream stand-in answering over UDP or TCP on an ephemeral loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start_udp(behavior: MockBehavior) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = Arc::clone(&queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            for response in build_responses(&buf[..len], behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub async fn start_tcp(behavior: MockBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let counter = Arc::clone(&counter);
                        tokio::spawn(async move {
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_err() {
                                return;
                            }
                            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                            if stream.read_exact(&mut query).await.is_err() {
                                return;
                            }
                            counter.fetch_add(1, Ordering::SeqCst);
                            let responses = build_responses(&query, behavior);
                            if responses.is_empty() {
                                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                            }
                            for response in responses {
                                let len = (response.len() as u16).to_be_bytes();
                                let _ = stream.write_all(&len).await;
                                let _ = stream.write_all(&response).await;
                            }
                        });
                    }
                }
            }
        });

        Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub fn answer_for(query: &DnsMessage) -> DnsMessage {
    let mut response = query.clone();
    response
        .set_message_type(MessageType::Response)
        .set_recursion_available(true);
    if let Some(q) = query.queries().first() {
        response.add_answer(Record::from_rdata(
            q.name().clone(),
            60,
            RData::A(A(MOCK_ANSWER_IP)),
        ));
    }
    response
}

fn build_responses(query: &[u8], behavior: MockBehavior) -> Vec<Vec<u8>> {
    let Ok(query) = decode_wire(query) else {
        return Vec::new();
    };
    let answer = answer_for(&query);
    let mut wrong_id = answer.clone();
    wrong_id.set_id(query.id().wrapping_add(1));

    let responses = match behavior {
        MockBehavior::Answer => vec![answer],
        MockBehavior::WrongId => vec![wrong_id],
        MockBehavior::WrongIdThenAnswer => vec![wrong_id, answer],
        MockBehavior::Silent => Vec::new(),
    };
    responses
        .iter()
        .filter_map(|response| encode_wire(response).ok())
        .collect()
}
