//! Raw DNS listeners over UDP and TCP.

use super::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use doh_gateway_application::adapters::raw;
use doh_gateway_application::use_cases::ResolveQueryUseCase;
use doh_gateway_domain::message::encode_wire;
use doh_gateway_domain::InboundKind;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const MAX_UDP_QUERY_SIZE: usize = 4096;

/// Idle time after which a client TCP connection is closed.
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long in-flight queries may run after shutdown is requested.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Answers raw DNS packets through the query engine.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<ResolveQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ResolveQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Wire bytes to send back, or `None` when nothing should be sent.
    pub async fn handle_packet(&self, packet: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let reply = match raw::decode(packet) {
            Ok(query) => match self.use_case.execute(InboundKind::Raw, &query).await {
                Ok(answer) => raw::encode(answer),
                Err(e) => {
                    warn!(inbound = InboundKind::Raw.label(), client = %client, error = %e, "Query failed");
                    raw::error_reply(&query, &e)
                }
            },
            Err(e) => {
                warn!(inbound = InboundKind::Raw.label(), client = %client, error = %e, "Undecodable DNS packet");
                raw::undecodable_reply(packet)?
            }
        };

        match encode_wire(&reply) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(client = %client, error = %e, "Failed to encode DNS reply");
                None
            }
        }
    }
}

pub struct UdpDnsListener {
    socket: Arc<UdpSocket>,
}

impl UdpDnsListener {
    pub async fn bind(addr: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self {
            socket: Arc::new(socket),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serves until `shutdown` fires, then drains in-flight queries.
    pub async fn run(self, handler: DnsServerHandler, shutdown: CancellationToken) {
        let local = self.local_addr().ok();
        info!(bind_address = ?local, "UDP DNS listener started");

        let mut tasks: JoinSet<()> = JoinSet::new();
        let mut recv_buf = vec![0u8; MAX_UDP_QUERY_SIZE];

        loop {
            while tasks.try_join_next().is_some() {}

            let (len, client) = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = self.socket.recv_from(&mut recv_buf) => match received {
                    Ok(received) => received,
                    Err(e) => {
                        warn!(error = %e, "UDP receive error");
                        continue;
                    }
                },
            };

            let packet = recv_buf[..len].to_vec();
            let socket = Arc::clone(&self.socket);
            let handler = handler.clone();
            tasks.spawn(async move {
                if let Some(reply) = handler.handle_packet(&packet, client).await {
                    if let Err(e) = socket.send_to(&reply, client).await {
                        warn!(client = %client, error = %e, "Failed to write UDP reply");
                    }
                }
            });
        }

        drain(tasks, "UDP").await;
        info!(bind_address = ?local, "UDP DNS listener stopped");
    }
}

pub struct TcpDnsListener {
    listener: TcpListener,
}

impl TcpDnsListener {
    pub async fn bind(addr: &str) -> io::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr).await?,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until `shutdown` fires, then drains open connections.
    pub async fn run(self, handler: DnsServerHandler, shutdown: CancellationToken) {
        let local = self.local_addr().ok();
        info!(bind_address = ?local, "TCP DNS listener started");

        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            while tasks.try_join_next().is_some() {}

            let (stream, client) = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "TCP accept error");
                        continue;
                    }
                },
            };

            let handler = handler.clone();
            let shutdown = shutdown.clone();
            tasks.spawn(serve_connection(stream, client, handler, shutdown));
        }

        drain(tasks, "TCP").await;
        info!(bind_address = ?local, "TCP DNS listener stopped");
    }
}

/// Answers length-prefixed queries on one connection, one at a time, until
/// the client closes, goes idle or shutdown begins.
async fn serve_connection(
    mut stream: TcpStream,
    client: SocketAddr,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) {
    loop {
        let packet = tokio::select! {
            _ = shutdown.cancelled() => break,
            read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)) => match read {
                Ok(Ok(packet)) => packet,
                Ok(Err(e)) => {
                    debug!(client = %client, error = %e, "TCP connection closed");
                    break;
                }
                Err(_) => {
                    debug!(client = %client, "TCP connection idle, closing");
                    break;
                }
            },
        };

        let Some(reply) = handler.handle_packet(&packet, client).await else {
            continue;
        };
        if let Err(e) = send_with_length_prefix(&mut stream, &reply).await {
            warn!(client = %client, error = %e, "Failed to write TCP reply");
            break;
        }
    }
}

async fn drain(mut tasks: JoinSet<()>, listener: &str) {
    if tasks.is_empty() {
        return;
    }

    let in_flight = tasks.len();
    let drained = tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, async {
        while tasks.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(listener, in_flight, remaining = tasks.len(), "Grace period elapsed, aborting queries");
        tasks.abort_all();
    }
}
