pub mod cache;
pub mod server;
pub mod transport;
pub mod upstream;

pub use cache::DnsCache;
pub use server::{DnsServerHandler, TcpDnsListener, UdpDnsListener, SHUTDOWN_GRACE_PERIOD};
pub use upstream::UpstreamClient;
