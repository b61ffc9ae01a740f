use crate::errors::DomainError;
use std::fmt;
use std::str::FromStr;

/// Network used to reach the upstream resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamNet {
    Udp,
    Tcp,
    TcpTls,
    Doh,
}

impl UpstreamNet {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamNet::Udp => "udp",
            UpstreamNet::Tcp => "tcp",
            UpstreamNet::TcpTls => "tcp-tls",
            UpstreamNet::Doh => "doh",
        }
    }
}

impl FromStr for UpstreamNet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(UpstreamNet::Udp),
            "tcp" => Ok(UpstreamNet::Tcp),
            "tcp-tls" => Ok(UpstreamNet::TcpTls),
            "doh" => Ok(UpstreamNet::Doh),
            _ => Err(DomainError::UnsupportedTransport(s.to_string())),
        }
    }
}

impl fmt::Display for UpstreamNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits `host:port`, `IPv4:port` or `[IPv6]:port` into its parts.
pub fn split_host_port(addr: &str) -> Option<(&str, u16)> {
    let (host, port) = addr.rsplit_once(':')?;
    let port = port.parse::<u16>().ok()?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some((host, port))
}
