use std::fmt;

/// Protocol a query arrived on. Decides how the answer is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundKind {
    /// RFC 8484 wire format over HTTP.
    Wire,
    /// JSON query API.
    Json,
    /// Plain DNS over UDP/TCP.
    Raw,
}

impl InboundKind {
    pub fn label(&self) -> &'static str {
        match self {
            InboundKind::Wire => "DoH",
            InboundKind::Json => "DJA",
            InboundKind::Raw => "DNS",
        }
    }
}

impl fmt::Display for InboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
