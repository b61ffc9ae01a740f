use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed request: {0}")]
    DecodeError(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Unsupported upstream transport: {0}")]
    UnsupportedTransport(String),

    #[error("Failed to encode DNS message: {0}")]
    EncodeError(String),
}

impl DomainError {
    /// True when the caller sent something we could not act on.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::DecodeError(_) | Self::InvalidQuery(_))
    }
}
