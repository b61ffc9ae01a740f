//! RFC 8484 wire-format adapter.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use doh_gateway_domain::message::{decode_wire, encode_wire};
use doh_gateway_domain::{DnsMessage, DomainError};

pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// base64url for the `dns` GET parameter. Clients are supposed to strip the
/// padding but some keep it, so both forms decode.
const DNS_PARAM_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes the `dns` query parameter of `GET /dns-query`.
pub fn decode_get(dns_param: &str) -> Result<DnsMessage, DomainError> {
    if dns_param.is_empty() {
        return Err(DomainError::DecodeError(
            "missing dns query parameter".to_string(),
        ));
    }
    let bytes = DNS_PARAM_ENGINE
        .decode(dns_param)
        .map_err(|e| DomainError::DecodeError(format!("invalid base64url: {}", e)))?;
    decode_wire(&bytes)
}

/// Decodes the body of `POST /dns-query`.
pub fn decode_post(body: &[u8]) -> Result<DnsMessage, DomainError> {
    decode_wire(body)
}

pub fn encode(answer: &DnsMessage) -> Result<Vec<u8>, DomainError> {
    encode_wire(answer)
}

/// Inverse of [`decode_get`], used by DoH clients and tests.
pub fn encode_get_param(query: &DnsMessage) -> Result<String, DomainError> {
    Ok(DNS_PARAM_ENGINE.encode(encode_wire(query)?))
}
