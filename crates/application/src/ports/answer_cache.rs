use doh_gateway_domain::{DnsMessage, Fingerprint};

/// Fingerprint-keyed store of upstream answers.
///
/// A disabled cache is still an `AnswerCache`: lookups miss and stores are
/// dropped, so callers never branch on configuration.
pub trait AnswerCache: Send + Sync {
    /// Unexpired answer stored under `fingerprint`, if any.
    fn get(&self, fingerprint: &Fingerprint) -> Option<DnsMessage>;

    fn put(&self, fingerprint: Fingerprint, answer: DnsMessage);
}
