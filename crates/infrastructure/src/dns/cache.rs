//! In-memory answer cache keyed by question fingerprint.

use async_trait::async_trait;
use dashmap::DashMap;
use doh_gateway_application::ports::{AnswerCache, CacheMaintenancePort, CacheSweepOutcome};
use doh_gateway_domain::config::CacheConfig;
use doh_gateway_domain::{DnsMessage, DomainError, Fingerprint};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry {
    answer: DnsMessage,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

/// Expired entries read as absent and are dropped on the lookup that finds
/// them, or by the next sweep.
pub struct DnsCache {
    entries: DashMap<Fingerprint, CacheEntry>,
    enabled: bool,
    ttl: Duration,
}

impl DnsCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            enabled,
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.enabled, config.ttl())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn remove_if_expired(&self, fingerprint: &Fingerprint) -> bool {
        self.entries
            .remove_if(fingerprint, |_, entry| entry.is_expired(self.ttl))
            .is_some()
    }

    /// Drops every expired entry and returns how many went.
    pub fn evict_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(self.ttl));
        before.saturating_sub(self.entries.len())
    }
}

impl AnswerCache for DnsCache {
    fn get(&self, fingerprint: &Fingerprint) -> Option<DnsMessage> {
        if !self.enabled {
            return None;
        }

        match self.entries.get(fingerprint) {
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.answer.clone()),
            Some(_) => {}
            None => return None,
        }

        // Re-checked under the write lock; a fresh store may have landed meanwhile.
        if self.remove_if_expired(fingerprint) {
            debug!(fingerprint = %fingerprint, "Expired cache entry removed");
        }
        None
    }

    fn put(&self, fingerprint: Fingerprint, answer: DnsMessage) {
        if !self.enabled {
            return;
        }
        self.entries.insert(
            fingerprint,
            CacheEntry {
                answer,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl CacheMaintenancePort for DnsCache {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        let entries_removed = self.evict_expired();
        Ok(CacheSweepOutcome {
            entries_removed,
            cache_size: self.len(),
        })
    }
}
