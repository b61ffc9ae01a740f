use async_trait::async_trait;
use doh_gateway_domain::DomainError;

/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheSweepOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Port for proactive cache maintenance.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Remove every entry whose age exceeds the TTL.
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError>;
}
