mod answer_cache;
mod cache_maintenance_port;
mod upstream_exchange;

pub use answer_cache::AnswerCache;
pub use cache_maintenance_port::{CacheMaintenancePort, CacheSweepOutcome};
pub use upstream_exchange::UpstreamExchange;
