use doh_gateway_application::ports::{AnswerCache, CacheMaintenancePort, UpstreamExchange};
use doh_gateway_application::use_cases::ResolveQueryUseCase;
use doh_gateway_domain::Config;
use doh_gateway_infrastructure::dns::{DnsCache, DnsServerHandler, UpstreamClient};
use doh_gateway_jobs::{CacheSweepJob, JobRunner};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything the listeners and the HTTP server share.
pub struct GatewayServices {
    pub cache: Arc<DnsCache>,
    pub resolve: Arc<ResolveQueryUseCase>,
}

impl GatewayServices {
    pub fn new(config: &Config) -> Self {
        let cache = Arc::new(DnsCache::from_config(&config.cache));
        let upstream = Arc::new(UpstreamClient::new(&config.upstream));
        info!(upstream = %upstream.describe(), "Upstream client ready");

        let resolve = Arc::new(ResolveQueryUseCase::new(
            cache.clone() as Arc<dyn AnswerCache>,
            upstream as Arc<dyn UpstreamExchange>,
        ));

        Self { cache, resolve }
    }

    pub fn dns_handler(&self) -> DnsServerHandler {
        DnsServerHandler::new(self.resolve.clone())
    }

    /// The sweep job only runs when there is a cache to sweep.
    pub fn job_runner(&self, config: &Config, shutdown: CancellationToken) -> JobRunner {
        let runner = JobRunner::new().with_shutdown_token(shutdown);
        if !config.cache.enabled {
            return runner;
        }

        let maintenance = self.cache.clone() as Arc<dyn CacheMaintenancePort>;
        runner.with_cache_sweep(CacheSweepJob::new(
            maintenance,
            config.cache.sweep_interval(),
        ))
    }
}
