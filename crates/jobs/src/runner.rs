use crate::CacheSweepJob;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Owns the background jobs and ties them to one shutdown token.
pub struct JobRunner {
    cache_sweep: Option<CacheSweepJob>,
    shutdown: CancellationToken,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            cache_sweep: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cache_sweep(mut self, job: CacheSweepJob) -> Self {
        self.cache_sweep = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Spawns every configured job; the returned set completes once all of
    /// them have observed shutdown.
    pub fn start(self) -> JoinSet<()> {
        info!("Starting background job runner");

        let mut jobs = JoinSet::new();
        if let Some(job) = self.cache_sweep {
            let job = Arc::new(job.with_cancellation(self.shutdown.clone()));
            jobs.spawn(job.start());
        }

        info!(jobs = jobs.len(), "Background jobs started");
        jobs
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
