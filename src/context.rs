//! Server context shared by every handler.
//!
//! Built once at startup, handed to router construction, and torn down
//! explicitly with [`ServerContext::shutdown`] once the server has drained.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ApiConfig;
use crate::engine::{EngineError, HarvestEngine, HarvestResult, QueryConfig};
use crate::observability::{metrics, LogHandle};
use crate::security::{RateLimiter, UserAgentFilter};

pub struct ServerContext {
    config: ApiConfig,
    engine: Arc<dyn HarvestEngine>,
    limiter: Arc<RateLimiter>,
    user_agents: Arc<UserAgentFilter>,
    log: LogHandle,
}

impl ServerContext {
    pub fn new(config: ApiConfig, engine: Arc<dyn HarvestEngine>) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let user_agents = Arc::new(UserAgentFilter::new(&config.filter));
        Self {
            config,
            engine,
            limiter,
            user_agents,
            log: LogHandle::disabled(),
        }
    }

    pub fn with_log_handle(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn user_agents(&self) -> &Arc<UserAgentFilter> {
        &self.user_agents
    }

    pub fn supported_sources(&self) -> Result<Vec<String>, EngineError> {
        self.engine.supported_sources()
    }

    /// Run a harvest bounded by the configured engine timeout.
    pub async fn harvest(&self, query: QueryConfig) -> Result<HarvestResult, EngineError> {
        let limit = Duration::from_secs(self.config.engine.timeout_secs);
        let domain = query.domain.clone();
        let started = Instant::now();

        let result = match tokio::time::timeout(limit, self.engine.harvest(query)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(limit)),
        };

        let elapsed = started.elapsed();
        metrics::record_engine_run(elapsed, result.as_ref().err().map(EngineError::kind));
        match &result {
            Ok(findings) => tracing::info!(
                domain = %domain,
                categories = findings.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Harvest completed"
            ),
            Err(e) => tracing::error!(
                domain = %domain,
                error = %e,
                error_debug = ?e,
                elapsed_ms = elapsed.as_millis() as u64,
                "Harvest failed"
            ),
        }
        result
    }

    /// Release engine resources and flush the log file.
    pub fn shutdown(&self) {
        tracing::info!("Releasing server context");
        self.engine.shutdown();
        self.log.flush();
    }
}
