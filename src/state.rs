//! Application state: the configured resolver and the id bound it samples under.
//!
//! This module owns:
//!   - the cache backend choice (Upstash when configured, in-memory otherwise)
//!   - the HTTP problem source
//!   - the shared `Resolver`

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, instrument};

use crate::cache::{MemoryCache, ProblemCache, UpstashCache};
use crate::config::AppConfig;
use crate::domain::Problem;
use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::source::HttpProblemSource;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub max_id: u32,
}

impl AppState {
    /// Build state from configuration: pick the cache backend, build the judge client.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let resolver_cfg = config.resolver.clone();

        let cache: Arc<dyn ProblemCache> = match &config.upstash {
            Some(up) => {
                let cache = UpstashCache::new(&up.url, &up.token, resolver_cfg.request_timeout())?;
                info!(target: "oneline_judge", url = %cache.url(), "Upstash cache enabled.");
                Arc::new(cache)
            }
            None => {
                info!(target: "oneline_judge", "Upstash not configured. Using in-memory cache.");
                Arc::new(MemoryCache::new())
            }
        };

        let source = HttpProblemSource::new(
            resolver_cfg.base_url.clone(),
            resolver_cfg.user_agent.clone(),
            resolver_cfg.request_timeout(),
        )?;
        info!(
            target: "oneline_judge",
            base_url = %source.base_url(),
            min_id = resolver_cfg.min_id,
            max_id = resolver_cfg.max_id,
            max_attempts = resolver_cfg.max_attempts,
            "Problem source ready."
        );

        let max_id = resolver_cfg.max_id;
        Ok(Self::from_resolver(Resolver::new(cache, Arc::new(source), resolver_cfg), max_id))
    }

    pub fn from_resolver(resolver: Resolver, max_id: u32) -> Self {
        Self { resolver, max_id }
    }

    /// Resolve a fresh problem under the configured bound, with a per-call RNG.
    pub async fn next_problem(&self) -> Result<Problem, ResolveError> {
        let mut rng = StdRng::from_entropy();
        self.resolver.resolve(&mut rng, self.max_id).await
    }
}
