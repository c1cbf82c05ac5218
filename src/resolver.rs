//! Random problem selection.
//!
//! Flow per call:
//! 1) Sample an id uniformly from `[min_id, max_id)`.
//! 2) Read `{id}` and `{id}-title` from the cache.
//! 3) On a miss, fetch the page. A non-200 status resamples (bounded by
//!    `max_attempts`); a page without description or title aborts the call.
//!    Extracted values are written back to the cache.
//! 4) Split the description into sentences and pick one uniformly.
//!
//! Randomness, cache and page source are all injected so the whole flow is
//! deterministic under test.

use std::sync::Arc;

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, instrument, warn};

use crate::cache::{text_key, title_key, ProblemCache};
use crate::config::ResolverConfig;
use crate::domain::Problem;
use crate::error::ResolveError;
use crate::html::{inner_html, inner_text};
use crate::source::{FetchOutcome, ProblemSource};
use crate::util::split_sentences;

#[derive(Clone)]
pub struct Resolver {
    cache: Arc<dyn ProblemCache>,
    source: Arc<dyn ProblemSource>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(cache: Arc<dyn ProblemCache>, source: Arc<dyn ProblemSource>, config: ResolverConfig) -> Self {
        Self { cache, source, config }
    }

    /// Pick a random problem with an id in `[min_id, max_id)` and one
    /// sentence of its statement.
    #[instrument(level = "info", skip(self, rng), target = "resolver")]
    pub async fn resolve<R: Rng + Send>(&self, rng: &mut R, max_id: u32) -> Result<Problem, ResolveError> {
        let min_id = self.config.min_id;
        if max_id <= min_id {
            return Err(ResolveError::InvalidRange { min_id, max_id });
        }
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempts = 0u32;

        loop {
            let id = rng.gen_range(min_id..max_id);

            let (text, title) = match self.cached(id).await? {
                Some(entry) => {
                    debug!(target: "resolver", id, "cache hit");
                    entry
                }
                None => {
                    attempts += 1;
                    match self.source.fetch(id).await? {
                        FetchOutcome::Unavailable(status) => {
                            warn!(target: "resolver", id, status, attempts, max_attempts, "problem unavailable; resampling");
                            if attempts >= max_attempts {
                                return Err(ResolveError::Exhausted { attempts });
                            }
                            continue;
                        }
                        FetchOutcome::Page(html) => {
                            let (text, title) = self.extract(id, &html)?;
                            self.cache.set(&text_key(id), &text).await?;
                            self.cache.set(&title_key(id), &title).await?;
                            info!(target: "resolver", id, text_len = text.len(), "problem fetched and cached");
                            (text, title)
                        }
                    }
                }
            };

            let lines = split_sentences(&text);
            let line = lines.choose(rng).cloned().unwrap_or_default();
            debug!(target: "resolver", id, candidates = lines.len(), "sentence chosen");
            return Ok(Problem { id: id.to_string(), title, line });
        }
    }

    /// Both cached values, or None if either is missing.
    async fn cached(&self, id: u32) -> Result<Option<(String, String)>, ResolveError> {
        let text = self.cache.get(&text_key(id)).await?;
        let title = self.cache.get(&title_key(id)).await?;
        Ok(text.zip(title))
    }

    fn extract(&self, id: u32, html: &str) -> Result<(String, String), ResolveError> {
        let text = inner_text(html, &self.config.description_id).filter(|t| !t.is_empty());
        let title = inner_html(html, &self.config.title_id)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        match (text, title) {
            (Some(text), Some(title)) => Ok((text, title)),
            (text, title) => {
                warn!(
                    target: "resolver",
                    id,
                    has_description = text.is_some(),
                    has_title = title.is_some(),
                    "fetched page is missing content"
                );
                Err(ResolveError::UnusableContent { id })
            }
        }
    }
}
