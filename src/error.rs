//! Error taxonomy for the cache, the problem source and the resolver.

/// Failures talking to the key-value cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Request never produced a response (connect, timeout, TLS).
    #[error("cache transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Cache endpoint answered with a non-success status.
    #[error("cache returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Upstash accepted the request but reported a command error.
    #[error("upstash error: {0}")]
    Upstash(String),

    /// Response body was not the expected `{"result": ...}` shape.
    #[error("cache response could not be decoded: {0}")]
    Decode(String),
}

/// Failures fetching a problem page. Non-200 statuses are not errors;
/// see `source::FetchOutcome::Unavailable`.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("problem fetch failed for id {id}: {source}")]
    Transport {
        id: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("problem page body for id {id} could not be read: {source}")]
    Body {
        id: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Why `Resolver::resolve` did not produce a problem.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The sampling range `[min_id, max_id)` is empty.
    #[error("empty identifier range: min_id {min_id} >= max_id {max_id}")]
    InvalidRange { min_id: u32, max_id: u32 },

    /// Every sampled identifier answered with a non-success status.
    #[error("no problem found after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The page was fetched but has no description or no title.
    #[error("problem {id} has no usable description or title")]
    UnusableContent { id: u32 },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
