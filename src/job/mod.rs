//! Job entry points (async + optional blocking).
//!
//! A run goes Idle → Fetching → Done/Failed: look up the cache, otherwise
//! fetch, filter, store and return. Failures are never cached, so the next
//! scheduled run fetches again.

#[cfg(feature = "async")]
pub mod async_job;
#[cfg(feature = "blocking")]
pub mod blocking_job;
#[cfg(feature = "async")]
mod in_flight;

#[cfg(feature = "async")]
pub use async_job::{QueueJob, QueueJobBuilder};
#[cfg(feature = "blocking")]
pub use blocking_job::{BlockingQueueJob, BlockingQueueJobBuilder};

use crate::{JobConfig, Result, ResultSet, TtlCache};
use std::time::Duration;

/// Default connection establishment timeout of the built-in transports.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Effective configuration plus everything derived from it before any I/O.
#[derive(Debug)]
pub(crate) struct PreparedRun {
    pub(crate) config: JobConfig,
    pub(crate) key: String,
    pub(crate) ttl: Option<Duration>,
}

impl PreparedRun {
    pub(crate) fn new(config: JobConfig) -> Result<Self> {
        let config = config.effective();
        let key = config.cache_key()?;
        let ttl = config.cache_ttl()?;
        Ok(Self { config, key, ttl })
    }

    pub(crate) fn cached(&self, cache: &TtlCache<ResultSet>) -> Option<ResultSet> {
        let hit = cache.get(&self.key);

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_cache_lookup(hit.is_some());
        #[cfg(feature = "tracing")]
        tracing::debug!(hit = hit.is_some(), "job list cache lookup");

        hit
    }

    pub(crate) fn store(&self, cache: &TtlCache<ResultSet>, result: &ResultSet) {
        cache.insert(self.key.clone(), result.clone(), self.ttl);
    }
}

/// Convert a run outcome into the `(error, result)` pair host frameworks
/// expect from a job callback.
#[must_use]
pub fn into_callback_pair(outcome: Result<ResultSet>) -> (Option<String>, Option<ResultSet>) {
    match outcome {
        Ok(result) => (None, Some(result)),
        Err(err) => (Some(err.to_string()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ProtocolError};
    use http::StatusCode;

    #[test]
    fn prepared_run_defaults_credentials_before_keying() {
        let implicit = PreparedRun::new(JobConfig::new("http://ci")).unwrap();
        let explicit =
            PreparedRun::new(JobConfig::new("http://ci").with_credentials("jenkins")).unwrap();
        assert_eq!(implicit.key, explicit.key);
        assert_eq!(implicit.config.credentials.as_deref(), Some("jenkins"));
    }

    #[test]
    fn prepared_run_rejects_zero_interval() {
        let err = PreparedRun::new(JobConfig::new("http://ci").with_interval(Duration::ZERO))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidConfig);
    }

    #[test]
    fn callback_pair_carries_message_only() {
        let (err, result) = into_callback_pair(Err(Error::from(ProtocolError::BadStatus(
            StatusCode::INTERNAL_SERVER_ERROR,
        ))));
        assert_eq!(err.as_deref(), Some("Bad status 500"));
        assert!(result.is_none());

        let (err, result) = into_callback_pair(Ok(ResultSet::default()));
        assert!(err.is_none());
        assert_eq!(result, Some(ResultSet::default()));
    }
}
