//! Asynchronous queue poller.

use super::{DEFAULT_CONNECT_TIMEOUT, PreparedRun, in_flight::InFlight};
use crate::{
    JobConfig, Result, ResultSet, TtlCache,
    fetch::fetch_job_list,
    filter::filter_queued,
    transport::{
        DEFAULT_USER_AGENT,
        async_transport::{AsyncTransport, DynAsyncTransport, ReqwestAsync},
    },
};
use std::{sync::Arc, time::Duration};

/// Configures and constructs [`QueueJob`].
pub struct QueueJobBuilder {
    transport: Option<DynAsyncTransport>,
    cache: Option<TtlCache<ResultSet>>,
    user_agent: String,
    connect_timeout: Duration,
    no_proxy: bool,
    coalesce: bool,
}

impl Default for QueueJobBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            cache: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            no_proxy: false,
            coalesce: false,
        }
    }
}

impl QueueJobBuilder {
    /// Use a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: impl AsyncTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Share an existing cache. Jobs built with clones of the same cache see
    /// each other's entries.
    pub fn cache(mut self, cache: TtlCache<ResultSet>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Override the default `User-Agent` header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Adjust the connection establishment timeout.
    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    /// Ignore system proxy environment variables.
    pub fn no_system_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Let concurrent runs with the same configuration share one request
    /// while the cache is cold. Off by default: each run then issues its own
    /// request until the first result lands in the cache.
    pub fn coalesce_requests(mut self, yes: bool) -> Self {
        self.coalesce = yes;
        self
    }

    /// Finalise configuration and build the job.
    pub fn build(self) -> Result<QueueJob> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestAsync::try_new(
                &self.user_agent,
                self.connect_timeout,
                self.no_proxy,
            )?),
        };

        Ok(QueueJob {
            inner: Arc::new(Inner {
                transport,
                cache: self.cache.unwrap_or_default(),
                in_flight: self.coalesce.then(InFlight::default),
            }),
        })
    }
}

/// Polls a Jenkins view and returns its queued jobs, cached per
/// configuration.
#[derive(Clone)]
pub struct QueueJob {
    inner: Arc<Inner>,
}

struct Inner {
    transport: DynAsyncTransport,
    cache: TtlCache<ResultSet>,
    in_flight: Option<InFlight>,
}

impl QueueJob {
    #[must_use]
    pub fn builder() -> QueueJobBuilder {
        QueueJobBuilder::default()
    }

    /// Job with the default transport and a private cache.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn cache(&self) -> &TtlCache<ResultSet> {
        &self.inner.cache
    }

    /// Return the queued jobs for `config`.
    ///
    /// Served from the cache while the entry for this configuration is live;
    /// otherwise fetched, filtered and stored for `interval` milliseconds.
    pub async fn run(&self, config: JobConfig) -> Result<ResultSet> {
        let run = PreparedRun::new(config)?;
        if let Some(hit) = run.cached(&self.inner.cache) {
            return Ok(hit);
        }

        let _slot = match &self.inner.in_flight {
            Some(registry) => {
                let slot = registry.acquire(&run.key).await;
                // The run we waited on may have filled the cache.
                if let Some(hit) = run.cached(&self.inner.cache) {
                    return Ok(hit);
                }
                Some(slot)
            }
            None => None,
        };

        let fetched = fetch_job_list(&run.config, &self.inner.transport).await?;
        let result = filter_queued(&run.config, fetched);
        run.store(&self.inner.cache, &result);
        Ok(result)
    }

    /// [`run`](Self::run), reported as the `(error, result)` pair of a host
    /// job callback.
    pub async fn on_run(&self, config: JobConfig) -> (Option<String>, Option<ResultSet>) {
        super::into_callback_pair(self.run(config).await)
    }
}
