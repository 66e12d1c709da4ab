//! Blocking queue poller.

use super::{DEFAULT_CONNECT_TIMEOUT, PreparedRun};
use crate::{
    JobConfig, Result, ResultSet, TtlCache,
    fetch::fetch_job_list_blocking,
    filter::filter_queued,
    transport::{
        DEFAULT_USER_AGENT,
        blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking},
    },
};
use std::{sync::Arc, time::Duration};

/// Configures and constructs [`BlockingQueueJob`].
pub struct BlockingQueueJobBuilder {
    transport: Option<DynBlockingTransport>,
    cache: Option<TtlCache<ResultSet>>,
    user_agent: String,
    connect_timeout: Duration,
    no_proxy: bool,
}

impl Default for BlockingQueueJobBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            cache: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            no_proxy: false,
        }
    }
}

impl BlockingQueueJobBuilder {
    /// Use a custom transport instead of the default `ureq` one.
    pub fn transport(mut self, transport: impl BlockingTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn cache(mut self, cache: TtlCache<ResultSet>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn build(self) -> Result<BlockingQueueJob> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqBlocking::try_new(
                &self.user_agent,
                self.connect_timeout,
                self.no_proxy,
            )?),
        };

        Ok(BlockingQueueJob {
            transport,
            cache: self.cache.unwrap_or_default(),
        })
    }
}

/// Blocking counterpart of [`crate::QueueJob`], minus request coalescing.
#[derive(Clone)]
pub struct BlockingQueueJob {
    transport: DynBlockingTransport,
    cache: TtlCache<ResultSet>,
}

impl BlockingQueueJob {
    #[must_use]
    pub fn builder() -> BlockingQueueJobBuilder {
        BlockingQueueJobBuilder::default()
    }

    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn cache(&self) -> &TtlCache<ResultSet> {
        &self.cache
    }

    pub fn run(&self, config: JobConfig) -> Result<ResultSet> {
        let run = PreparedRun::new(config)?;
        if let Some(hit) = run.cached(&self.cache) {
            return Ok(hit);
        }

        let fetched = fetch_job_list_blocking(&run.config, &self.transport)?;
        let result = filter_queued(&run.config, fetched);
        run.store(&self.cache, &result);
        Ok(result)
    }

    pub fn on_run(&self, config: JobConfig) -> (Option<String>, Option<ResultSet>) {
        super::into_callback_pair(self.run(config))
    }
}
