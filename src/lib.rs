//! Jenkins build-queue poller.
//!
//! Fetches `{endpoint}/api/json?tree=jobs[name,url,color,inQueue]`, keeps the
//! jobs that are waiting in the build queue and caches the result per
//! configuration for `interval` milliseconds.

// compile-time guard: enable at least one job flavour.
#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("Enable at least one of: `async` (default) or `blocking`.");

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod job;
pub mod request;
pub mod transport;
pub mod types;

mod util;

pub use auth::{Credentials, SecretString};
pub use cache::TtlCache;
pub use config::{DEFAULT_CREDENTIALS, DEFAULT_TIMEOUT, JobConfig};
pub use error::{Error, ErrorKind, ProtocolError, Result, TransportErrorKind};
#[cfg(feature = "async")]
pub use fetch::fetch_job_list;
#[cfg(feature = "blocking")]
pub use fetch::fetch_job_list_blocking;
pub use filter::{filter_queued, is_queued};
pub use job::into_callback_pair;
#[cfg(feature = "async")]
pub use job::{QueueJob, QueueJobBuilder};
#[cfg(feature = "blocking")]
pub use job::{BlockingQueueJob, BlockingQueueJobBuilder};
pub use request::{JOBS_API_SUFFIX, RequestDescriptor, build_request};
pub use transport::TransportResponse;
#[cfg(feature = "async")]
pub use transport::async_transport::{AsyncTransport, ReqwestAsync};
#[cfg(feature = "blocking")]
pub use transport::blocking_transport::{BlockingTransport, UreqBlocking};
pub use types::{JobRecord, ResultSet};
