//! HTTP transports.
//!
//! * `ReqwestAsync` / `UreqBlocking` are the defaults; both skip TLS
//!   certificate verification.
//! * A transport returns `Ok(None)` when it finished without a response
//!   object; the fetcher reports that separately from network failures.

use http::{HeaderMap, StatusCode};

#[cfg(feature = "async")]
pub mod async_transport;
#[cfg(feature = "blocking")]
pub mod blocking_transport;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
