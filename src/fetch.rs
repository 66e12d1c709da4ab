//! One GET against the jobs API, decoded into a [`ResultSet`].

use crate::{
    Error, JobConfig, ProtocolError, Result, ResultSet,
    request::{RequestDescriptor, build_request},
    transport::TransportResponse,
};
use http::StatusCode;
use serde_json::Value;

#[cfg(feature = "async")]
use crate::transport::async_transport::AsyncTransport;
#[cfg(feature = "blocking")]
use crate::transport::blocking_transport::BlockingTransport;

#[cfg(feature = "tracing")]
use tracing::field;

/// Fetch the job list for `config` through `transport`.
///
/// Exactly one request is made. The result is not filtered.
#[cfg(feature = "async")]
pub async fn fetch_job_list<T>(config: &JobConfig, transport: &T) -> Result<ResultSet>
where
    T: AsyncTransport + ?Sized,
{
    let req = build_request(config)?;
    let scope = FetchScope::start(&req);
    let outcome = transport.send(req).await;
    scope.finish(outcome.and_then(decode_response))
}

/// Blocking twin of [`fetch_job_list`].
#[cfg(feature = "blocking")]
pub fn fetch_job_list_blocking<T>(config: &JobConfig, transport: &T) -> Result<ResultSet>
where
    T: BlockingTransport + ?Sized,
{
    let req = build_request(config)?;
    let scope = FetchScope::start(&req);
    let outcome = transport.send(req);
    scope.finish(outcome.and_then(decode_response))
}

/// Turn what the transport handed back into a typed result.
///
/// A JSON `null` body counts as an empty result.
pub(crate) fn decode_response(resp: Option<TransportResponse>) -> Result<ResultSet> {
    let resp = resp.ok_or(ProtocolError::MissingResponse)?;
    if resp.status != StatusCode::OK {
        return Err(ProtocolError::BadStatus(resp.status).into());
    }

    let value: Value = serde_json::from_slice(&resp.body).map_err(|source| Error::Parse {
        status: resp.status,
        source,
    })?;
    if value.is_null() {
        return Ok(ResultSet::default());
    }

    serde_json::from_value(value).map_err(|source| Error::Schema {
        status: resp.status,
        source,
    })
}

/// Logging and metrics around a single fetch.
struct FetchScope {
    #[cfg(any(feature = "tracing", feature = "metrics"))]
    start: std::time::Instant,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
    #[cfg(feature = "metrics")]
    _inflight: crate::transport::metrics::InFlightGuard,
}

impl FetchScope {
    fn start(_req: &RequestDescriptor) -> Self {
        Self {
            #[cfg(any(feature = "tracing", feature = "metrics"))]
            start: std::time::Instant::now(),
            #[cfg(feature = "tracing")]
            span: tracing::info_span!(
                "jenkins_buildqueue.fetch",
                http.method = %_req.method,
                http.url = %crate::util::url::sanitize_url_for_log(&_req.url),
                http.status = field::Empty,
                jobs = field::Empty,
                latency_ms = field::Empty,
                error_kind = field::Empty,
            ),
            #[cfg(feature = "metrics")]
            _inflight: crate::transport::metrics::InFlightGuard::new(),
        }
    }

    fn finish(self, result: Result<ResultSet>) -> Result<ResultSet> {
        #[cfg(feature = "tracing")]
        {
            let _enter = self.span.enter();
            self.span.record("latency_ms", self.start.elapsed().as_millis() as i64);
            match &result {
                Ok(set) => {
                    self.span.record("http.status", 200_i64);
                    self.span.record("jobs", set.jobs().len() as i64);
                }
                Err(err) => {
                    if let Some(status) = err.status() {
                        self.span.record("http.status", status.as_u16() as i64);
                    }
                    self.span.record("error_kind", field::debug(err.kind()));
                    tracing::warn!(error = %err, "job list fetch failed");
                }
            }
        }

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_fetch(
            match &result {
                Ok(_) => Some(StatusCode::OK),
                Err(err) => err.status(),
            },
            self.start.elapsed(),
            result.as_ref().err().map(Error::kind),
        );

        result
    }
}
