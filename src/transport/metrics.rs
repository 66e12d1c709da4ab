use crate::ErrorKind;
use http::StatusCode;
use std::time::Duration;

pub(crate) struct InFlightGuard {
    gauge: metrics::Gauge,
}

impl InFlightGuard {
    pub(crate) fn new() -> Self {
        let gauge = metrics::gauge!("jenkins_buildqueue_inflight");
        gauge.increment(1.0);
        Self { gauge }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.decrement(1.0);
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Transport => "transport",
        ErrorKind::Protocol => "protocol",
        ErrorKind::Parse => "parse",
        ErrorKind::Schema => "schema",
        ErrorKind::InvalidConfig => "invalid_config",
    }
}

pub(crate) fn record_fetch(
    status: Option<StatusCode>,
    latency: Duration,
    error_kind: Option<ErrorKind>,
) {
    let status_class = status.map(status_class).unwrap_or("none");

    metrics::counter!(
        "jenkins_buildqueue_requests_total",
        "status_class" => status_class
    )
    .increment(1);
    metrics::histogram!(
        "jenkins_buildqueue_request_duration_seconds",
        "status_class" => status_class
    )
    .record(latency);

    if let Some(kind) = error_kind {
        metrics::counter!(
            "jenkins_buildqueue_errors_total",
            "kind" => error_kind_label(kind)
        )
        .increment(1);
    }
}

pub(crate) fn record_cache_lookup(hit: bool) {
    if hit {
        metrics::counter!("jenkins_buildqueue_cache_hits_total").increment(1);
    } else {
        metrics::counter!("jenkins_buildqueue_cache_misses_total").increment(1);
    }
}
