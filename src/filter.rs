use crate::{JobConfig, JobRecord, ResultSet};

/// `true` when the job is waiting for an executor.
#[must_use]
pub fn is_queued(job: &JobRecord) -> bool {
    job.in_queue
}

/// Keep only queued jobs, in their original order.
///
/// A result without a `jobs` field is returned as-is. The configuration is
/// accepted so the selection can depend on it later; the current policy
/// ignores it.
#[must_use]
pub fn filter_queued(_config: &JobConfig, mut result: ResultSet) -> ResultSet {
    if let Some(jobs) = result.jobs.take() {
        result.jobs = Some(jobs.into_iter().filter(is_queued).collect());
    }
    result
}
