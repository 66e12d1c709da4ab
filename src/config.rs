//! Per-invocation job configuration.

use crate::{Credentials, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Credential key used when the configuration does not name one.
pub const DEFAULT_CREDENTIALS: &str = "jenkins";

/// Request deadline used when `timeout` is absent or zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

pub(crate) const CACHE_KEY_PREFIX: &str = "jenkins-buildqueue:config-";

/// Configuration object supplied by the host for each run.
///
/// Field names follow the host's JSON (`globalAuth`, camelCase). Fields this
/// crate does not know about are kept in [`JobConfig::extra`] so they still
/// take part in the cache key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Base URL of a Jenkins view, folder or root.
    pub endpoint: String,
    /// Request deadline in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Cache time-to-live in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    /// Key into `global_auth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    /// The host's credential store. Only the entry named by `credentials` is
    /// read; the others may have any shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_auth: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(duration_millis(value));
        self
    }

    #[must_use]
    pub fn with_interval(mut self, value: Duration) -> Self {
        self.interval = Some(duration_millis(value));
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(key.into());
        self
    }

    /// Register a credential set under `key` in the global auth map.
    #[must_use]
    pub fn with_global_auth(mut self, key: impl Into<String>, creds: Credentials) -> Self {
        let entry = serde_json::json!({
            "username": creds.username,
            "password": creds.password.expose(),
        });
        self.global_auth
            .get_or_insert_with(Map::new)
            .insert(key.into(), entry);
        self
    }

    /// The configuration a run actually uses: `credentials` filled in with
    /// [`DEFAULT_CREDENTIALS`] when unset.
    #[must_use]
    pub fn effective(mut self) -> Self {
        if self.credentials.as_deref().is_none_or(str::is_empty) {
            self.credentials = Some(DEFAULT_CREDENTIALS.to_owned());
        }
        self
    }

    #[must_use]
    pub fn credentials_key(&self) -> &str {
        self.credentials
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_CREDENTIALS)
    }

    /// The credential set selected by `credentials`, if `global_auth` has one.
    ///
    /// Fails only when the selected entry lacks `username`/`password`.
    pub fn selected_credentials(&self) -> Result<Option<Credentials>> {
        let key = self.credentials_key();
        let Some(entry) = self.global_auth.as_ref().and_then(|auth| auth.get(key)) else {
            return Ok(None);
        };
        if entry.is_null() {
            return Ok(None);
        }
        Credentials::deserialize(entry)
            .map(Some)
            .map_err(|err| Error::InvalidConfig {
                message: format!("globalAuth.{key} is not a credential set").into_boxed_str(),
                source: Some(Box::new(err)),
            })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.timeout
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Cache time-to-live. `None` keeps the entry until the cache is dropped.
    pub fn cache_ttl(&self) -> Result<Option<Duration>> {
        match self.interval {
            None => Ok(None),
            Some(0) => Err(Error::invalid_config(
                "interval must be a positive number of milliseconds",
            )),
            Some(ms) => Ok(Some(Duration::from_millis(ms))),
        }
    }

    /// Cache key for this configuration.
    ///
    /// Built from a canonical JSON rendering with object keys sorted at every
    /// level, so equal configurations map to the same key regardless of the
    /// order their fields arrived in.
    pub fn cache_key(&self) -> Result<String> {
        let value = serde_json::to_value(self).map_err(|err| Error::InvalidConfig {
            message: "configuration is not serializable".into(),
            source: Some(Box::new(err)),
        })?;
        Ok(format!("{CACHE_KEY_PREFIX}{}", canonicalize(value)))
    }
}

fn duration_millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, canonicalize(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
