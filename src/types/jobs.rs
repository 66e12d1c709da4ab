use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One job as reported by `api/json?tree=jobs[name,url,color,inQueue]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upstream status token (`blue`, `red_anime`, ...); passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Absent or `null` reads as `false`.
    #[serde(default, deserialize_with = "null_as_false")]
    pub in_queue: bool,
    /// Fields outside the requested tree, e.g. `_class`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl JobRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, in_queue: bool) -> Self {
        Self {
            name: name.into(),
            url: None,
            color: None,
            in_queue,
            extra: Map::new(),
        }
    }
}

/// Top-level payload of a view, folder or root.
///
/// `jobs` is optional: a payload without it passes through the filter
/// untouched. Every other top-level field is carried in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<JobRecord>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultSet {
    #[must_use]
    pub fn from_jobs(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs: Some(jobs),
            extra: Map::new(),
        }
    }

    /// Jobs in payload order; empty when the payload had no `jobs` field.
    #[must_use]
    pub fn jobs(&self) -> &[JobRecord] {
        self.jobs.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_in_queue_reads_as_false() {
        let job: JobRecord = serde_json::from_value(json!({"name": "a"})).unwrap();
        assert!(!job.in_queue);
        assert_eq!(job.url, None);
    }

    #[test]
    fn null_in_queue_reads_as_false() {
        let job: JobRecord =
            serde_json::from_value(json!({"name": "a", "inQueue": null})).unwrap();
        assert!(!job.in_queue);
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "_class": "hudson.model.ListView",
            "jobs": [{
                "_class": "hudson.model.FreeStyleProject",
                "name": "build",
                "url": "https://ci/job/build/",
                "color": "blue_anime",
                "inQueue": true
            }]
        });
        let parsed: ResultSet = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.jobs()[0].color.as_deref(), Some("blue_anime"));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn payload_without_jobs_has_empty_slice() {
        let parsed: ResultSet = serde_json::from_value(json!({"description": null})).unwrap();
        assert!(parsed.jobs.is_none());
        assert!(parsed.jobs().is_empty());
    }
}
