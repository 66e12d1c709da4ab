//! Turns a [`JobConfig`] into the single GET a poll performs.

use crate::{JobConfig, Result, util::url::parse_endpoint};
use http::{HeaderMap, Method};
use std::time::Duration;
use url::Url;

/// Path and tree filter appended to the endpoint; restricts the payload to
/// the four job fields this crate reads.
pub const JOBS_API_SUFFIX: &str = "/api/json?tree=jobs[name,url,color,inQueue]";

/// Everything a transport needs to issue the poll request.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub timeout: Duration,
    pub headers: HeaderMap,
    /// Always `true`: Jenkins instances behind self-signed certificates are
    /// common. The built-in transports disable verification when their
    /// client is built and do not read this field; it is for custom
    /// `AsyncTransport` and `BlockingTransport` implementations.
    pub accept_invalid_certs: bool,
}

/// Build the request descriptor for `config`.
///
/// The endpoint is used verbatim as the prefix of [`JOBS_API_SUFFIX`]. The
/// `authorization` header is present only when `globalAuth` has an entry for
/// the selected credential key.
pub fn build_request(config: &JobConfig) -> Result<RequestDescriptor> {
    parse_endpoint(&config.endpoint)?;
    let url = Url::parse(&format!("{}{JOBS_API_SUFFIX}", config.endpoint)).map_err(|err| {
        crate::Error::InvalidConfig {
            message: "invalid endpoint".into(),
            source: Some(Box::new(err)),
        }
    })?;

    let mut headers = HeaderMap::new();
    if let Some(creds) = config.selected_credentials()? {
        creds.apply(&mut headers)?;
    }

    Ok(RequestDescriptor {
        method: Method::GET,
        url,
        timeout: config.request_timeout(),
        headers,
        accept_invalid_certs: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Credentials, DEFAULT_TIMEOUT, ErrorKind};
    use http::header::AUTHORIZATION;

    #[test]
    fn appends_tree_query_to_endpoint() {
        let req = build_request(&JobConfig::new("http://ci.example.com/view/nightly")).unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.path(), "/view/nightly/api/json");
        assert_eq!(req.url.query(), Some("tree=jobs[name,url,color,inQueue]"));
        assert_eq!(req.timeout, DEFAULT_TIMEOUT);
        assert!(req.accept_invalid_certs);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn default_credentials_select_basic_auth() {
        let config = JobConfig::new("http://ci.example.com")
            .with_global_auth("jenkins", Credentials::new("u", "p"));
        let req = build_request(&config).unwrap();
        assert_eq!(req.headers.get(AUTHORIZATION).unwrap(), "Basic dTpw");
    }

    #[test]
    fn unrelated_credential_entries_do_not_block_the_request() {
        let config: JobConfig = serde_json::from_value(serde_json::json!({
            "endpoint": "http://ci.example.com",
            "globalAuth": {
                "jenkins": { "username": "u", "password": "p" },
                "github": { "token": "abc" },
                "slack": "xoxb"
            }
        }))
        .unwrap();
        let req = build_request(&config).unwrap();
        assert_eq!(req.headers.get(AUTHORIZATION).unwrap(), "Basic dTpw");
    }

    #[test]
    fn unknown_credential_key_sends_no_header() {
        let config = JobConfig::new("http://ci.example.com")
            .with_credentials("staging")
            .with_global_auth("jenkins", Credentials::new("u", "p"));
        let req = build_request(&config).unwrap();
        assert!(req.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn explicit_timeout_is_used() {
        let config = JobConfig::new("http://ci").with_timeout(Duration::from_millis(750));
        let req = build_request(&config).unwrap();
        assert_eq!(req.timeout, Duration::from_millis(750));
    }

    #[test]
    fn rejects_unusable_endpoints() {
        for endpoint in ["", "not a url", "http://ci/view?x=1", "http://ci/#frag"] {
            let err = build_request(&JobConfig::new(endpoint)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig, "{endpoint}");
        }
    }
}
