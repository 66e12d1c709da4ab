use crate::Error;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A string that never shows up in `Debug`/`Display` output.
///
/// It still serializes verbatim: cache keys are derived from the full
/// configuration, password included.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// One entry of the host's `globalAuth` credential map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password),
        }
    }

    /// `Basic base64(username:password)`.
    #[must_use]
    pub fn basic_value(&self) -> String {
        format!(
            "Basic {}",
            B64.encode(format!("{}:{}", self.username, self.password.expose()))
        )
    }

    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        let mut value =
            HeaderValue::from_str(&self.basic_value()).map_err(|err| Error::InvalidConfig {
                message: "invalid Authorization header value".into(),
                source: Some(Box::new(err)),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_value_encodes_user_and_password() {
        assert_eq!(Credentials::new("u", "p").basic_value(), "Basic dTpw");
        assert_eq!(
            Credentials::new("user", "token").basic_value(),
            "Basic dXNlcjp0b2tlbg=="
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn apply_sets_sensitive_authorization_header() {
        let mut headers = HeaderMap::new();
        Credentials::new("u", "p").apply(&mut headers).unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value, "Basic dTpw");
        assert!(value.is_sensitive());
    }
}
