use http::StatusCode;
use std::{error::Error as StdError, fmt};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    Transport,
    Protocol,
    Parse,
    Schema,
    InvalidConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// A response the transport produced that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The transport completed without handing back a response object.
    MissingResponse,
    /// Anything other than exactly `200 OK`.
    BadStatus(StatusCode),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingResponse => f.write_str("Bad response"),
            Self::BadStatus(status) => write!(f, "Bad status {}", status.as_u16()),
        }
    }
}

/// All errors returned by a queue poll.
///
/// The `Display` output is the single message handed back to the host
/// framework, so it carries no decoration beyond the underlying cause.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{source}")]
    Transport {
        kind: TransportErrorKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{0}")]
    Protocol(ProtocolError),

    #[error("{source}")]
    Parse {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected job list payload: {source}")]
    Schema {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }

    /// HTTP status of the response that caused the error, when one arrived.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Protocol(ProtocolError::BadStatus(status)) => Some(*status),
            Self::Parse { status, .. } | Self::Schema { status, .. } => Some(*status),
            Self::Protocol(ProtocolError::MissingResponse)
            | Self::Transport { .. }
            | Self::InvalidConfig { .. } => None,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }

    pub(crate) fn invalid_config(message: impl Into<Box<str>>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source: None,
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(value: ProtocolError) -> Self {
        Self::Protocol(value)
    }
}
