use super::TransportResponse;
use crate::error::{Error, TransportErrorKind};
use crate::request::RequestDescriptor;
use http::Method;
use std::{sync::Arc, time::Duration};
use ureq::Agent;

/// Trait implemented by any blocking HTTP layer.
pub trait BlockingTransport: Send + Sync + 'static {
    /// Issue `req` once. `Ok(None)` means the call completed without a
    /// response object.
    fn send(&self, req: RequestDescriptor) -> Result<Option<TransportResponse>, Error>;
}

pub type DynBlockingTransport = Arc<dyn BlockingTransport>;

impl<T: BlockingTransport + ?Sized> BlockingTransport for Arc<T> {
    fn send(&self, req: RequestDescriptor) -> Result<Option<TransportResponse>, Error> {
        (**self).send(req)
    }
}

/// Default blocking transport built on `ureq`.
#[derive(Clone)]
pub struct UreqBlocking {
    agent: Agent,
}

impl UreqBlocking {
    /// Construct a new transport.
    ///
    /// * See [`crate::transport::async_transport::ReqwestAsync::try_new`] for parameter meaning.
    pub fn try_new(ua: &str, connect_timeout: Duration, no_proxy: bool) -> Result<Self, Error> {
        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(connect_timeout))
            .user_agent(ua)
            .tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );

        if no_proxy {
            builder = builder.proxy(None);
        }

        Ok(Self {
            agent: Agent::new_with_config(builder.build()),
        })
    }
}

fn map_ureq_error(err: ureq::Error) -> Error {
    let kind = match &err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            TransportErrorKind::Timeout
        }
        ureq::Error::Io(io)
            if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
            ) =>
        {
            TransportErrorKind::Connect
        }
        _ => TransportErrorKind::Other,
    };

    Error::Transport {
        kind,
        source: Box::new(err),
    }
}

impl BlockingTransport for UreqBlocking {
    fn send(&self, req: RequestDescriptor) -> Result<Option<TransportResponse>, Error> {
        let RequestDescriptor {
            method,
            url,
            timeout,
            headers,
            ..
        } = req;

        if method != Method::GET {
            return Err(Error::InvalidConfig {
                message: format!("unsupported HTTP method for blocking transport: {method}")
                    .into_boxed_str(),
                source: None,
            });
        }

        let mut builder = self.agent.get(url.as_str());
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        let mut response = builder
            .config()
            .timeout_global(Some(timeout))
            .build()
            .call()
            .map_err(map_ureq_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(map_ureq_error)?;

        Ok(Some(TransportResponse {
            status,
            headers,
            body,
        }))
    }
}
