use super::TransportResponse;
use crate::error::{Error, TransportErrorKind};
use crate::request::RequestDescriptor;
use async_trait::async_trait;
use reqwest::Client;
use std::{sync::Arc, time::Duration};

#[cfg(feature = "rustls")]
fn ensure_rustls_provider() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

#[cfg(not(feature = "rustls"))]
fn ensure_rustls_provider() {}

/// Trait implemented by any async HTTP layer.
#[async_trait]
pub trait AsyncTransport: Send + Sync + 'static {
    /// Issue `req` once. `Ok(None)` means the call completed without a
    /// response object.
    async fn send(&self, req: RequestDescriptor) -> Result<Option<TransportResponse>, Error>;
}

pub type DynAsyncTransport = Arc<dyn AsyncTransport>;

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Arc<T> {
    async fn send(&self, req: RequestDescriptor) -> Result<Option<TransportResponse>, Error> {
        (**self).send(req).await
    }
}

/// Default async transport built on `reqwest`.
#[derive(Clone)]
pub struct ReqwestAsync {
    client: Client,
}

impl ReqwestAsync {
    /// Construct a new transport.
    ///
    /// * `ua` – User-Agent header.
    /// * `connect_timeout` – connection establishment timeout.
    /// * `no_proxy` – ignore system proxy environment variables.
    ///
    /// The overall deadline comes from each request's descriptor.
    pub fn try_new(ua: &str, connect_timeout: Duration, no_proxy: bool) -> Result<Self, Error> {
        ensure_rustls_provider();

        let mut builder = Client::builder()
            .danger_accept_invalid_certs(true)
            .user_agent(ua)
            .connect_timeout(connect_timeout);

        if no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|err| Error::InvalidConfig {
            message: "failed to build async HTTP client".into(),
            source: Some(Box::new(err)),
        })?;

        Ok(Self { client })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    Error::Transport {
        kind,
        source: Box::new(err),
    }
}

#[async_trait]
impl AsyncTransport for ReqwestAsync {
    async fn send(&self, req: RequestDescriptor) -> Result<Option<TransportResponse>, Error> {
        let RequestDescriptor {
            method,
            url,
            timeout,
            headers,
            ..
        } = req;

        let resp = self
            .client
            .request(method, url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        Ok(Some(TransportResponse {
            status,
            headers,
            body: body.to_vec(),
        }))
    }
}
