use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use wskload_core::{Credentials, RunConfig};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Everything needed to issue one invocation.
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    pub action: &'a str,
    pub url: &'a Url,
    pub credentials: &'a Credentials,
}

/// Issues a single invocation and reports the HTTP status code.
pub trait Transport: Send + Sync {
    fn invoke(
        &self,
        invocation: &Invocation<'_>,
    ) -> impl Future<Output = Result<u16, TransportError>> + Send;
}

/// `reqwest` backed transport. Cheap to clone; clones share a connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &RunConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            timeout: config.request_timeout(),
        })
    }
}

impl Transport for HttpTransport {
    async fn invoke(&self, invocation: &Invocation<'_>) -> Result<u16, TransportError> {
        let res = self
            .client
            .post(invocation.url.clone())
            .basic_auth(
                invocation.credentials.username(),
                Some(invocation.credentials.password().expose()),
            )
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = res.status().as_u16();
        // NOTE: Drain the body so the connection goes back to the pool.
        res.bytes().await.map_err(|err| self.classify(err))?;

        Ok(status)
    }
}

impl HttpTransport {
    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Http(err)
        }
    }
}
