//! HTTP plumbing used to talk to printer servers.

use std::{future::Future, time::Duration};

use reqwest::{redirect, StatusCode};

use crate::PrinterEndpoint;

/// Upper bound on a single request, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Raw outcome of a single GET.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body. Only filled in for `200 OK` and `301 Moved Permanently`.
    pub body: String,
}

impl FetchResponse {
    /// The request returned `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// A request that never produced an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response within the timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Connection, protocol or URL error.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Issues one GET per query against a printer server.
pub trait Transport {
    /// GET `path` from `endpoint`. Implementations must not retry.
    fn fetch(
        &self,
        endpoint: &PrinterEndpoint,
        path: &str,
    ) -> impl Future<Output = Result<FetchResponse, TransportError>> + Send;
}

/// [Transport] backed by a [reqwest::Client].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new transport with the fixed request timeout. Redirects are
    /// not followed, so a `301` is reported as such.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, endpoint: &PrinterEndpoint, path: &str) -> Result<FetchResponse, TransportError> {
        let url = endpoint.url(path);
        tracing::debug!(url = %url, "requesting status");

        let mut request = self.client.get(&url).header("X-Api-Key", &endpoint.api_key);
        if let Some((username, password)) = endpoint.credentials() {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = if status == StatusCode::OK || status == StatusCode::MOVED_PERMANENTLY {
            response.text().await.map_err(classify)?
        } else {
            String::new()
        };

        tracing::debug!(url = %url, status = status.as_u16(), bytes = body.len(), "received status");

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(REQUEST_TIMEOUT)
    } else {
        TransportError::Request(err)
    }
}
