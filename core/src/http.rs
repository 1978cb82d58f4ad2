//! HTTP request/response descriptors and the execution port.
//!
//! # Design
//! The transport layer never talks to a socket directly. It builds an
//! `HttpRequest` describing the call, hands it to an injected `HttpExecutor`,
//! and classifies the `HttpResponse` it gets back. Tests substitute a fake
//! executor; production code uses `UreqExecutor`.
//!
//! The response body is a reader rather than a buffer so that a failure while
//! draining it can be told apart from a failure to execute the request.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use tracing::debug;

/// Boxed error returned by an `HttpExecutor`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// An HTTP request described as plain data.
///
/// `url` is always absolute: the transport client resolves resource paths
/// against its origin before building the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response as returned by an `HttpExecutor`.
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Read + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Response with an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, std::io::Cursor::new(body.into()))
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Performs exactly one HTTP round-trip.
///
/// Implementations must hand back every response, whatever its status code;
/// only a failure to complete the exchange (connection refused, timeout, ...)
/// is an `Err`.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// `HttpExecutor` backed by a blocking `ureq` agent.
#[derive(Clone)]
pub struct UreqExecutor {
    agent: ureq::Agent,
}

impl UreqExecutor {
    /// Build an executor whose every call is bounded by `timeout`.
    ///
    /// Redirects are never followed: a 3xx comes back as the response, and
    /// each `execute` sends exactly one request.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl HttpExecutor for UreqExecutor {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        debug!(method = %request.method, url = %request.url, "executing request");

        let response = match (request.method, request.body) {
            (HttpMethod::Get, _) => {
                with_headers(self.agent.get(&request.url), &request.headers).call()
            }
            (HttpMethod::Delete, _) => {
                with_headers(self.agent.delete(&request.url), &request.headers).call()
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&request.url), &request.headers).send(&body[..])
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(&request.url), &request.headers).send_empty()
            }
        }?;

        let status = response.status().as_u16();
        let body = response.into_body().into_reader();
        Ok(HttpResponse::new(status, body))
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
