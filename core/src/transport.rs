//! One-request-per-call HTTP transport with status classification.
//!
//! # Design
//! `TransportClient` holds an origin (scheme + host, nothing else) and an
//! injected `HttpExecutor`. `post`, `get` and `delete` build an absolute URL
//! from a resource path, run exactly one request, and push the response
//! through a single `classify` function. The per-verb differences live in an
//! `Expectation` value rather than in three copies of the status logic.
//!
//! Classification, in order:
//! 1. body read failure -> `BodyRead`
//! 2. status in the verb's success range -> body bytes
//! 3. 4xx -> `Api` with the parsed failure body, or the raw parse error as
//!    `ErrorBody` (DELETE answers 404 with an empty body, which becomes a
//!    synthesized "not found" failure)
//! 4. anything else -> `UnexpectedStatus`
//!
//! There are no retries, no caching and no timeouts here; a timeout is a
//! property of the executor.

use std::collections::BTreeMap;
use std::io::Read;
use std::ops::RangeInclusive;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ResponseError};
use crate::http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse};

const CLIENT_ERRORS: RangeInclusive<u16> = 400..=499;

/// Context appended to executor failures on POST.
const POST_CONTEXT: &str = "failed to post data";

/// Message used when DELETE gets a 404 with nothing in the body.
const NOT_FOUND_MESSAGE: &str = "not found";

/// The operations a resource client needs from the transport.
///
/// Implemented by `TransportClient`; resource clients are generic over it so
/// they can be exercised against a fake.
pub trait Transport {
    fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, ApiError>;
    fn get(&self, path: &str) -> Result<Vec<u8>, ApiError>;
    fn delete(&self, path: &str, query: &BTreeMap<String, String>) -> Result<(), ApiError>;
}

/// How a verb's response is judged.
struct Expectation {
    success: RangeInclusive<u16>,
    /// Treat an empty 404 body as a "not found" failure instead of a parse error.
    empty_not_found: bool,
    /// Appended to executor failures.
    context: Option<&'static str>,
}

const POST: Expectation = Expectation {
    success: 200..=299,
    empty_not_found: false,
    context: Some(POST_CONTEXT),
};

const GET: Expectation = Expectation {
    success: 200..=299,
    empty_not_found: false,
    context: None,
};

const DELETE: Expectation = Expectation {
    success: 200..=299,
    empty_not_found: true,
    context: None,
};

#[derive(Clone)]
pub struct TransportClient {
    executor: Arc<dyn HttpExecutor>,
    origin: Url,
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("origin", &self.origin.as_str())
            .finish_non_exhaustive()
    }
}

impl TransportClient {
    /// Build a client for `base_uri`, keeping only its scheme and host.
    ///
    /// Fails with `InvalidConfiguration` when `base_uri` is not an absolute
    /// URI with a host.
    pub fn new(executor: Arc<dyn HttpExecutor>, base_uri: &str) -> Result<Self, ApiError> {
        let origin = parse_origin(base_uri)?;
        Ok(Self { executor, origin })
    }

    /// The origin every resource path is resolved against.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn resolve(&self, path: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(path);
        url
    }

    fn send(&self, request: HttpRequest, expect: &Expectation) -> Result<Vec<u8>, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let method = request.method;
        let response = self.executor.execute(request).map_err(|source| {
            warn!(%method, error = %source, "request failed before a response arrived");
            ApiError::Transport {
                source,
                context: expect.context,
            }
        })?;
        classify(response, expect)
    }
}

impl Transport for TransportClient {
    fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>, ApiError> {
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.resolve(path).into(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        };
        self.send(request, &POST)
    }

    fn get(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve(path).into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        };
        self.send(request, &GET)
    }

    fn delete(&self, path: &str, query: &BTreeMap<String, String>) -> Result<(), ApiError> {
        let mut url = self.resolve(path);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        let request = HttpRequest {
            method: HttpMethod::Delete,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        };
        self.send(request, &DELETE).map(|_| ())
    }
}

/// Reduce `base_uri` to `scheme://host[:port]`.
fn parse_origin(base_uri: &str) -> Result<Url, ApiError> {
    let invalid =
        |reason: String| ApiError::InvalidConfiguration(format!("{reason}; invalid base uri"));

    let parsed = Url::parse(base_uri).map_err(|e| invalid(e.to_string()))?;
    let host = parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid(format!("no host in {base_uri:?}")))?;
    let authority = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Url::parse(&format!("{}://{authority}", parsed.scheme())).map_err(|e| invalid(e.to_string()))
}

fn classify(response: HttpResponse, expect: &Expectation) -> Result<Vec<u8>, ApiError> {
    let HttpResponse { status, mut body } = response;
    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes).map_err(ApiError::BodyRead)?;
    debug!(status, body_len = bytes.len(), "received response");

    if expect.success.contains(&status) {
        return Ok(bytes);
    }

    if CLIENT_ERRORS.contains(&status) {
        if status == 404 && expect.empty_not_found && bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ResponseError::new(status, NOT_FOUND_MESSAGE).into());
        }
        let mut failure: ResponseError =
            serde_json::from_slice(&bytes).map_err(ApiError::ErrorBody)?;
        failure.status_code = status;
        return Err(failure.into());
    }

    Err(ApiError::UnexpectedStatus(status))
}
