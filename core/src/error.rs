//! Error types for the accounts API client.
//!
//! # Design
//! A single `ApiError` enum covers every failure the transport and resource
//! clients can produce. The rendered messages are relied on by callers that
//! string-match them, so each `#[error]` format is fixed.
//!
//! The resource client never replaces an error. It wraps it in
//! `ApiError::Resource`, which appends an operation suffix to the message and
//! exposes the original through `source()`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::BoxError;

/// Failure body returned by the API for 4xx responses.
///
/// `status_code` never comes from the wire: it is set from the HTTP status
/// of the response the body was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_message: String,
    #[serde(skip)]
    pub status_code: u16,
}

impl ResponseError {
    pub fn new(status_code: u16, error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            status_code,
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error_message.is_empty() {
            write!(
                f,
                "api failure with status code {} and no message received",
                self.status_code
            )
        } else {
            write!(
                f,
                "api failure with status code {} and message: {}",
                self.status_code, self.error_message
            )
        }
    }
}

impl std::error::Error for ResponseError {}

/// Resource operation named in the `ApiError::Resource` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Fetch,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Create => "create",
            Operation::Fetch => "fetch",
            Operation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Errors returned by `TransportClient` and `AccountsClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A configuration value was rejected, e.g. a base URI without a host.
    #[error("{0}")]
    InvalidConfiguration(String),

    /// The executor could not complete the request.
    ///
    /// `context` is only set for POST; GET and DELETE surface the executor's
    /// message untouched.
    #[error("{}", with_context(.source, .context))]
    Transport {
        #[source]
        source: BoxError,
        context: Option<&'static str>,
    },

    /// The response arrived but draining its body failed.
    #[error("{0}; failed to read response body")]
    BodyRead(#[source] std::io::Error),

    /// Status code outside both the success and the client-error ranges.
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),

    /// 4xx response carrying a failure body.
    #[error(transparent)]
    Api(#[from] ResponseError),

    /// A 4xx body that was not a valid failure record. Surfaced as-is.
    #[error(transparent)]
    ErrorBody(serde_json::Error),

    /// The request envelope could not be encoded.
    #[error("{0}; unable to convert account data payload")]
    Serialization(#[source] serde_json::Error),

    /// A successful response body could not be decoded into an envelope.
    #[error("{0}; failed to unmarshal response data")]
    Deserialization(#[source] serde_json::Error),

    /// A transport failure annotated with the resource operation it broke.
    #[error("{source}; unable to {operation} resource")]
    Resource {
        operation: Operation,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    pub(crate) fn resource(operation: Operation, source: ApiError) -> Self {
        ApiError::Resource {
            operation,
            source: Box::new(source),
        }
    }

    /// The error with every `Resource` annotation peeled off.
    pub fn root(&self) -> &ApiError {
        match self {
            ApiError::Resource { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self.root() {
            ApiError::Api(failure) => Some(failure.status_code),
            ApiError::UnexpectedStatus(status) => Some(*status),
            _ => None,
        }
    }

    /// The parsed failure body, if this is (or wraps) an API failure.
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self.root() {
            ApiError::Api(failure) => Some(failure),
            _ => None,
        }
    }
}

fn with_context(source: &BoxError, context: &Option<&'static str>) -> String {
    match context {
        Some(context) => format!("{source}; {context}"),
        None => source.to_string(),
    }
}
