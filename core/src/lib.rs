//! Synchronous client for the organisation accounts resource of a ledger API.
//!
//! # Overview
//! Two layers:
//! - `TransportClient` performs one HTTP call per operation against a fixed
//!   origin and classifies the response into body bytes or an `ApiError`.
//! - `AccountsClient` builds resource paths and `{"data": ...}` envelopes on
//!   top of any `Transport`, and exposes create / fetch / delete.
//!
//! # Design
//! - The network is reached only through the `HttpExecutor` port, so tests
//!   drive the transport with fakes. `UreqExecutor` is the default.
//! - No retries, caching or background work. A failed call returns
//!   immediately; retry policy belongs to the caller.
//! - Error messages have fixed formats that callers may string-match; prefer
//!   `ApiError::status_code` when branching on 404 vs 409.
//!
//! ```no_run
//! use accounts_core::{AccountData, AccountsClient, ClientConfig};
//! use uuid::Uuid;
//!
//! let client = AccountsClient::from_config(&ClientConfig::from_env()?)?;
//! let created = client.create_resource(&AccountData::new(Uuid::new_v4(), Uuid::new_v4()))?;
//! let fetched = client.fetch_resource(created.id)?;
//! client.delete_resource(fetched.id, fetched.version.unwrap_or_default())?;
//! # Ok::<(), accounts_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{AccountsClient, JsonCodec, PayloadCodec, BASE_PATH};
pub use config::ClientConfig;
pub use error::{ApiError, Operation, ResponseError};
pub use http::{BoxError, HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
pub use transport::{Transport, TransportClient};
pub use types::{AccountAttributes, AccountData, Envelope, UserDefinedEntry, ACCOUNT_TYPE};
