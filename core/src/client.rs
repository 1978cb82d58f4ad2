//! Account resource client.
//!
//! # Design
//! `AccountsClient` knows the account collection path and the `{"data": ...}`
//! envelope, and nothing about HTTP. Requests go through any `Transport`;
//! envelopes go through a `PayloadCodec`. Both are injected so either can be
//! replaced by a fake in tests.
//!
//! Transport failures are wrapped in `ApiError::Resource`, which appends
//! "; unable to <operation> resource" while keeping the original reachable
//! through `source()` and `ApiError::root()`. Codec failures are returned as
//! `Serialization` / `Deserialization` without that suffix.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, Operation};
use crate::http::UreqExecutor;
use crate::transport::{Transport, TransportClient};
use crate::types::{AccountData, Envelope};

/// Path of the account collection.
pub const BASE_PATH: &str = "/v1/organisation/accounts";

/// Converts account envelopes to and from wire bytes.
pub trait PayloadCodec: Send + Sync {
    fn encode(&self, envelope: &Envelope<&AccountData>) -> serde_json::Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> serde_json::Result<Envelope<AccountData>>;
}

/// `PayloadCodec` backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn encode(&self, envelope: &Envelope<&AccountData>) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(envelope)
    }

    fn decode(&self, bytes: &[u8]) -> serde_json::Result<Envelope<AccountData>> {
        serde_json::from_slice(bytes)
    }
}

/// Create, fetch and delete organisation accounts.
pub struct AccountsClient<T = TransportClient> {
    transport: T,
    codec: Box<dyn PayloadCodec>,
}

impl<T: fmt::Debug> fmt::Debug for AccountsClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountsClient")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl AccountsClient<TransportClient> {
    /// Client talking to `config.base_uri` over a `ureq` executor.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let executor = Arc::new(UreqExecutor::new(config.timeout));
        let transport = TransportClient::new(executor, &config.base_uri)?;
        Ok(Self::new(transport))
    }
}

impl<T: Transport> AccountsClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_codec(transport, JsonCodec)
    }

    pub fn with_codec(transport: T, codec: impl PayloadCodec + 'static) -> Self {
        Self {
            transport,
            codec: Box::new(codec),
        }
    }

    /// Create `account` and return the server's copy of it.
    ///
    /// The returned record is what the server stored, which can differ from
    /// the input (the server assigns `version`, `created_on`, ...).
    pub fn create_resource(&self, account: &AccountData) -> Result<AccountData, ApiError> {
        debug!(id = %account.id, "creating account");
        let payload = self
            .codec
            .encode(&Envelope::new(account))
            .map_err(ApiError::Serialization)?;
        let response = self
            .transport
            .post(BASE_PATH, payload)
            .map_err(|e| ApiError::resource(Operation::Create, e))?;
        self.decode(&response)
    }

    pub fn fetch_resource(&self, id: Uuid) -> Result<AccountData, ApiError> {
        debug!(%id, "fetching account");
        let response = self
            .transport
            .get(&resource_path(id))
            .map_err(|e| ApiError::resource(Operation::Fetch, e))?;
        self.decode(&response)
    }

    /// Delete version `version` of account `id`.
    pub fn delete_resource(&self, id: Uuid, version: i64) -> Result<(), ApiError> {
        debug!(%id, version, "deleting account");
        let query = BTreeMap::from([("version".to_string(), version.to_string())]);
        self.transport
            .delete(&resource_path(id), &query)
            .map_err(|e| ApiError::resource(Operation::Delete, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<AccountData, ApiError> {
        self.codec
            .decode(bytes)
            .map(Envelope::into_inner)
            .map_err(ApiError::Deserialization)
    }
}

fn resource_path(id: Uuid) -> String {
    format!("{BASE_PATH}/{id}")
}
