//! Account resource DTOs.
//!
//! # Design
//! The transport layer treats these as opaque: only `id` and `version` are
//! read by the client, to build paths and query strings. Every attribute is
//! optional and omitted from the JSON when unset, so a record survives a
//! decode/encode cycle without gaining fields the server never sent.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource type tag carried by every account record.
pub const ACCOUNT_TYPE: &str = "accounts";

/// JSON wrapper used for both request and response bodies: `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// An organisation account as exchanged with the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountData {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type", default = "default_account_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AccountAttributes>,
}

impl AccountData {
    /// A bare account of type `accounts` with no attributes.
    pub fn new(id: Uuid, organisation_id: Uuid) -> Self {
        Self {
            id,
            organisation_id,
            resource_type: ACCOUNT_TYPE.to_string(),
            version: None,
            created_on: None,
            modified_on: None,
            attributes: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AccountAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

fn default_account_type() -> String {
    ACCOUNT_TYPE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    /// ISO 3166-1 alpha-2 country code. Required by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    /// Account holder names, up to four lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_information: Option<Vec<UserDefinedEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_type: Option<String>,
}

/// Free-form key/value pair attached to an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDefinedEntry {
    pub key: String,
    pub value: String,
}
