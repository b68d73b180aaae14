// Wire types for the customer service.
//
// Field names match the service's JSON exactly (snake_case for records,
// camelCase `customerId` in the create response).

use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{ "data": ... }` wrapper used by every read endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Body returned by `POST customers`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreated {
    pub customer_id: i64,
}

/// `{ "address": ... }` wrapper returned by address writes.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressEnvelope {
    pub address: AddressResponse,
}

/// Failure body: `{ "error": "...", "field": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Absent or `null` on customers without addresses.
    #[serde(default)]
    pub addresses: Option<Vec<AddressResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: i64,
    #[serde(default)]
    pub address_details: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

// ── Request bodies ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CustomerBody {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressBody {
    /// Required on create, omitted on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    pub address_details: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
}
