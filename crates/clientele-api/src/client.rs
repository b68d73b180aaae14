// Hand-crafted async HTTP client for the customer service.
//
// Base path: configurable, e.g. http://localhost:5000/api/
// Reads are wrapped in `{ data }`, writes answer `{ customerId }` or
// `{ address }`, failures answer `{ error, field? }`.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    AddressBody, AddressEnvelope, AddressResponse, CustomerBody, CustomerCreated,
    CustomerResponse, DataEnvelope, ErrorResponse,
};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the customer/address REST service.
#[derive(Debug, Clone)]
pub struct CustomerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CustomerClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                error: Some(message),
                field,
            }) => Error::Api {
                status: status.as_u16(),
                message,
                field,
            },
            Ok(ErrorResponse { error: None, field }) => Error::Api {
                status: status.as_u16(),
                message: status.to_string(),
                field,
            },
            Err(_) => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() { status.to_string() } else { raw },
                field: None,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Customers ────────────────────────────────────────────────────

    pub async fn list_customers(&self) -> Result<Vec<CustomerResponse>, Error> {
        let envelope: DataEnvelope<Vec<CustomerResponse>> = self.get("customers").await?;
        Ok(envelope.data)
    }

    pub async fn get_customer(&self, id: i64) -> Result<CustomerResponse, Error> {
        let envelope: DataEnvelope<CustomerResponse> =
            self.get(&format!("customers/{id}")).await?;
        Ok(envelope.data)
    }

    /// Create a customer, returning the server-assigned id.
    pub async fn create_customer(&self, body: &CustomerBody) -> Result<i64, Error> {
        let created: CustomerCreated = self.post("customers", body).await?;
        Ok(created.customer_id)
    }

    pub async fn update_customer(&self, id: i64, body: &CustomerBody) -> Result<(), Error> {
        self.put_no_response(&format!("customers/{id}"), body).await
    }

    /// Delete a customer. The service cascades to its addresses.
    pub async fn delete_customer(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("customers/{id}")).await
    }

    // ── Addresses ────────────────────────────────────────────────────

    /// Create an address. `body.customer_id` must be set.
    pub async fn create_address(&self, body: &AddressBody) -> Result<AddressResponse, Error> {
        let envelope: AddressEnvelope = self.post("addresses", body).await?;
        Ok(envelope.address)
    }

    pub async fn update_address(
        &self,
        id: i64,
        body: &AddressBody,
    ) -> Result<AddressResponse, Error> {
        let envelope: AddressEnvelope = self.put(&format!("addresses/{id}"), body).await?;
        Ok(envelope.address)
    }

    pub async fn delete_address(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("addresses/{id}")).await
    }
}
