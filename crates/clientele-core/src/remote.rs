// ── Remote customer service seam ──
//
// The coordinator talks to the customer service only through
// `CustomerRemote`. The HTTP implementation wraps `CustomerClient` and
// converts wire types into the canonical domain model.

use async_trait::async_trait;
use clientele_api::CustomerClient;
use clientele_api::types::{AddressBody, AddressResponse, CustomerBody, CustomerResponse};

use crate::error::CoreError;
use crate::model::{Address, AddressId, AddressInput, Customer, CustomerId, CustomerInput};

/// The remote collaborator: an abstract async function set over the
/// customer/address service.
///
/// Returned customers carry no orders; those are attached locally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRemote: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, CoreError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CoreError>;

    /// Returns the identity assigned by the service.
    async fn create_customer(&self, input: &CustomerInput) -> Result<CustomerId, CoreError>;

    async fn update_customer(&self, id: CustomerId, input: &CustomerInput)
    -> Result<(), CoreError>;

    async fn delete_customer(&self, id: CustomerId) -> Result<(), CoreError>;

    async fn create_address(
        &self,
        customer: CustomerId,
        input: &AddressInput,
    ) -> Result<Address, CoreError>;

    async fn update_address(&self, id: AddressId, input: &AddressInput)
    -> Result<Address, CoreError>;

    async fn delete_address(&self, id: AddressId) -> Result<(), CoreError>;
}

// ── HTTP implementation ──────────────────────────────────────────────

#[async_trait]
impl CustomerRemote for CustomerClient {
    async fn list_customers(&self) -> Result<Vec<Customer>, CoreError> {
        let customers = CustomerClient::list_customers(self).await?;
        Ok(customers.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CoreError> {
        let customer = CustomerClient::get_customer(self, id.get())
            .await
            .map_err(|e| not_found_as(e, || CoreError::customer_not_found(id)))?;
        Ok(customer.into())
    }

    async fn create_customer(&self, input: &CustomerInput) -> Result<CustomerId, CoreError> {
        let id = CustomerClient::create_customer(self, &customer_body(input)).await?;
        Ok(CustomerId(id))
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<(), CoreError> {
        CustomerClient::update_customer(self, id.get(), &customer_body(input))
            .await
            .map_err(|e| not_found_as(e, || CoreError::customer_not_found(id)))
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), CoreError> {
        CustomerClient::delete_customer(self, id.get())
            .await
            .map_err(|e| not_found_as(e, || CoreError::customer_not_found(id)))
    }

    async fn create_address(
        &self,
        customer: CustomerId,
        input: &AddressInput,
    ) -> Result<Address, CoreError> {
        let body = address_body(Some(customer), input);
        let created = CustomerClient::create_address(self, &body)
            .await
            .map_err(|e| not_found_as(e, || CoreError::customer_not_found(customer)))?;
        Ok(address_from_wire(created, customer))
    }

    async fn update_address(
        &self,
        id: AddressId,
        input: &AddressInput,
    ) -> Result<Address, CoreError> {
        let updated = CustomerClient::update_address(self, id.get(), &address_body(None, input))
            .await
            .map_err(|e| not_found_as(e, || CoreError::address_not_found(id)))?;
        // Owner stays 0 when the service doesn't echo it; the store keeps
        // the address under its existing customer either way.
        let owner = updated.customer_id.map_or(CustomerId(0), CustomerId);
        Ok(address_from_wire(updated, owner))
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), CoreError> {
        CustomerClient::delete_address(self, id.get())
            .await
            .map_err(|e| not_found_as(e, || CoreError::address_not_found(id)))
    }
}

/// Map a 404 to a specific not-found error; anything else converts as usual.
fn not_found_as(err: clientele_api::Error, not_found: impl FnOnce() -> CoreError) -> CoreError {
    if err.is_not_found() {
        not_found()
    } else {
        err.into()
    }
}

// ── Wire <-> domain conversion ───────────────────────────────────────

impl From<CustomerResponse> for Customer {
    fn from(c: CustomerResponse) -> Self {
        let id = CustomerId(c.id);
        Customer {
            id,
            first_name: c.first_name,
            last_name: c.last_name,
            phone_number: c.phone_number,
            addresses: c
                .addresses
                .unwrap_or_default()
                .into_iter()
                .map(|a| address_from_wire(a, id))
                .collect(),
            orders: Vec::new(),
        }
    }
}

/// Nested addresses may omit their back-reference; the owner fills it in.
fn address_from_wire(a: AddressResponse, owner: CustomerId) -> Address {
    Address {
        id: AddressId(a.id),
        address_details: a.address_details,
        city: a.city,
        state: a.state,
        pin_code: a.pin_code,
        customer_id: a.customer_id.map_or(owner, CustomerId),
    }
}

fn customer_body(input: &CustomerInput) -> CustomerBody {
    CustomerBody {
        first_name: input.first_name.trim().to_owned(),
        last_name: input.last_name.trim().to_owned(),
        phone_number: input.phone_number.clone(),
    }
}

fn address_body(customer: Option<CustomerId>, input: &AddressInput) -> AddressBody {
    AddressBody {
        customer_id: customer.map(CustomerId::get),
        address_details: input.address_details.trim().to_owned(),
        city: input.city.trim().to_owned(),
        state: input.state.trim().to_owned(),
        pin_code: input.pin_code.clone(),
    }
}
