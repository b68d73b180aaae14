// ── Customer domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::{AddressId, CustomerId};
use super::order::Order;

/// A postal address belonging to exactly one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub address_details: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub customer_id: CustomerId,
}

/// The canonical Customer type held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,

    /// Array order is display order; the first entry is the primary address.
    #[serde(default)]
    pub addresses: Vec<Address>,

    /// Synthetic, read-only order history.
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn address_count(&self) -> usize {
        self.addresses.len()
    }

    /// The address shown in list views: the first one, by array position.
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.first()
    }

    pub fn address(&self, id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Copy of this customer with the editable fields taken from `input`.
    /// Addresses and orders are carried over untouched.
    pub fn with_input(&self, input: &CustomerInput) -> Self {
        Self {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            ..self.clone()
        }
    }
}

// ── Inputs submitted by view adapters ───────────────────────────────

/// Editable customer fields, as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
}

impl From<&Customer> for CustomerInput {
    fn from(c: &Customer) -> Self {
        Self {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            phone_number: c.phone_number.clone(),
        }
    }
}

/// Editable address fields, as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub address_details: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pin_code: String,
}

impl From<&Address> for AddressInput {
    fn from(a: &Address) -> Self {
        Self {
            address_details: a.address_details.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            pin_code: a.pin_code.clone(),
        }
    }
}
