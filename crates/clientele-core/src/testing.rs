// ── In-memory customer service for coordinator tests ──
//
// Behaves like the real service (assigns ids, cascades deletes, 404s on
// unknown ids) and can be told to fail the next call or to park the
// next call until the test releases it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::CoreError;
use crate::model::{Address, AddressId, AddressInput, Customer, CustomerId, CustomerInput};
use crate::remote::CustomerRemote;

pub(crate) fn address(id: i64, customer: i64) -> Address {
    Address {
        id: AddressId(id),
        address_details: format!("{id} Residency Road"),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        pin_code: "560025".into(),
        customer_id: CustomerId(customer),
    }
}

pub(crate) fn customer(id: i64, addresses: Vec<Address>) -> Customer {
    Customer {
        id: CustomerId(id),
        first_name: format!("Customer{id}"),
        last_name: "Test".into(),
        phone_number: "9876500000".into(),
        addresses,
        orders: Vec::new(),
    }
}

/// Parks one remote call until released.
#[derive(Default)]
pub(crate) struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Resolves once the parked call has started.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
pub(crate) struct FakeRemote {
    customers: Mutex<Vec<Customer>>,
    next_id: AtomicI64,
    failure: Mutex<Option<CoreError>>,
    gate: Mutex<Option<Arc<Gate>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeRemote {
    pub(crate) fn with_customers(customers: Vec<Customer>) -> Arc<Self> {
        let fake = Self {
            customers: Mutex::new(customers),
            next_id: AtomicI64::new(1000),
            ..Self::default()
        };
        Arc::new(fake)
    }

    pub(crate) fn set_next_id(&self, id: i64) {
        self.next_id.store(id, Ordering::SeqCst);
    }

    /// The next call fails with `err` instead of touching any data.
    pub(crate) fn fail_next(&self, err: CoreError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    /// The next call waits at the gate.
    pub(crate) fn hold(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    /// Shared prologue of every call: count, wait at the gate, then
    /// surface an injected failure.
    async fn enter(&self, method: &'static str) -> Result<(), CoreError> {
        *self.calls.lock().unwrap().entry(method).or_default() += 1;

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        match self.failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn apply_address(a: &mut Address, input: &AddressInput) {
    a.address_details.clone_from(&input.address_details);
    a.city.clone_from(&input.city);
    a.state.clone_from(&input.state);
    a.pin_code.clone_from(&input.pin_code);
}

#[async_trait]
impl CustomerRemote for FakeRemote {
    async fn list_customers(&self) -> Result<Vec<Customer>, CoreError> {
        self.enter("list_customers").await?;
        Ok(self.customers.lock().unwrap().clone())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CoreError> {
        self.enter("get_customer").await?;
        self.customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CoreError::customer_not_found(id))
    }

    async fn create_customer(&self, input: &CustomerInput) -> Result<CustomerId, CoreError> {
        self.enter("create_customer").await?;
        let id = CustomerId(self.next_id());
        self.customers.lock().unwrap().push(Customer {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            addresses: Vec::new(),
            orders: Vec::new(),
        });
        Ok(id)
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<(), CoreError> {
        self.enter("update_customer").await?;
        let mut customers = self.customers.lock().unwrap();
        let c = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::customer_not_found(id))?;
        *c = c.with_input(input);
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), CoreError> {
        self.enter("delete_customer").await?;
        let mut customers = self.customers.lock().unwrap();
        let pos = customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::customer_not_found(id))?;
        customers.remove(pos);
        Ok(())
    }

    async fn create_address(
        &self,
        customer: CustomerId,
        input: &AddressInput,
    ) -> Result<Address, CoreError> {
        self.enter("create_address").await?;
        let id = AddressId(self.next_id());
        let mut customers = self.customers.lock().unwrap();
        let owner = customers
            .iter_mut()
            .find(|c| c.id == customer)
            .ok_or_else(|| CoreError::customer_not_found(customer))?;
        let mut address = Address {
            id,
            address_details: String::new(),
            city: String::new(),
            state: String::new(),
            pin_code: String::new(),
            customer_id: customer,
        };
        apply_address(&mut address, input);
        owner.addresses.push(address.clone());
        Ok(address)
    }

    async fn update_address(
        &self,
        id: AddressId,
        input: &AddressInput,
    ) -> Result<Address, CoreError> {
        self.enter("update_address").await?;
        let mut customers = self.customers.lock().unwrap();
        let address = customers
            .iter_mut()
            .flat_map(|c| c.addresses.iter_mut())
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::address_not_found(id))?;
        apply_address(address, input);
        Ok(address.clone())
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), CoreError> {
        self.enter("delete_address").await?;
        let mut customers = self.customers.lock().unwrap();
        for c in customers.iter_mut() {
            if let Some(pos) = c.addresses.iter().position(|a| a.id == id) {
                c.addresses.remove(pos);
                return Ok(());
            }
        }
        Err(CoreError::address_not_found(id))
    }
}
