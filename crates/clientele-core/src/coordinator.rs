// ── Mutation coordinator ──
//
// Applies create/update/delete operations against the customer service
// and reconciles the Record Store afterwards. Reconciliation happens
// only after the remote call succeeds; a failed call leaves the store
// exactly as it was.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::busy::{BusyKey, BusySet};
use crate::command::{Command, CommandResult};
use crate::config::ConsoleConfig;
use crate::deletion::{DeletionMachine, DeletionState};
use crate::error::CoreError;
use crate::model::{Address, AddressId, AddressInput, Customer, CustomerId, CustomerInput};
use crate::orders::{OrderSource, SyntheticOrders};
use crate::remote::CustomerRemote;
use crate::store::RecordStore;
use crate::validate;

/// Terminal outcome of a confirmed customer deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "customer_id", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The service deleted the customer; it is gone from the store.
    Deleted(CustomerId),
    /// The customer was already gone (locally or remotely). Any stale
    /// local copy has been pruned; nothing is retried.
    AlreadyResolved(CustomerId),
}

impl DeleteOutcome {
    pub fn customer_id(self) -> CustomerId {
        match self {
            Self::Deleted(id) | Self::AlreadyResolved(id) => id,
        }
    }
}

// ── Coordinator ──────────────────────────────────────────────────────

/// The main entry point for view adapters.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Owns the Record
/// Store, per-item busy tracking and the deletion state machine.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    store: Arc<RecordStore>,
    remote: Arc<dyn CustomerRemote>,
    orders: Arc<dyn OrderSource>,
    busy: BusySet,
    deletion: DeletionMachine,
}

impl Coordinator {
    pub fn new(remote: Arc<dyn CustomerRemote>, orders: Arc<dyn OrderSource>) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                store: Arc::new(RecordStore::new()),
                remote,
                orders,
                busy: BusySet::default(),
                deletion: DeletionMachine::new(),
            }),
        }
    }

    /// Coordinator backed by the HTTP client and synthetic order history.
    pub fn connect(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let client = clientele_api::CustomerClient::new(config.api_url.as_str(), &config.transport())?;
        debug!(url = %client.base_url(), "customer service client ready");
        Ok(Self::new(Arc::new(client), Arc::new(SyntheticOrders::new())))
    }

    /// Access the underlying Record Store.
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.inner.store
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Initial (or repeated) full fetch. On failure the store is left as
    /// it was, which before the first successful load means empty.
    pub async fn load(&self) -> Result<usize, CoreError> {
        let customers = match self.inner.remote.list_customers().await {
            Ok(customers) => customers,
            Err(e) => {
                warn!(error = %e, "failed to load customers");
                return Err(e);
            }
        };
        let enriched: Vec<Customer> = customers.into_iter().map(|c| self.enrich(c)).collect();
        let count = enriched.len();
        self.inner.store.replace_all(enriched);
        info!(customers = count, "loaded customers");
        Ok(count)
    }

    /// Re-fetch one customer and reconcile it in place (or append it).
    /// A customer the service no longer knows is pruned locally.
    pub async fn refresh_customer(&self, id: CustomerId) -> Result<Arc<Customer>, CoreError> {
        match self.inner.remote.get_customer(id).await {
            Ok(customer) => {
                let customer = self.enrich(customer);
                self.inner.store.insert(customer);
                debug!(customer_id = %id, "refreshed customer");
                self.inner
                    .store
                    .customer(id)
                    .ok_or_else(|| CoreError::customer_not_found(id))
            }
            Err(e) if e.is_not_found() => {
                if self.inner.store.remove(id).is_some() {
                    debug!(customer_id = %id, "pruned customer missing upstream");
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    // ── Customer mutations ───────────────────────────────────────────

    pub async fn create_customer(&self, input: CustomerInput) -> Result<CustomerId, CoreError> {
        validate::customer(&input)?;

        let id = self.inner.remote.create_customer(&input).await.inspect_err(|e| {
            warn!(error = %e, "customer creation rejected");
        })?;

        let customer = self.enrich(Customer {
            id,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            phone_number: input.phone_number,
            addresses: Vec::new(),
            orders: Vec::new(),
        });
        self.inner.store.insert(customer);
        info!(customer_id = %id, "created customer");
        Ok(id)
    }

    pub async fn update_customer(
        &self,
        id: CustomerId,
        input: CustomerInput,
    ) -> Result<Arc<Customer>, CoreError> {
        validate::customer(&input)?;
        self.require_customer(id)?;
        let _busy = self.inner.busy.acquire(BusyKey::Customer(id))?;

        self.inner
            .remote
            .update_customer(id, &input)
            .await
            .inspect_err(|e| {
                warn!(customer_id = %id, error = %e, "customer update rejected");
            })?;

        let normalized = CustomerInput {
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            phone_number: input.phone_number,
        };
        let updated = self
            .inner
            .store
            .apply_input(id, &normalized)
            .ok_or_else(|| CoreError::customer_not_found(id))?;
        info!(customer_id = %id, "updated customer");
        Ok(updated)
    }

    // ── Deletion protocol ────────────────────────────────────────────

    /// `Idle -> PendingConfirmation(id)`. Rejected unless idle.
    pub fn request_delete(&self, id: CustomerId) -> Result<(), CoreError> {
        self.inner.deletion.request(id)?;
        debug!(customer_id = %id, "deletion awaiting confirmation");
        Ok(())
    }

    /// `PendingConfirmation -> Idle`, without any remote call.
    pub fn cancel_delete(&self) -> Result<CustomerId, CoreError> {
        let id = self.inner.deletion.cancel()?;
        debug!(customer_id = %id, "deletion cancelled");
        Ok(id)
    }

    /// `PendingConfirmation(id) -> InFlight(id)`, issue the remote
    /// delete, then back to `Idle` whatever the outcome.
    pub async fn confirm_delete(&self) -> Result<DeleteOutcome, CoreError> {
        let flight = self.inner.deletion.begin()?;
        let id = flight.id();

        if self.inner.store.customer(id).is_none() {
            debug!(customer_id = %id, "customer already gone locally");
            return Ok(DeleteOutcome::AlreadyResolved(id));
        }
        let _busy = self.inner.busy.acquire(BusyKey::Customer(id))?;

        match self.inner.remote.delete_customer(id).await {
            Ok(()) => {
                self.inner.store.remove(id);
                info!(customer_id = %id, "deleted customer");
                Ok(DeleteOutcome::Deleted(id))
            }
            Err(e) if e.is_not_found() => {
                self.inner.store.remove(id);
                info!(customer_id = %id, "customer already deleted upstream");
                Ok(DeleteOutcome::AlreadyResolved(id))
            }
            Err(e) => {
                warn!(customer_id = %id, error = %e, "customer deletion failed");
                Err(e)
            }
        }
    }

    pub fn deletion_state(&self) -> DeletionState {
        self.inner.deletion.state()
    }

    pub fn subscribe_deletion(&self) -> watch::Receiver<DeletionState> {
        self.inner.deletion.subscribe()
    }

    // ── Address mutations ────────────────────────────────────────────

    /// Append a new address to a customer. Refused while the owning
    /// customer has a mutation in flight.
    pub async fn create_address(
        &self,
        customer_id: CustomerId,
        input: AddressInput,
    ) -> Result<Address, CoreError> {
        validate::address(&input)?;
        self.require_customer(customer_id)?;
        let owner_key = BusyKey::Customer(customer_id);
        if self.inner.busy.contains(owner_key) {
            return Err(CoreError::Busy { key: owner_key });
        }

        let created = self
            .inner
            .remote
            .create_address(customer_id, &input)
            .await
            .inspect_err(|e| {
                warn!(customer_id = %customer_id, error = %e, "address creation rejected");
            })?;

        let address = Address {
            customer_id,
            ..created
        };
        if self.inner.store.push_address(address.clone()).is_none() {
            warn!(customer_id = %customer_id, "owner vanished before address could be attached");
        }
        info!(customer_id = %customer_id, address_id = %address.id, "created address");
        Ok(address)
    }

    pub async fn update_address(
        &self,
        id: AddressId,
        input: AddressInput,
    ) -> Result<Address, CoreError> {
        validate::address(&input)?;
        let owner = self.require_owner(id)?;
        let _busy = self.inner.busy.acquire(BusyKey::Address(id))?;

        let updated = self
            .inner
            .remote
            .update_address(id, &input)
            .await
            .inspect_err(|e| {
                warn!(address_id = %id, error = %e, "address update rejected");
            })?;

        let address = Address {
            id,
            customer_id: owner,
            ..updated
        };
        self.inner.store.replace_address(address.clone());
        info!(address_id = %id, customer_id = %owner, "updated address");
        Ok(address)
    }

    /// Delete an address. An address the service no longer knows is
    /// pruned locally and counts as deleted.
    pub async fn delete_address(&self, id: AddressId) -> Result<(), CoreError> {
        let owner = self.require_owner(id)?;
        let _busy = self.inner.busy.acquire(BusyKey::Address(id))?;

        match self.inner.remote.delete_address(id).await {
            Ok(()) => {
                self.inner.store.remove_address(id);
                info!(address_id = %id, customer_id = %owner, "deleted address");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                self.inner.store.remove_address(id);
                info!(address_id = %id, "address already deleted upstream");
                Ok(())
            }
            Err(e) => {
                warn!(address_id = %id, error = %e, "address deletion failed");
                Err(e)
            }
        }
    }

    // ── In-flight state ──────────────────────────────────────────────

    pub fn is_busy(&self, key: impl Into<BusyKey>) -> bool {
        self.inner.busy.contains(key.into())
    }

    /// Every entity with a mutation currently outstanding.
    pub fn busy_keys(&self) -> Vec<BusyKey> {
        self.inner.busy.keys()
    }

    // ── Command dispatch ─────────────────────────────────────────────

    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(?cmd, "executing command");
        match cmd {
            Command::Load => self.load().await.map(|count| CommandResult::Loaded { count }),
            Command::RefreshCustomer { id } => {
                self.refresh_customer(id).await.map(CommandResult::Customer)
            }
            Command::CreateCustomer(input) => self
                .create_customer(input)
                .await
                .map(CommandResult::CustomerCreated),
            Command::UpdateCustomer { id, input } => self
                .update_customer(id, input)
                .await
                .map(CommandResult::Customer),
            Command::RequestDelete { id } => self
                .request_delete(id)
                .map(|()| CommandResult::DeletionPending(id)),
            Command::ConfirmDelete => self.confirm_delete().await.map(CommandResult::Deletion),
            Command::CancelDelete => self.cancel_delete().map(CommandResult::DeletionCancelled),
            Command::CreateAddress { customer_id, input } => self
                .create_address(customer_id, input)
                .await
                .map(CommandResult::Address),
            Command::UpdateAddress { id, input } => self
                .update_address(id, input)
                .await
                .map(CommandResult::Address),
            Command::DeleteAddress { id } => self
                .delete_address(id)
                .await
                .map(|()| CommandResult::AddressDeleted(id)),
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn enrich(&self, mut customer: Customer) -> Customer {
        customer.orders = self.inner.orders.orders_for(customer.id);
        customer
    }

    fn require_customer(&self, id: CustomerId) -> Result<Arc<Customer>, CoreError> {
        self.inner
            .store
            .customer(id)
            .ok_or_else(|| CoreError::customer_not_found(id))
    }

    fn require_owner(&self, id: AddressId) -> Result<CustomerId, CoreError> {
        self.inner
            .store
            .customer_by_address(id)
            .map(|c| c.id)
            .ok_or_else(|| CoreError::address_not_found(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::deletion::DeletionError;
    use crate::orders::NoOrders;
    use crate::remote::MockCustomerRemote;
    use crate::testing::{FakeRemote, address, customer};
    use pretty_assertions::assert_eq;

    fn valid_input() -> CustomerInput {
        CustomerInput {
            first_name: "Kavya".into(),
            last_name: "Reddy".into(),
            phone_number: "9988776655".into(),
        }
    }

    fn valid_address() -> AddressInput {
        AddressInput {
            address_details: "7 Banjara Hills".into(),
            city: "Hyderabad".into(),
            state: "Telangana".into(),
            pin_code: "500034".into(),
        }
    }

    fn with_fake(fake: &Arc<FakeRemote>) -> Coordinator {
        Coordinator::new(fake.clone(), Arc::new(NoOrders))
    }

    // ── Validation never reaches the network ─────────────────────────

    #[tokio::test]
    async fn short_phone_is_rejected_before_any_remote_call() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_create_customer().never();
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        let err = coordinator
            .create_customer(CustomerInput {
                phone_number: "12345".into(),
                ..valid_input()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(err.field(), Some("phone_number"));
    }

    #[tokio::test]
    async fn invalid_address_is_rejected_before_any_remote_call() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_create_address().never();
        remote.expect_update_address().never();
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        let bad = AddressInput {
            pin_code: "12".into(),
            ..valid_address()
        };
        assert!(matches!(
            coordinator.create_address(CustomerId(1), bad.clone()).await,
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            coordinator.update_address(AddressId(1), bad).await,
            Err(CoreError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_targets_fail_without_remote_calls() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_update_customer().never();
        remote.expect_delete_address().never();
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        assert!(
            coordinator
                .update_customer(CustomerId(404), valid_input())
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            coordinator
                .delete_address(AddressId(404))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    // ── Loading ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn failed_load_leaves_store_empty() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_list_customers().times(1).returning(|| {
            Err(CoreError::ConnectionFailed {
                url: "http://localhost:5000/api/".into(),
                reason: "connection refused".into(),
            })
        });
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        assert!(coordinator.load().await.is_err());
        assert!(coordinator.store().is_empty());
        assert!(coordinator.store().last_full_refresh().is_none());
    }

    #[tokio::test]
    async fn load_attaches_orders() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![]), customer(2, vec![])]);
        let coordinator = Coordinator::new(
            fake.clone(),
            Arc::new(SyntheticOrders::new()),
        );
        assert_eq!(coordinator.load().await.unwrap(), 2);
        let first = coordinator.store().customer(CustomerId(1)).unwrap();
        assert_eq!(first.orders.len(), 6);
    }

    // ── Customer mutations ───────────────────────────────────────────

    #[tokio::test]
    async fn create_appends_with_server_id() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        fake.set_next_id(77);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        let id = coordinator
            .create_customer(CustomerInput {
                first_name: "  Kavya ".into(),
                ..valid_input()
            })
            .await
            .unwrap();
        assert_eq!(id, CustomerId(77));

        let ids: Vec<_> = coordinator.store().snapshot().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CustomerId(1), CustomerId(77)]);
        assert_eq!(
            coordinator.store().customer(id).unwrap().first_name,
            "Kavya"
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_record_untouched() {
        let fake = FakeRemote::with_customers(vec![
            customer(1, vec![address(10, 1)]),
            customer(2, vec![]),
        ]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();
        let before = coordinator.store().customer(CustomerId(1)).unwrap();
        let version = coordinator.store().version();

        fake.fail_next(CoreError::Remote {
            message: "Phone number already exists".into(),
            field: Some("phone_number".into()),
            status: Some(409),
        });
        let err = coordinator
            .update_customer(CustomerId(1), valid_input())
            .await
            .unwrap_err();

        assert_eq!(err.field(), Some("phone_number"));
        assert_eq!(*coordinator.store().customer(CustomerId(1)).unwrap(), *before);
        assert_eq!(coordinator.store().version(), version);
        assert!(!coordinator.is_busy(CustomerId(1)));
    }

    #[tokio::test]
    async fn update_replaces_in_place_and_keeps_addresses() {
        let fake = FakeRemote::with_customers(vec![
            customer(1, vec![]),
            customer(2, vec![address(20, 2)]),
            customer(3, vec![]),
        ]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        let updated = coordinator
            .update_customer(CustomerId(2), valid_input())
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Reddy");
        assert_eq!(updated.address_count(), 1);

        let ids: Vec<_> = coordinator.store().snapshot().iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    // ── Busy tracking ────────────────────────────────────────────────

    #[tokio::test]
    async fn second_update_while_in_flight_is_refused() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        let gate = fake.hold();
        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.update_customer(CustomerId(1), valid_input()).await }
        });
        gate.entered().await;

        assert!(coordinator.is_busy(CustomerId(1)));
        assert_eq!(coordinator.busy_keys(), vec![BusyKey::Customer(CustomerId(1))]);
        let second = coordinator.update_customer(CustomerId(1), valid_input()).await;
        assert!(matches!(second, Err(CoreError::Busy { .. })));

        gate.release();
        first.await.unwrap().unwrap();
        assert!(coordinator.busy_keys().is_empty());
        assert_eq!(fake.calls("update_customer"), 1);
    }

    #[tokio::test]
    async fn update_keeps_address_added_while_in_flight() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![address(10, 1)])]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        let gate = fake.hold();
        let pending = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.update_customer(CustomerId(1), valid_input()).await }
        });
        gate.entered().await;
        coordinator.store().push_address(address(11, 1));

        gate.release();
        let updated = pending.await.unwrap().unwrap();
        assert_eq!(updated.last_name, "Reddy");
        let ids: Vec<_> = updated.addresses.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(*coordinator.store().customer(CustomerId(1)).unwrap(), *updated);
    }

    // ── Deletion ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn confirm_requires_a_request() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_delete_customer().never();
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        let err = coordinator.confirm_delete().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::DeletionRejected(DeletionError::NothingPending)
        ));
    }

    #[tokio::test]
    async fn cancel_makes_no_remote_call() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_delete_customer().never();
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        coordinator.request_delete(CustomerId(3)).unwrap();
        assert_eq!(coordinator.cancel_delete().unwrap(), CustomerId(3));
        assert!(coordinator.deletion_state().is_idle());
    }

    #[tokio::test]
    async fn double_request_keeps_first_target() {
        let coordinator = with_fake(&FakeRemote::with_customers(vec![]));
        coordinator.request_delete(CustomerId(1)).unwrap();
        assert!(coordinator.request_delete(CustomerId(2)).is_err());
        assert_eq!(
            coordinator.deletion_state(),
            DeletionState::PendingConfirmation(CustomerId(1))
        );
    }

    #[tokio::test]
    async fn confirmed_delete_removes_customer_and_addresses() {
        let fake = FakeRemote::with_customers(vec![
            customer(1, vec![address(10, 1), address(11, 1)]),
            customer(2, vec![]),
        ]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        coordinator.request_delete(CustomerId(1)).unwrap();
        let outcome = coordinator.confirm_delete().await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(CustomerId(1)));
        assert!(coordinator.store().customer(CustomerId(1)).is_none());
        assert!(coordinator.store().address(AddressId(10)).is_none());
        assert!(coordinator.deletion_state().is_idle());
    }

    #[tokio::test]
    async fn failed_delete_keeps_record_and_returns_to_idle() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        fake.fail_next(CoreError::Remote {
            message: "boom".into(),
            field: None,
            status: Some(500),
        });
        coordinator.request_delete(CustomerId(1)).unwrap();
        assert!(coordinator.confirm_delete().await.is_err());
        assert!(coordinator.store().customer(CustomerId(1)).is_some());
        assert!(coordinator.deletion_state().is_idle());

        // The user can retry.
        coordinator.request_delete(CustomerId(1)).unwrap();
        assert_eq!(
            coordinator.confirm_delete().await.unwrap(),
            DeleteOutcome::Deleted(CustomerId(1))
        );
    }

    #[tokio::test]
    async fn remote_404_resolves_and_prunes() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        fake.fail_next(CoreError::customer_not_found(1));
        coordinator.request_delete(CustomerId(1)).unwrap();
        assert_eq!(
            coordinator.confirm_delete().await.unwrap(),
            DeleteOutcome::AlreadyResolved(CustomerId(1))
        );
        assert!(coordinator.store().is_empty());
        assert_eq!(fake.calls("delete_customer"), 1);
    }

    #[tokio::test]
    async fn locally_missing_target_resolves_without_remote_call() {
        let mut remote = MockCustomerRemote::new();
        remote.expect_delete_customer().never();
        let coordinator = Coordinator::new(Arc::new(remote), Arc::new(NoOrders));

        coordinator.request_delete(CustomerId(9)).unwrap();
        assert_eq!(
            coordinator.confirm_delete().await.unwrap(),
            DeleteOutcome::AlreadyResolved(CustomerId(9))
        );
        assert!(coordinator.deletion_state().is_idle());
    }

    #[tokio::test]
    async fn delete_state_is_in_flight_while_remote_call_runs() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();
        coordinator.request_delete(CustomerId(1)).unwrap();

        let gate = fake.hold();
        let pending = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.confirm_delete().await }
        });
        gate.entered().await;

        assert_eq!(
            coordinator.deletion_state(),
            DeletionState::InFlight(CustomerId(1))
        );
        assert!(coordinator.is_busy(CustomerId(1)));
        assert!(matches!(
            coordinator.confirm_delete().await,
            Err(CoreError::DeletionRejected(DeletionError::InFlight(_)))
        ));

        gate.release();
        pending.await.unwrap().unwrap();
        assert!(coordinator.deletion_state().is_idle());
        assert_eq!(fake.calls("delete_customer"), 1);
    }

    // ── Addresses ────────────────────────────────────────────────────

    #[tokio::test]
    async fn address_lifecycle_preserves_sibling_order() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![address(10, 1), address(11, 1)])]);
        fake.set_next_id(12);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        let created = coordinator
            .create_address(CustomerId(1), valid_address())
            .await
            .unwrap();
        assert_eq!(created.id, AddressId(12));
        assert_eq!(created.customer_id, CustomerId(1));

        let updated = coordinator
            .update_address(
                AddressId(10),
                AddressInput {
                    city: "Secunderabad".into(),
                    ..valid_address()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.city, "Secunderabad");

        coordinator.delete_address(AddressId(11)).await.unwrap();

        let owner = coordinator.store().customer(CustomerId(1)).unwrap();
        let ids: Vec<_> = owner.addresses.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(owner.primary_address().unwrap().city, "Secunderabad");
    }

    #[tokio::test]
    async fn address_creation_waits_for_owner_mutation() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        let coordinator = with_fake(&fake);
        coordinator.load().await.unwrap();

        let gate = fake.hold();
        let update = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.update_customer(CustomerId(1), valid_input()).await }
        });
        gate.entered().await;

        let err = coordinator
            .create_address(CustomerId(1), valid_address())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Busy { .. }));

        gate.release();
        update.await.unwrap().unwrap();
        assert_eq!(fake.calls("create_address"), 0);
    }

    // ── Command dispatch ─────────────────────────────────────────────

    #[tokio::test]
    async fn execute_routes_commands() {
        let fake = FakeRemote::with_customers(vec![customer(1, vec![])]);
        let coordinator = with_fake(&fake);

        let loaded = coordinator.execute(Command::Load).await.unwrap();
        assert!(matches!(loaded, CommandResult::Loaded { count: 1 }));

        let pending = coordinator
            .execute(Command::RequestDelete { id: CustomerId(1) })
            .await
            .unwrap();
        assert!(matches!(pending, CommandResult::DeletionPending(CustomerId(1))));

        let done = coordinator.execute(Command::ConfirmDelete).await.unwrap();
        assert!(matches!(
            done,
            CommandResult::Deletion(DeleteOutcome::Deleted(CustomerId(1)))
        ));
    }
}
