// ── Command API ──
//
// Message-style entry point for view adapters. Every variant maps onto
// one coordinator operation, so validation, busy tracking and the
// deletion protocol apply exactly as for the direct methods.

use std::sync::Arc;

use crate::coordinator::DeleteOutcome;
use crate::error::Operation;
use crate::model::{Address, AddressId, AddressInput, Customer, CustomerId, CustomerInput};

/// All operations a view adapter can ask the coordinator for.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Fetching ─────────────────────────────────────────────────────
    Load,
    RefreshCustomer {
        id: CustomerId,
    },

    // ── Customer CRUD ────────────────────────────────────────────────
    CreateCustomer(CustomerInput),
    UpdateCustomer {
        id: CustomerId,
        input: CustomerInput,
    },

    // ── Deletion protocol ────────────────────────────────────────────
    RequestDelete {
        id: CustomerId,
    },
    ConfirmDelete,
    CancelDelete,

    // ── Address CRUD ─────────────────────────────────────────────────
    CreateAddress {
        customer_id: CustomerId,
        input: AddressInput,
    },
    UpdateAddress {
        id: AddressId,
        input: AddressInput,
    },
    DeleteAddress {
        id: AddressId,
    },
}

impl Command {
    /// The operation whose failure wording applies to this command.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Load | Self::RefreshCustomer { .. } => Operation::Load,
            Self::CreateCustomer(_) => Operation::CreateCustomer,
            Self::UpdateCustomer { .. } => Operation::UpdateCustomer,
            Self::RequestDelete { .. } | Self::ConfirmDelete | Self::CancelDelete => {
                Operation::DeleteCustomer
            }
            Self::CreateAddress { .. } => Operation::CreateAddress,
            Self::UpdateAddress { .. } => Operation::UpdateAddress,
            Self::DeleteAddress { .. } => Operation::DeleteAddress,
        }
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Loaded { count: usize },
    Customer(Arc<Customer>),
    CustomerCreated(CustomerId),
    Address(Address),
    AddressDeleted(AddressId),
    DeletionPending(CustomerId),
    DeletionCancelled(CustomerId),
    Deletion(DeleteOutcome),
}
