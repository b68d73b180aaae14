// ── Deletion confirmation state machine ──
//
// Destructive customer deletion is gated behind an explicit two-step
// request/confirm protocol. At most one deletion is pending or in
// flight system-wide, and the remote delete is only issued from
// `InFlight`.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::model::CustomerId;

/// Where the (single) customer deletion currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "customer_id", rename_all = "snake_case")]
pub enum DeletionState {
    #[default]
    Idle,
    /// The user asked to delete this customer and must confirm or cancel.
    PendingConfirmation(CustomerId),
    /// Confirmed; the remote delete is outstanding.
    InFlight(CustomerId),
}

/// A transition that is not valid from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeletionError {
    #[error("customer {0} is already awaiting delete confirmation")]
    AlreadyPending(CustomerId),

    #[error("customer {0} is already being deleted")]
    InFlight(CustomerId),

    #[error("no deletion is awaiting confirmation")]
    NothingPending,
}

impl DeletionError {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::AlreadyPending(_) => "Another deletion is awaiting confirmation.",
            Self::InFlight(_) => "A deletion is already in progress. Please wait.",
            Self::NothingPending => "There is no deletion to confirm.",
        }
    }
}

impl DeletionState {
    /// The customer this state refers to, if any.
    pub fn target(self) -> Option<CustomerId> {
        match self {
            Self::Idle => None,
            Self::PendingConfirmation(id) | Self::InFlight(id) => Some(id),
        }
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    /// `Idle -> PendingConfirmation(id)`.
    pub fn request(self, id: CustomerId) -> Result<Self, DeletionError> {
        match self {
            Self::Idle => Ok(Self::PendingConfirmation(id)),
            Self::PendingConfirmation(pending) => Err(DeletionError::AlreadyPending(pending)),
            Self::InFlight(busy) => Err(DeletionError::InFlight(busy)),
        }
    }

    /// `PendingConfirmation(id) -> InFlight(id)`.
    pub fn confirm(self) -> Result<(Self, CustomerId), DeletionError> {
        match self {
            Self::PendingConfirmation(id) => Ok((Self::InFlight(id), id)),
            Self::InFlight(busy) => Err(DeletionError::InFlight(busy)),
            Self::Idle => Err(DeletionError::NothingPending),
        }
    }

    /// `PendingConfirmation(id) -> Idle`, without any remote call.
    pub fn cancel(self) -> Result<(Self, CustomerId), DeletionError> {
        match self {
            Self::PendingConfirmation(id) => Ok((Self::Idle, id)),
            Self::InFlight(busy) => Err(DeletionError::InFlight(busy)),
            Self::Idle => Err(DeletionError::NothingPending),
        }
    }

    /// Terminal outcome of `InFlight`, success or failure alike.
    pub fn complete(self) -> Self {
        match self {
            Self::InFlight(_) => Self::Idle,
            other => other,
        }
    }
}

// ── Shared, observable machine ───────────────────────────────────────

/// The machine's state behind a `watch` channel, so views can observe it.
pub(crate) struct DeletionMachine {
    state: watch::Sender<DeletionState>,
}

impl DeletionMachine {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(DeletionState::Idle);
        Self { state }
    }

    pub(crate) fn state(&self) -> DeletionState {
        *self.state.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<DeletionState> {
        self.state.subscribe()
    }

    pub(crate) fn request(&self, id: CustomerId) -> Result<(), DeletionError> {
        self.apply(|s| s.request(id).map(|next| (next, ())))
    }

    pub(crate) fn cancel(&self) -> Result<CustomerId, DeletionError> {
        self.apply(DeletionState::cancel)
    }

    /// Move to `InFlight` and hand back a guard that returns the machine
    /// to `Idle` when dropped, whatever happens to the remote call.
    pub(crate) fn begin(&self) -> Result<InFlightGuard<'_>, DeletionError> {
        let id = self.apply(DeletionState::confirm)?;
        Ok(InFlightGuard { machine: self, id })
    }

    /// Run a transition atomically against the current state.
    fn apply<T>(
        &self,
        transition: impl FnOnce(DeletionState) -> Result<(DeletionState, T), DeletionError>,
    ) -> Result<T, DeletionError> {
        let mut outcome = Err(DeletionError::NothingPending);
        self.state.send_if_modified(|state| match transition(*state) {
            Ok((next, value)) => {
                let changed = *state != next;
                *state = next;
                outcome = Ok(value);
                changed
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }
}

/// Holds the machine in `InFlight` for one deletion.
pub(crate) struct InFlightGuard<'a> {
    machine: &'a DeletionMachine,
    id: CustomerId,
}

impl InFlightGuard<'_> {
    pub(crate) fn id(&self) -> CustomerId {
        self.id
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.machine.state.send_modify(|s| *s = s.complete());
    }
}
