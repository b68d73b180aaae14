// ── Core error types ──
//
// User-facing errors from clientele-core. Consumers never see raw HTTP
// details; the `From<clientele_api::Error>` impl translates transport
// failures into this taxonomy.

use thiserror::Error;

use crate::busy::BusyKey;
use crate::deletion::DeletionError;
use crate::validate::FieldError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local, pre-network ───────────────────────────────────────────
    #[error("Validation failed: {}", join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("{key} already has an operation in flight")]
    Busy { key: BusyKey },

    #[error("Deletion rejected: {0}")]
    DeletionRejected(#[from] DeletionError),

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("Rejected by the customer service: {message}")]
    Remote {
        message: String,
        /// Form field the server attributes the failure to.
        field: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Cannot reach the customer service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the customer service timed out")]
    Timeout,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The operation a failure belongs to, for picking a fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateAddress,
    UpdateAddress,
    DeleteAddress,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load customers.",
            Self::CreateCustomer | Self::CreateAddress => "Creation failed.",
            Self::UpdateCustomer | Self::UpdateAddress => "Update failed.",
            Self::DeleteCustomer => "Failed to delete customer. Please try again.",
            Self::DeleteAddress => "Failed to delete address.",
        }
    }
}

impl CoreError {
    pub(crate) fn customer_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Customer",
            identifier: id.to_string(),
        }
    }

    pub(crate) fn address_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Address",
            identifier: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The form field this error should be shown against, if any.
    /// For validation failures this is the first offending field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { errors } => errors.first().map(|e| e.field),
            Self::Remote { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Human-readable text for a view adapter, without operation context.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { errors } => errors
                .iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Busy { .. } => "This record is already being updated. Please wait.".into(),
            Self::DeletionRejected(reason) => reason.user_message().into(),
            Self::NotFound { entity_type, .. } => format!("{entity_type} not found."),
            Self::Remote { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Remote { .. } | Self::Internal(_) => "Operation failed.".into(),
            Self::ConnectionFailed { .. } => {
                "Cannot reach the customer service. Please try again.".into()
            }
            Self::Timeout => "The customer service did not respond in time. Please try again.".into(),
        }
    }

    /// Human-readable text for a failure of `op`.
    ///
    /// Form operations surface the server's own message when it sent
    /// one; deletes always use their fixed wording.
    pub fn user_message_for(&self, op: Operation) -> String {
        match (self, op) {
            (Self::Remote { .. } | Self::Internal(_), Operation::DeleteCustomer | Operation::DeleteAddress) => {
                op.failure_message().into()
            }
            (Self::Remote { message, .. }, _) if !message.trim().is_empty() => message.clone(),
            (Self::Remote { .. } | Self::Internal(_), _) => op.failure_message().into(),
            _ => self.user_message(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clientele_api::Error> for CoreError {
    fn from(err: clientele_api::Error) -> Self {
        match err {
            clientele_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else if err.is_not_found() {
                    CoreError::NotFound {
                        entity_type: "Resource",
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Remote {
                        message: e.to_string(),
                        field: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            clientele_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "Resource",
                identifier: message,
            },
            clientele_api::Error::Api {
                status,
                message,
                field,
            } => CoreError::Remote {
                message,
                field,
                status: Some(status),
            },
            clientele_api::Error::InvalidUrl(e) => CoreError::Internal(format!("Invalid URL: {e}")),
            clientele_api::Error::ClientBuild(msg) => {
                CoreError::Internal(format!("HTTP client setup failed: {msg}"))
            }
            clientele_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
