//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use clientele_config::ConfigError;
use clientele_core::{CoreError, Operation};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the customer service at {url}")]
    #[diagnostic(
        code(clientele::connection_failed),
        help(
            "Check that the service is running and reachable.\n\
             Reason: {reason}\n\
             Override the URL with --api-url or set it in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("The customer service did not respond in time")]
    #[diagnostic(
        code(clientele::timeout),
        help("Increase the timeout with --timeout or check the service's health.")
    )]
    Timeout,

    // ── Records ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(clientele::not_found),
        help("Run: clientele {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(clientele::busy),
        help("Another change to {key} is still in flight. Retry once it completes.")
    )]
    Busy { key: String, message: String },

    #[error("{message}")]
    #[diagnostic(code(clientele::deletion))]
    Deletion { message: String },

    // ── Service ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(clientele::rejected))]
    Rejected {
        message: String,
        #[help]
        field: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clientele::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(clientele::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: clientele config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(clientele::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(clientele::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(clientele::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Busy { .. } | Self::Deletion { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a core failure using the wording of the operation that
    /// produced it.
    pub fn from_core(err: CoreError, op: Operation) -> Self {
        let message = err.user_message_for(op);
        match err {
            CoreError::Remote { field, .. } => Self::Rejected {
                message,
                field: field.map(|f| format!("Rejected field: {f}")),
            },
            CoreError::Internal(_) => Self::Internal(message),
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.user_message();
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::Timeout => Self::Timeout,

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: list_command_for(entity_type).into(),
                resource_type: entity_type.into(),
                identifier,
            },

            CoreError::Busy { key } => Self::Busy {
                key: key.to_string(),
                message,
            },

            CoreError::DeletionRejected(_) => Self::Deletion { message },

            CoreError::Validation { errors } => Self::Validation {
                field: errors
                    .first()
                    .map_or_else(|| "input".into(), |e| e.field.to_owned()),
                reason: message,
            },

            CoreError::Remote { field, .. } => Self::Rejected {
                message,
                field: field.map(|f| format!("Rejected field: {f}")),
            },

            CoreError::Internal(detail) => Self::Internal(detail),
        }
    }
}

fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type {
        "Address" => "customers get <customer>",
        _ => "customers list",
    }
}
