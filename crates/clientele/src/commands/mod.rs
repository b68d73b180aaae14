//! Command dispatch: bridges CLI args -> coordinator operations -> output formatting.

pub mod addresses;
pub mod config_cmd;
pub mod customers;
pub mod util;

use clientele_core::Coordinator;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Customers(args) => customers::handle(coordinator, args, global).await,
        Command::Addresses(args) => addresses::handle(coordinator, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "configuration commands do not use the service".into(),
        )),
    }
}
