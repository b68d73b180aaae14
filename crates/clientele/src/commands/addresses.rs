//! Address command handlers.

use clientele_core::{
    Address, AddressId, AddressInput, Coordinator, CoreError, CustomerId, Operation,
};

use crate::cli::{AddressesArgs, AddressesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(a: &Address) -> String {
    [
        format!("ID:         #{}", a.id),
        format!("Customer:   #{}", a.customer_id),
        format!("Address:    {}", a.address_details),
        format!("City:       {}", a.city),
        format!("State:      {}", a.state),
        format!("Pin code:   {}", a.pin_code),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator,
    args: AddressesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Address edits resolve their owner from the loaded list.
    coordinator
        .load()
        .await
        .map_err(|e| CliError::from_core(e, Operation::Load))?;

    match args.command {
        AddressesCommand::Add { customer, fields } => {
            let input = AddressInput {
                address_details: fields.details,
                city: fields.city,
                state: fields.state,
                pin_code: fields.pincode,
            };
            let created = coordinator
                .create_address(CustomerId(customer), input)
                .await
                .map_err(|e| CliError::from_core(e, Operation::CreateAddress))?;

            output::status(
                &format!("Address #{} added to customer #{customer}", created.id),
                global.quiet,
            );
            let out = output::render_single(&global.output, &created, detail, |a| a.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AddressesCommand::Update { address, fields } => {
            let id = AddressId(address);
            util::require_changes(
                fields.details.is_some()
                    || fields.city.is_some()
                    || fields.state.is_some()
                    || fields.pincode.is_some(),
                "address",
            )?;
            let current = coordinator
                .store()
                .address(id)
                .ok_or_else(|| address_not_found(id))?;

            let mut input = AddressInput::from(&current);
            util::patch(&mut input.address_details, fields.details);
            util::patch(&mut input.city, fields.city);
            util::patch(&mut input.state, fields.state);
            util::patch(&mut input.pin_code, fields.pincode);

            let updated = coordinator
                .update_address(id, input)
                .await
                .map_err(|e| CliError::from_core(e, Operation::UpdateAddress))?;

            output::status(&format!("Address #{id} updated"), global.quiet);
            let out = output::render_single(&global.output, &updated, detail, |a| a.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AddressesCommand::Delete { address } => {
            let id = AddressId(address);
            let target = coordinator
                .store()
                .address(id)
                .ok_or_else(|| address_not_found(id))?;
            let prompt = format!(
                "Delete address #{id} ({}, {}) of customer #{}?",
                target.address_details, target.city, target.customer_id
            );
            if !util::confirm(&prompt, "addresses delete", global.yes)? {
                output::status("Deletion cancelled", global.quiet);
                return Ok(());
            }

            coordinator
                .delete_address(id)
                .await
                .map_err(|e| CliError::from_core(e, Operation::DeleteAddress))?;
            output::status(&format!("Address #{id} deleted"), global.quiet);
            Ok(())
        }
    }
}

fn address_not_found(id: AddressId) -> CliError {
    CoreError::NotFound {
        entity_type: "Address",
        identifier: id.to_string(),
    }
    .into()
}
