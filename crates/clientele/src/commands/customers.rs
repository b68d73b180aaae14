//! Customer command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use clientele_core::{
    AddressCountFilter, Coordinator, CoreError, Customer, CustomerId, CustomerInput,
    DeleteOutcome, FilterCriteria, Operation, Order,
};

use crate::cli::{AddressCountArg, CustomersArgs, CustomersCommand, GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Addresses")]
    addresses: usize,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Arc<Customer>> for CustomerRow {
    fn from(c: &Arc<Customer>) -> Self {
        let primary = c.primary_address();
        Self {
            id: format!("#{}", c.id),
            name: c.full_name(),
            phone: c.phone_number.clone(),
            addresses: c.address_count(),
            city: primary.map(|a| a.city.clone()).unwrap_or_default(),
            state: primary.map(|a| a.state.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Address")]
    details: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Pin")]
    pin_code: String,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Order")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Offer")]
    offer: String,
    #[tabled(rename = "Items")]
    items: u32,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Final")]
    final_amount: String,
}

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            id: format!("#{}", o.id),
            date: o.order_date.format("%d/%m/%Y").to_string(),
            status: o.status.to_string(),
            payment: o.payment_method.to_string(),
            offer: o.offer_type.to_string(),
            items: o.items_count,
            total: format!("₹{:.2}", o.total_amount),
            discount: format!("₹{:.2}", o.discount_applied),
            final_amount: format!("₹{:.2}", o.final_amount),
        }
    }
}

fn detail(c: &Arc<Customer>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:         #{}", c.id);
    let _ = writeln!(out, "Name:       {}", c.full_name());
    let _ = writeln!(out, "Phone:      {}", c.phone_number);
    let _ = writeln!(out, "Addresses:  {}", c.address_count());

    if !c.addresses.is_empty() {
        let rows: Vec<AddressRow> = c
            .addresses
            .iter()
            .map(|a| AddressRow {
                id: format!("#{}", a.id),
                details: a.address_details.clone(),
                city: a.city.clone(),
                state: a.state.clone(),
                pin_code: a.pin_code.clone(),
            })
            .collect();
        let _ = writeln!(out, "\n{}", output::render_table(&rows));
    }

    if !c.orders.is_empty() {
        let rows: Vec<OrderRow> = c.orders.iter().map(OrderRow::from).collect();
        let _ = write!(out, "\nOrder history\n{}", output::render_table(&rows));
    }

    out.trim_end().to_owned()
}

// ── Filter translation ──────────────────────────────────────────────

fn criteria(args: ListArgs) -> FilterCriteria {
    FilterCriteria {
        search: args.search.unwrap_or_default(),
        id: args.id.unwrap_or_default(),
        city: args.city.unwrap_or_default(),
        state: args.state.unwrap_or_default(),
        pin_code: args.pincode.unwrap_or_default(),
        address_count: match args.addresses {
            AddressCountArg::All => AddressCountFilter::All,
            AddressCountArg::Single => AddressCountFilter::Single,
            AddressCountArg::Multiple => AddressCountFilter::Multiple,
        },
    }
}

fn filter_summary(criteria: &FilterCriteria, shown: usize, total: usize) -> String {
    let active: Vec<String> = criteria
        .active_filters()
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    format!(
        "{shown} of {total} customers match ({})",
        active.join(", ")
    )
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    coordinator: &Coordinator,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List(list) => {
            coordinator
                .load()
                .await
                .map_err(|e| CliError::from_core(e, Operation::Load))?;

            let criteria = criteria(list);
            let store = coordinator.store();
            let shown = store.filtered(&criteria);
            if !criteria.is_empty() {
                output::status(&filter_summary(&criteria, shown.len(), store.len()), global.quiet);
            }

            let out = output::render_list(
                &global.output,
                &shown,
                |c| CustomerRow::from(c),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Get { customer } => {
            let found = coordinator
                .refresh_customer(CustomerId(customer))
                .await
                .map_err(|e| CliError::from_core(e, Operation::Load))?;
            let out = output::render_single(&global.output, &found, detail, |c| c.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Create(fields) => {
            let input = CustomerInput {
                first_name: fields.first_name,
                last_name: fields.last_name,
                phone_number: fields.phone,
            };
            let id = coordinator
                .create_customer(input)
                .await
                .map_err(|e| CliError::from_core(e, Operation::CreateCustomer))?;

            output::status(&format!("Customer #{id} created"), global.quiet);
            if let Some(created) = coordinator.store().customer(id) {
                let out =
                    output::render_single(&global.output, &created, detail, |c| c.id.to_string())?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        CustomersCommand::Update { customer, fields } => {
            let id = CustomerId(customer);
            util::require_changes(
                fields.first_name.is_some() || fields.last_name.is_some() || fields.phone.is_some(),
                "customer",
            )?;
            coordinator
                .load()
                .await
                .map_err(|e| CliError::from_core(e, Operation::Load))?;
            let current = coordinator
                .store()
                .customer(id)
                .ok_or_else(|| customer_not_found(id))?;

            let mut input = CustomerInput::from(current.as_ref());
            util::patch(&mut input.first_name, fields.first_name);
            util::patch(&mut input.last_name, fields.last_name);
            util::patch(&mut input.phone_number, fields.phone);

            let updated = coordinator
                .update_customer(id, input)
                .await
                .map_err(|e| CliError::from_core(e, Operation::UpdateCustomer))?;

            output::status(&format!("Customer #{id} updated"), global.quiet);
            let out = output::render_single(&global.output, &updated, detail, |c| c.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Delete { customer } => {
            let id = CustomerId(customer);
            coordinator
                .load()
                .await
                .map_err(|e| CliError::from_core(e, Operation::Load))?;
            let target = coordinator
                .store()
                .customer(id)
                .ok_or_else(|| customer_not_found(id))?;

            delete(coordinator, &target, global).await
        }
    }
}

/// Two-step deletion: arm the confirmation, ask, then confirm or cancel.
async fn delete(
    coordinator: &Coordinator,
    target: &Customer,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = target.id;
    coordinator.request_delete(id)?;

    let prompt = format!(
        "Delete customer #{id} ({}) and their {} address(es)? This cannot be undone.",
        target.full_name(),
        target.address_count()
    );
    let approved = match util::confirm(&prompt, "customers delete", global.yes) {
        Ok(approved) => approved,
        Err(err) => {
            coordinator.cancel_delete()?;
            return Err(err);
        }
    };

    if !approved {
        coordinator.cancel_delete()?;
        output::status("Deletion cancelled", global.quiet);
        return Ok(());
    }

    let outcome = coordinator
        .confirm_delete()
        .await
        .map_err(|e| CliError::from_core(e, Operation::DeleteCustomer))?;
    let message = match outcome {
        DeleteOutcome::Deleted(id) => format!("Customer #{id} deleted"),
        DeleteOutcome::AlreadyResolved(id) => format!("Customer #{id} was already deleted"),
    };
    output::status(&message, global.quiet);

    let out = output::render_single(&global.output, &outcome, |_| String::new(), |o| {
        o.customer_id().to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn customer_not_found(id: CustomerId) -> CliError {
    CoreError::NotFound {
        entity_type: "Customer",
        identifier: id.to_string(),
    }
    .into()
}
