//! Clap derive structures for the `clientele` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clientele -- admin console for the customer records service
#[derive(Debug, Parser)]
#[command(
    name = "clientele",
    version,
    about = "Manage customers and their addresses from the command line",
    long_about = "An admin console for the customer records service.\n\n\
        Lists and filters customers locally, and routes every change through\n\
        validation and a per-record in-flight guard before it reaches the service.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "CLIENTELE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service API base URL (overrides profile)
    #[arg(long, short = 'u', env = "CLIENTELE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLIENTELE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CLIENTELE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage customers
    #[command(alias = "cust", alias = "c")]
    Customers(CustomersArgs),

    /// Manage customer addresses
    #[command(alias = "addr", alias = "a")]
    Addresses(AddressesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Parse a record id, accepting the `#12` display form.
pub fn parse_id(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    digits
        .parse()
        .map_err(|_| format!("'{raw}' is not a numeric id"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers, optionally filtered
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one customer with addresses and order history
    Get {
        /// Customer ID (`12` or `#12`)
        #[arg(value_parser = parse_id)]
        customer: i64,
    },

    /// Create a customer
    Create(CustomerFields),

    /// Update a customer's name or phone number
    Update {
        /// Customer ID
        #[arg(value_parser = parse_id)]
        customer: i64,

        #[command(flatten)]
        fields: CustomerPatch,
    },

    /// Delete a customer and all of their addresses
    #[command(alias = "rm")]
    Delete {
        /// Customer ID
        #[arg(value_parser = parse_id)]
        customer: i64,
    },
}

/// Local filter criteria; all given criteria must match.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Free-text search over id, names, phone and address fields
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Customer id equals or contains this value
    #[arg(long)]
    pub id: Option<String>,

    /// Some address's city contains this value
    #[arg(long)]
    pub city: Option<String>,

    /// Some address's state contains this value
    #[arg(long)]
    pub state: Option<String>,

    /// Some address's pin code contains this value
    #[arg(long)]
    pub pincode: Option<String>,

    /// Address count class
    #[arg(long, default_value = "all")]
    pub addresses: AddressCountArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AddressCountArg {
    /// Any number of addresses
    All,
    /// Exactly one address
    Single,
    /// More than one address
    Multiple,
}

#[derive(Debug, Args)]
pub struct CustomerFields {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// 10-digit phone number
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct CustomerPatch {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// 10-digit phone number
    #[arg(long)]
    pub phone: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADDRESSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressesCommand,
}

#[derive(Debug, Subcommand)]
pub enum AddressesCommand {
    /// Add an address to a customer
    Add {
        /// Owning customer ID
        #[arg(value_parser = parse_id)]
        customer: i64,

        #[command(flatten)]
        fields: AddressFields,
    },

    /// Update an address
    Update {
        /// Address ID
        #[arg(value_parser = parse_id)]
        address: i64,

        #[command(flatten)]
        fields: AddressPatch,
    },

    /// Delete an address
    #[command(alias = "rm")]
    Delete {
        /// Address ID
        #[arg(value_parser = parse_id)]
        address: i64,
    },
}

#[derive(Debug, Args)]
pub struct AddressFields {
    /// Street address
    #[arg(long)]
    pub details: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    /// 6-digit pin code
    #[arg(long)]
    pub pincode: String,
}

#[derive(Debug, Args)]
pub struct AddressPatch {
    /// Street address
    #[arg(long)]
    pub details: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    /// 6-digit pin code
    #[arg(long)]
    pub pincode: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup (`--yes` accepts defaults)
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
