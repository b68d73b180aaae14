//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for the table view, profiles sorted by name.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt(label: &str, default: String, accept_default: bool) -> Result<String, CliError> {
    if accept_default {
        return Ok(default);
    }
    Input::new()
        .with_prompt(label)
        .default(default)
        .interact_text()
        .map_err(prompt_err)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            output::status("clientele configuration", global.quiet);
            output::status(
                &format!("   Config path: {}\n", config_path.display()),
                global.quiet,
            );

            let profile_name = prompt(
                "Profile name",
                global.profile.clone().unwrap_or_else(|| "default".into()),
                global.yes,
            )?;
            let api_url = prompt(
                "Service API URL",
                global
                    .api_url
                    .clone()
                    .unwrap_or_else(|| clientele_config::DEFAULT_API_URL.into()),
                global.yes,
            )?;
            config::parse_api_url(&api_url)?;

            // Existing profiles are kept; the new one becomes the default.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url,
                    timeout: global.timeout,
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            let written = config::save_config(&cfg)?;
            output::status(
                &format!("Configuration written to {}", written.display()),
                global.quiet,
            );
            output::status(&format!("  Active profile: {profile_name}"), global.quiet);
            output::status("\n  Test it: clientele customers list", global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                config::active_profile_name(global, c)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
