//! CLI configuration: thin wrapper around `clientele_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--profile`, `--api-url`, `--timeout`).

use std::time::Duration;

use clientele_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use clientele_config::{
    Config, Profile, config_path, load_config, load_config_or_default, parse_api_url,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build the core's runtime configuration from the config file, the
/// active profile, and CLI overrides.
///
/// `--api-url` alone is enough to run without any profile.
pub fn resolve_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    // 1. API URL (flag > env > profile)
    let url_str = match (global.api_url.as_deref(), profile) {
        (Some(url), _) => url,
        (None, Some(p)) => p.api_url.as_str(),
        (None, None) => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
    };
    let url = parse_api_url(url_str)?;

    // 2. Timeout (flag > profile > defaults)
    let secs = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    Ok(ConsoleConfig::new(url).with_timeout(Duration::from_secs(secs)))
}
