//! CLI configuration: thin wrapper around `fwctl_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --insecure, --timeout).

use std::time::Duration;

use fwctl_core::{ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fwctl_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Resolved profile plus the runtime config derived from it.
pub struct Resolved {
    pub profile_name: String,
    /// `None` when running purely from `--server`.
    pub profile: Option<Profile>,
    pub console: ConsoleConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI overrides.
///
/// Flags beat the profile, the profile beats `[defaults]`. Without a
/// matching profile `--server` alone is enough.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name).cloned();

    // An explicitly requested profile must exist.
    if profile.is_none() && global.profile.is_some() && global.server.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    let mut console = match (&profile, &global.server) {
        (Some(profile), server) => {
            let mut profile = profile.clone();
            if let Some(server) = server {
                profile.server.clone_from(server);
            }
            fwctl_config::profile_to_console_config(&profile, &profile_name, &cfg.defaults)?
        }
        (None, Some(server)) => {
            let adhoc = Profile {
                server: server.clone(),
                ..Profile::default()
            };
            fwctl_config::profile_to_console_config(&adhoc, &profile_name, &cfg.defaults)?
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if global.insecure {
        console.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        console.timeout = Duration::from_secs(secs);
    }

    Ok(Resolved {
        profile_name,
        profile,
        console,
    })
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
