//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with stored secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut masked = cfg.clone();
    for profile in masked.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    masked
}

/// Human-readable TOML-ish view of the (already redacted) config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "token_ttl_hours = {}", cfg.defaults.token_ttl_hours);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref prefix) = p.api_prefix {
            let _ = writeln!(out, "api_prefix = \"{prefix}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if let Some(ref pw) = p.password {
            let _ = writeln!(out, "password = \"{pw}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ttl) = p.token_ttl_hours {
            let _ = writeln!(out, "token_ttl_hours = {ttl}");
        }
        if let Some(ref file) = p.session_file {
            let _ = writeln!(out, "session_file = \"{}\"", file.display());
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into `CliError`.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer the keyring for the password, falling back to plaintext config.
///
/// Returns `Some(password)` when the user picked plaintext.
fn prompt_password_storage(profile_name: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        fwctl_config::store_password(profile_name, &SecretString::from(password))?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init_wizard(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fwctl config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if *name == active { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let available: Vec<_> = cfg.profiles.keys().cloned().collect();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

fn init_wizard() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("fwctl configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Backend URL")
        .default("http://localhost:8080".into())
        .validate_with(|raw: &String| {
            fwctl_config::parse_server_url(raw)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .default("admin".into())
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Password (empty to skip): ").map_err(prompt_err)?;
    let password = if password.is_empty() {
        None
    } else {
        prompt_password_storage(&profile_name, password)?
    };

    let insecure = Confirm::new()
        .with_prompt("Skip TLS certificate verification?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        server,
        username: Some(username),
        password,
        insecure: insecure.then_some(true),
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    let written = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", written.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Next: fwctl -p {profile_name} login");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.default_profile = Some("lab".into());
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                server: "https://fw.lab:8443".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn show_masks_plaintext_passwords() {
        let masked = redacted(&sample());
        let text = format_config(&masked);
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn redaction_leaves_missing_passwords_alone() {
        let mut cfg = sample();
        cfg.profiles.get_mut("lab").unwrap().password = None;
        assert!(redacted(&cfg).profiles["lab"].password.is_none());
    }
}
