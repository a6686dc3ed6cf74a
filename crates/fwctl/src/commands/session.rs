//! Login, logout and identity handlers.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;

use fwctl_core::{Console, LoginForm, SessionState};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn resolve_username(args: &LoginArgs, resolved: &Resolved) -> Result<String, CliError> {
    if let Some(ref username) = args.username {
        return Ok(username.clone());
    }
    if let Some(username) = resolved
        .profile
        .as_ref()
        .and_then(|p| fwctl_config::resolve_username(p, &resolved.profile_name).ok())
    {
        return Ok(username);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "pass --username or set FWCTL_USERNAME".into(),
        });
    }
    Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)
}

fn resolve_password(args: &LoginArgs, resolved: &Resolved) -> Result<SecretString, CliError> {
    if args.password_stdin {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()));
    }
    let profile = resolved.profile.clone().unwrap_or_default();
    if let Ok(password) = fwctl_config::resolve_password(&profile, &resolved.profile_name) {
        return Ok(password);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "pass --password-stdin or set FWCTL_PASSWORD".into(),
        });
    }
    rpassword::prompt_password("Password: ")
        .map(SecretString::from)
        .map_err(prompt_err)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    console: &Console,
    resolved: &Resolved,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = resolve_username(&args, resolved)?;
    let password = resolve_password(&args, resolved)?;
    let form = LoginForm {
        username,
        password,
    };

    let outcome = console.login(&form).await;
    if !outcome.success {
        return Err(CliError::AuthFailed {
            message: outcome
                .error
                .unwrap_or_else(|| "invalid username or password".into()),
            profile: resolved.profile_name.clone(),
        });
    }

    if !global.quiet {
        eprintln!(
            "Logged in as {} (profile '{}')",
            console.session().username(),
            resolved.profile_name
        );
    }
    Ok(())
}

pub fn logout(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let was_logged_in = console.session().is_logged_in();
    console.logout();
    if !global.quiet {
        eprintln!(
            "{}",
            if was_logged_in {
                "Logged out"
            } else {
                "No active session"
            }
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct Identity {
    username: String,
    avatar: String,
    roles: Vec<String>,
    permissions: Vec<String>,
    expires_at: Option<String>,
}

impl From<&SessionState> for Identity {
    fn from(state: &SessionState) -> Self {
        Self {
            username: state.user_info.username.clone(),
            avatar: state.user_info.avatar.clone(),
            roles: state.user_info.roles.iter().cloned().collect(),
            permissions: state.user_info.permissions.iter().cloned().collect(),
            expires_at: state.expires_at.map(|t| t.to_rfc3339()),
        }
    }
}

fn identity_detail(id: &Identity) -> String {
    let mut lines = vec![
        format!("Username:     {}", id.username),
        format!("Roles:        {}", id.roles.join(", ")),
        format!("Permissions:  {}", id.permissions.join(", ")),
    ];
    if !id.avatar.is_empty() {
        lines.push(format!("Avatar:       {}", id.avatar));
    }
    if let Some(ref at) = id.expires_at {
        lines.push(format!("Expires:      {at}"));
    }
    lines.join("\n")
}

pub fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    console.require_session()?;
    let identity = Identity::from(&console.session().state());
    let out = output::render_single(global.output, &identity, identity_detail, |id| {
        id.username.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret as _;

    use super::*;

    #[test]
    fn identity_detail_skips_empty_avatar() {
        let id = Identity {
            username: "admin".into(),
            avatar: String::new(),
            roles: vec!["admin".into()],
            permissions: vec!["*".into()],
            expires_at: None,
        };
        let out = identity_detail(&id);
        assert!(out.contains("admin"));
        assert!(!out.contains("Avatar"));
        assert!(!out.contains("Expires"));
    }

    #[test]
    fn login_form_keeps_password_secret() {
        let form = LoginForm::new("admin", "admin123");
        assert!(!format!("{form:?}").contains("admin123"));
        assert_eq!(form.password.expose_secret(), "admin123");
    }
}
