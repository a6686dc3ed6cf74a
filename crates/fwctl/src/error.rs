//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fwctl_config::ConfigError;
use fwctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the firewall backend: {reason}")]
    #[diagnostic(
        code(fwctl::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Try: fwctl status --insecure"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(fwctl::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────

    #[error("Not logged in")]
    #[diagnostic(code(fwctl::not_logged_in), help("Run: fwctl login"))]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fwctl::auth_failed),
        help("Log in again with: fwctl login --profile {profile}")
    )]
    AuthFailed { message: String, profile: String },

    #[error("Permission '{permission}' is required for this command")]
    #[diagnostic(
        code(fwctl::permission_denied),
        help("Ask an administrator to grant the permission, or log in as an admin.")
    )]
    PermissionDenied { permission: String },

    #[error("Session storage error: {message}")]
    #[diagnostic(
        code(fwctl::session_storage),
        help("Remove the session file and log in again.")
    )]
    SessionStorage { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(fwctl::not_found))]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(fwctl::api_error))]
    Api { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fwctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fwctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fwctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(fwctl::no_config),
        help(
            "Create a profile with: fwctl config init\n\
             Or pass --server / set FWCTL_SERVER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fwctl::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fwctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────

    #[error("{0}")]
    #[diagnostic(code(fwctl::internal))]
    Internal(String),

    // ── Already shown ────────────────────────────────────────────────

    /// A backend failure the API client has already put in front of the
    /// user through the notifier. Only its exit code and help remain.
    #[error(transparent)]
    Reported(Box<CliError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(fwctl::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Reported(inner) => inner.exit_code(),
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Api {
                status: Some(401), ..
            } => exit_code::AUTH,
            Self::Api {
                status: Some(403), ..
            } => exit_code::PERMISSION,
            Self::Api {
                status: Some(408 | 504),
                ..
            } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Text printed when the process exits with this error.
    ///
    /// Failures the notifier already showed keep only their help line so
    /// the message itself appears once.
    pub fn report(self) -> String {
        match self {
            Self::Reported(inner) => {
                let help = inner.help().map(|h| format!("  help: {h}"));
                help.unwrap_or_default()
            }
            other => format!("{:?}", miette::Report::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },
            CoreError::NotLoggedIn => CliError::NotLoggedIn,
            CoreError::PermissionDenied { permission } => {
                CliError::PermissionDenied { permission }
            }
            CoreError::Storage { message } => CliError::SessionStorage { message },
            CoreError::NotFound { message } => CliError::NotFound { message },
            CoreError::Api { message, status } => CliError::Api { message, status },
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

/// Transport errors surface through core's mapping; timeouts keep their
/// own exit code. Every `fwctl_api::Error` returned by a request has
/// already been notified, so the result is wrapped in `Reported`.
impl From<fwctl_api::Error> for CliError {
    fn from(err: fwctl_api::Error) -> Self {
        let timed_out = matches!(
            &err,
            fwctl_api::Error::NoResponse { source, .. } if source.is_timeout()
        );
        let mapped = if timed_out {
            CliError::Timeout
        } else {
            CoreError::from(err).into()
        };
        CliError::Reported(Box::new(mapped))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::NotLoggedIn.exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::from(CoreError::PermissionDenied {
                permission: "rules:write".into()
            })
            .exit_code(),
            exit_code::PERMISSION
        );
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                reason: "network connection timeout".into()
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::Api {
                message: "gateway timeout".into(),
                status: Some(504)
            }
            .exit_code(),
            exit_code::TIMEOUT
        );
        assert_eq!(
            CliError::Api {
                message: "bad gateway".into(),
                status: Some(502)
            }
            .exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn not_found_transport_errors_map_to_not_found() {
        let err = CliError::from(fwctl_api::Error::Http {
            status: 404,
            message: "requested resource not found".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn notified_failures_report_only_their_help() {
        let err = CliError::from(fwctl_api::Error::Http {
            status: 503,
            message: "service unavailable".into(),
        });
        assert!(matches!(err, CliError::Reported(_)));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert!(!err.report().contains("service unavailable"));
    }

    #[test]
    fn local_failures_keep_the_full_report() {
        let report = CliError::NotLoggedIn.report();
        assert!(report.contains("Not logged in"));
        assert!(report.contains("fwctl login"));
    }
}
