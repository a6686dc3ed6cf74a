// ── Core error types ──
//
// User-facing errors from fwctl-core. The `From<fwctl_api::Error>` impl
// translates transport-layer failures into domain variants; the message
// text is preserved because the user has already seen it once through
// the notifier.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach firewall backend: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Permission denied: {permission}")]
    PermissionDenied { permission: String },

    #[error("Session storage error: {message}")]
    Storage { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status or envelope code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fwctl_api::Error> for CoreError {
    fn from(err: fwctl_api::Error) -> Self {
        if err.is_auth_failure() {
            return CoreError::AuthenticationFailed {
                message: err.to_string(),
            };
        }
        if err.is_not_found() {
            return CoreError::NotFound {
                message: err.to_string(),
            };
        }
        match err {
            fwctl_api::Error::NoResponse { message, .. } => {
                CoreError::ConnectionFailed { reason: message }
            }
            fwctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            fwctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fwctl_api::Error::RequestConfig { message } => CoreError::Config { message },
            fwctl_api::Error::Business { message, code } => CoreError::Api {
                message,
                status: code,
            },
            fwctl_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            fwctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage {
            message: err.to_string(),
        }
    }
}
