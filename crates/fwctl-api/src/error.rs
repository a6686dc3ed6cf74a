use thiserror::Error;

/// Top-level error type for the `fwctl-api` crate.
///
/// Every variant carries the same human-readable text that was shown to
/// the user through the [`Notifier`](crate::Notifier), so callers can
/// render it again or branch on the variant without re-deriving it.
/// `fwctl-core` maps these into its own diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Business ────────────────────────────────────────────────────
    /// The backend answered with a `{"success": false, ...}` envelope.
    #[error("{message}")]
    Business { message: String, code: Option<u16> },

    // ── Transport ───────────────────────────────────────────────────
    /// Non-2xx HTTP status, mapped through the fixed status table.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request went out but no response came back (timeout,
    /// connection refused, reset).
    #[error("{message}")]
    NoResponse {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be constructed.
    #[error("{message}")]
    RequestConfig { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The unwrapped payload did not match the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` when the backend rejected the caller's credentials,
    /// either through the envelope `code` or the HTTP status.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Business { code, .. } => matches!(code, Some(401 | 403)),
            Self::Http { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// Returns `true` if no HTTP response was received at all.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Http { status: 404, .. }
                | Self::Business {
                    code: Some(404),
                    ..
                }
        )
    }

    /// HTTP status or envelope code, if one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Business { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_covers_envelope_codes_and_http_status() {
        let business = Error::Business {
            message: "expired".into(),
            code: Some(403),
        };
        let http = Error::Http {
            status: 401,
            message: "unauthorized, please log in".into(),
        };
        let other = Error::Business {
            message: "bad".into(),
            code: Some(500),
        };

        assert!(business.is_auth_failure());
        assert!(http.is_auth_failure());
        assert!(!other.is_auth_failure());
    }

    #[test]
    fn display_is_the_user_facing_message() {
        let err = Error::Business {
            message: "fingerprint is required".into(),
            code: None,
        };
        assert_eq!(err.to_string(), "fingerprint is required");
        assert_eq!(err.status(), None);
    }
}
