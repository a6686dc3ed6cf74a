// ── Runtime console configuration ──
//
// Describes how to reach the backend and where the session lives.
// Built by the CLI from a profile; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use fwctl_api::{TlsMode, TransportConfig};
use fwctl_api::transport::{DEFAULT_API_PREFIX, DEFAULT_TIMEOUT};
use url::Url;

/// Default lifetime stamped on freshly issued session tokens.
pub const DEFAULT_TOKEN_TTL: TimeDelta = TimeDelta::hours(12);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab deployments).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one backend plus its session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend origin, e.g. `https://fw.example.com`.
    pub url: Url,
    /// Prefix every endpoint lives under.
    pub api_prefix: String,
    pub tls: TlsVerification,
    /// Applied to every request; there is no per-call override.
    pub timeout: Duration,
    /// Session file. `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
    /// `None` issues tokens that never expire locally.
    pub token_ttl: Option<TimeDelta>,
}

impl ConsoleConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_prefix: DEFAULT_API_PREFIX.into(),
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            session_file: None,
            token_ttl: Some(DEFAULT_TOKEN_TTL),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            api_prefix: self.api_prefix.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_transport_defaults() {
        let config = ConsoleConfig::new("https://fw.example.com".parse().unwrap());
        let transport = config.transport();

        assert_eq!(transport.api_prefix, "/api/v1");
        assert_eq!(transport.timeout, Duration::from_secs(30));
        assert_eq!(transport.tls, TlsMode::System);
        assert_eq!(config.token_ttl, Some(TimeDelta::hours(12)));
    }

    #[test]
    fn insecure_tls_maps_to_accept_invalid() {
        let mut config = ConsoleConfig::new("https://10.0.0.1".parse().unwrap());
        config.tls = TlsVerification::DangerAcceptInvalid;
        assert_eq!(config.transport().tls, TlsMode::DangerAcceptInvalid);
    }
}
