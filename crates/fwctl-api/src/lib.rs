// fwctl-api: Async Rust client for the SecureFingerprint firewall administration API

pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod notify;
mod resources;
pub mod transport;

pub use client::ApiClient;
pub use envelope::{Envelope, Normalized, Payload, ResponseKind};
pub use error::Error;
pub use models::{
    BanRequest, BatchBanRequest, BatchScoreOperation, BatchScoreRequest, HealthSnapshot,
    HealthStatus, LogExportQuery, LogQuery, Page, ScoreAdjustment, SystemInfo, TimeRange,
    WhitelistRequest,
};
pub use notify::{Notifier, ReauthHandler, TracingNotifier};
pub use transport::{TlsMode, TransportConfig};
