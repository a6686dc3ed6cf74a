// fwctl-core: Session and system status state between fwctl-api and front ends.

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod storage;
pub mod system;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{Authenticator, Grant, LoginForm, StubAuthenticator};
pub use config::{ConsoleConfig, DEFAULT_TOKEN_TTL, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use session::{
    LoginOutcome, SUPERUSER_ROLE, SessionState, SessionStore, UserInfo, UserInfoPatch,
};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use system::{SystemState, SystemStatusStore};

// Wire types front ends need alongside the stores.
pub use fwctl_api::{ApiClient, HealthSnapshot, HealthStatus, Notifier, SystemInfo};
