// ── Console facade ──
//
// Owns the API client and both stores, and keeps the client's bearer
// token in step with the session. Front ends hold a `Console` and never
// wire the pieces themselves.

use std::sync::Arc;

use fwctl_api::{ApiClient, Notifier, ReauthHandler};
use tracing::{debug, info};

use crate::auth::{Authenticator, LoginForm, StubAuthenticator};
use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::session::{LoginOutcome, SessionStore};
use crate::storage::{FileStorage, MemoryStorage, SessionStorage};
use crate::system::SystemStatusStore;

/// Main entry point for front ends. Cheaply cloneable.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    system: SystemStatusStore,
}

/// Logs the session out when the user accepts re-authentication.
struct SessionInvalidator {
    session: Arc<SessionStore>,
}

impl ReauthHandler for SessionInvalidator {
    fn reauthenticate(&self) {
        info!("session invalidated, log in again to continue");
        self.session.logout();
    }
}

impl Console {
    /// Build a console from configuration: HTTP client, session storage
    /// (file-backed when `session_file` is set) and the built-in
    /// authenticator. Nothing is contacted until a command runs.
    pub fn new(config: ConsoleConfig, notifier: Arc<dyn Notifier>) -> Result<Self, CoreError> {
        let api = ApiClient::new(&config.url, &config.transport(), notifier)?;
        let storage: Arc<dyn SessionStorage> = match &config.session_file {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        Ok(Self::from_parts(
            config,
            Arc::new(api),
            storage,
            Arc::new(StubAuthenticator),
        ))
    }

    /// Assemble a console from pre-built parts.
    pub fn from_parts(
        config: ConsoleConfig,
        api: Arc<ApiClient>,
        storage: Arc<dyn SessionStorage>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let session = Arc::new(
            SessionStore::new(storage, authenticator).with_token_ttl(config.token_ttl),
        );
        api.set_reauth_handler(Arc::new(SessionInvalidator {
            session: Arc::clone(&session),
        }));
        let system = SystemStatusStore::new(Arc::clone(&api));

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                api,
                session,
                system,
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn system(&self) -> &SystemStatusStore {
        &self.inner.system
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Restore a persisted session and hand its token to the client.
    /// Returns whether a session was restored.
    pub fn bootstrap(&self) -> bool {
        let restored = self.inner.session.restore_session();
        self.sync_token();
        debug!(restored, "console bootstrapped");
        restored
    }

    pub async fn login(&self, form: &LoginForm) -> LoginOutcome {
        let outcome = self.inner.session.login(form).await;
        self.sync_token();
        outcome
    }

    pub fn logout(&self) {
        self.inner.session.logout();
        self.sync_token();
    }

    /// Refresh system info and health concurrently.
    pub async fn refresh_status(&self) {
        self.inner.system.init_system().await;
    }

    // ── Guards ───────────────────────────────────────────────────────

    pub fn require_session(&self) -> Result<(), CoreError> {
        if self.inner.session.is_logged_in() {
            Ok(())
        } else {
            Err(CoreError::NotLoggedIn)
        }
    }

    /// Logged in and holding `permission` (or the superuser role).
    pub fn require_permission(&self, permission: &str) -> Result<(), CoreError> {
        self.require_session()?;
        if self.inner.session.has_permission(permission) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                permission: permission.to_owned(),
            })
        }
    }

    fn sync_token(&self) {
        self.inner.api.set_token(self.inner.session.token());
    }
}
