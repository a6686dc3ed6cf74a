// ── Session store ──
//
// Token, logged-in flag and cached identity, persisted to durable
// storage. State lives in a `watch` channel so every method takes `&self`
// and front ends can subscribe to changes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{Authenticator, LoginForm};
use crate::error::CoreError;
use crate::storage::{SessionStorage, TOKEN_EXPIRES_KEY, TOKEN_KEY, USER_INFO_KEY};

/// Role that passes every permission check.
///
/// Holding this role is an implicit superuser bypass, not an explicit
/// permission grant: [`SessionStore::has_permission`] checks it before
/// consulting the permission set.
pub const SUPERUSER_ROLE: &str = "admin";

/// Cached identity of the logged-in operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

/// Partial identity update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfoPatch {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub roles: Option<BTreeSet<String>>,
    pub permissions: Option<BTreeSet<String>>,
}

impl UserInfo {
    fn merge(&mut self, patch: UserInfoPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(roles) = patch.roles {
            self.roles = roles;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
    }
}

/// In-memory session. `is_logged_in` is true iff `token` is non-empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    #[serde(skip)]
    pub token: String,
    pub is_logged_in: bool,
    pub user_info: UserInfo,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &if self.token.is_empty() { "" } else { "[REDACTED]" })
            .field("is_logged_in", &self.is_logged_in)
            .field("user_info", &self.user_info)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of [`SessionStore::login`]. Login never returns an `Err`, so
/// callers can render the message inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Authentication state container.
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    /// Constructor-injected state restored by [`reset`](Self::reset).
    initial: SessionState,
    storage: Arc<dyn SessionStorage>,
    authenticator: Arc<dyn Authenticator>,
    /// Lifetime stamped on new tokens. `None` issues non-expiring tokens.
    token_ttl: Option<TimeDelta>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_initial(SessionState::default(), storage, authenticator)
    }

    pub fn with_initial(
        initial: SessionState,
        storage: Arc<dyn SessionStorage>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let (state, _) = watch::channel(initial.clone());
        Self {
            state,
            initial,
            storage,
            authenticator,
            token_ttl: None,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Option<TimeDelta>) -> Self {
        self.token_ttl = ttl;
        self
    }

    // ── Getters ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in
    }

    pub fn token(&self) -> Option<SecretString> {
        let state = self.state.borrow();
        (!state.token.is_empty()).then(|| SecretString::from(state.token.clone()))
    }

    pub fn username(&self) -> String {
        self.state.borrow().user_info.username.clone()
    }

    pub fn avatar(&self) -> String {
        self.state.borrow().user_info.avatar.clone()
    }

    pub fn roles(&self) -> BTreeSet<String> {
        self.state.borrow().user_info.roles.clone()
    }

    /// `true` when `name` is granted explicitly, or when the user holds
    /// [`SUPERUSER_ROLE`].
    pub fn has_permission(&self, name: &str) -> bool {
        let state = self.state.borrow();
        state.user_info.roles.contains(SUPERUSER_ROLE)
            || state.user_info.permissions.contains(name)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Validate credentials and start a session.
    ///
    /// The new session is persisted before it becomes visible; if
    /// persisting fails the previous state is kept and the failure is
    /// reported in the outcome.
    pub async fn login(&self, form: &LoginForm) -> LoginOutcome {
        let grant = match self.authenticator.authenticate(form).await {
            Ok(grant) => grant,
            Err(e) => {
                debug!(username = %form.username, error = %e, "login rejected");
                return LoginOutcome::failed(match e {
                    CoreError::AuthenticationFailed { message } => message,
                    other => other.to_string(),
                });
            }
        };

        let expires_at = match self.token_ttl {
            None => None,
            Some(ttl) => match Utc::now().checked_add_signed(ttl) {
                Some(at) => Some(at),
                None => {
                    warn!(?ttl, "token lifetime overflows the calendar");
                    return LoginOutcome::failed("token lifetime is out of range");
                }
            },
        };

        let next = SessionState {
            token: grant.token.expose_secret().to_owned(),
            is_logged_in: true,
            user_info: grant.user_info,
            expires_at,
        };

        let previous = self.snapshot_persisted();
        if let Err(e) = self.persist(&next) {
            warn!(error = %e, "could not persist session");
            self.restore_persisted(previous);
            return LoginOutcome::failed(e.to_string());
        }

        info!(username = %next.user_info.username, "logged in");
        self.state.send_replace(next);
        LoginOutcome::ok()
    }

    /// End the session and forget the persisted copy. Idempotent.
    pub fn logout(&self) {
        self.state.send_replace(SessionState::default());
        self.clear_persisted();
        debug!("session cleared");
    }

    /// Repopulate from storage without contacting the backend.
    ///
    /// Returns `true` when a session was restored. Missing, malformed or
    /// expired data fails closed: the store stays logged out and stale
    /// entries are dropped.
    pub fn restore_session(&self) -> bool {
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user_info = self.storage.get(USER_INFO_KEY);
        let (Some(token), Some(user_info)) = (token, user_info) else {
            return false;
        };

        let user_info: UserInfo = match serde_json::from_str(&user_info) {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "persisted user info is malformed, ignoring session");
                self.clear_persisted();
                return false;
            }
        };

        let expires_at = match self.persisted_expiry() {
            Ok(expires_at) => expires_at,
            Err(reason) => {
                warn!(%reason, "persisted session rejected");
                self.clear_persisted();
                return false;
            }
        };

        debug!(username = %user_info.username, "session restored");
        self.state.send_replace(SessionState {
            token,
            is_logged_in: true,
            user_info,
            expires_at,
        });
        true
    }

    /// Merge `patch` into the current identity and re-persist it.
    /// The token is never touched.
    pub fn update_user_info(&self, patch: UserInfoPatch) -> Result<(), CoreError> {
        self.state.send_modify(|state| state.user_info.merge(patch));
        let user_info = self.state.borrow().user_info.clone();
        self.storage
            .set(USER_INFO_KEY, &serialize_user_info(&user_info)?)
    }

    /// Back to the constructor-injected state. Storage is not touched.
    pub fn reset(&self) {
        self.state.send_replace(self.initial.clone());
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist(&self, state: &SessionState) -> Result<(), CoreError> {
        self.storage.set(TOKEN_KEY, &state.token)?;
        self.storage
            .set(USER_INFO_KEY, &serialize_user_info(&state.user_info)?)?;
        match state.expires_at {
            Some(at) => self.storage.set(TOKEN_EXPIRES_KEY, &at.to_rfc3339()),
            None => self.storage.remove(TOKEN_EXPIRES_KEY),
        }
    }

    fn snapshot_persisted(&self) -> [(&'static str, Option<String>); 3] {
        [TOKEN_KEY, USER_INFO_KEY, TOKEN_EXPIRES_KEY].map(|key| (key, self.storage.get(key)))
    }

    /// Put back entries captured by `snapshot_persisted`, so a half-written
    /// login leaves the previous session on disk.
    fn restore_persisted(&self, snapshot: [(&'static str, Option<String>); 3]) {
        for (key, value) in snapshot {
            let result = match value {
                Some(value) => self.storage.set(key, &value),
                None => self.storage.remove(key),
            };
            if let Err(e) = result {
                warn!(key, error = %e, "could not restore persisted session entry");
            }
        }
    }

    fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_INFO_KEY, TOKEN_EXPIRES_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "could not remove persisted session entry");
            }
        }
    }

    /// Read and validate the persisted expiry.
    ///
    /// With a TTL configured every token must carry an expiry; without
    /// one a missing expiry means the token does not expire.
    fn persisted_expiry(&self) -> Result<Option<DateTime<Utc>>, String> {
        let Some(raw) = self.storage.get(TOKEN_EXPIRES_KEY) else {
            return if self.token_ttl.is_some() {
                Err("token has no expiry".into())
            } else {
                Ok(None)
            };
        };

        let at = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| format!("unreadable expiry {raw:?}: {e}"))?
            .with_timezone(&Utc);
        if at <= Utc::now() {
            return Err(format!("token expired at {at}"));
        }
        Ok(Some(at))
    }
}

fn serialize_user_info(info: &UserInfo) -> Result<String, CoreError> {
    serde_json::to_string(info).map_err(|e| CoreError::Storage {
        message: e.to_string(),
    })
}
