// ── Authentication seam ──
//
// The backend exposes no login endpoint yet, so credential checks sit
// behind a trait. `StubAuthenticator` is the built-in implementation.

use std::collections::BTreeSet;

use chrono::Utc;
use futures_util::future::{self, BoxFuture};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::CoreError;
use crate::session::{SUPERUSER_ROLE, UserInfo};

/// Username/password pair submitted at login.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// What a successful authentication hands back.
#[derive(Debug, Clone)]
pub struct Grant {
    pub token: SecretString,
    pub user_info: UserInfo,
}

/// Validates credentials and issues a session token.
pub trait Authenticator: Send + Sync {
    fn authenticate<'a>(&'a self, form: &'a LoginForm) -> BoxFuture<'a, Result<Grant, CoreError>>;
}

/// Accepts the single built-in account `admin` / `admin123`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubAuthenticator;

impl StubAuthenticator {
    pub const USERNAME: &'static str = "admin";
    const PASSWORD: &'static str = "admin123";
}

impl Authenticator for StubAuthenticator {
    fn authenticate<'a>(&'a self, form: &'a LoginForm) -> BoxFuture<'a, Result<Grant, CoreError>> {
        let result = if form.username == Self::USERNAME
            && form.password.expose_secret() == Self::PASSWORD
        {
            debug!(username = %form.username, "stub credentials accepted");
            Ok(Grant {
                token: SecretString::from(format!(
                    "mock-token-{}",
                    Utc::now().timestamp_millis()
                )),
                user_info: UserInfo {
                    username: form.username.clone(),
                    avatar: String::new(),
                    roles: BTreeSet::from([SUPERUSER_ROLE.to_owned()]),
                    permissions: BTreeSet::from(["*".to_owned()]),
                },
            })
        } else {
            Err(CoreError::AuthenticationFailed {
                message: "invalid username or password".into(),
            })
        };
        Box::pin(future::ready(result))
    }
}
