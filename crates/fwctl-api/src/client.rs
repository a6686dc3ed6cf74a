// Firewall administration API client
//
// Wraps `reqwest::Client` with base-path URL construction, bearer-token
// injection and the response normalizer. All resource modules
// (config, logs, rules, ...) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::{
    NO_RESPONSE_MESSAGE, Normalized, Payload, REAUTH_PROMPT, REQUEST_CONFIG_MESSAGE,
    ResponseKind, normalize, status_message,
};
use crate::error::Error;
use crate::notify::{Notifier, ReauthHandler};
use crate::transport::TransportConfig;

/// Async client for the firewall backend's `/api/v1` surface.
///
/// Every call goes through the same normalizer: on success the caller
/// receives the unwrapped `data` payload; on failure exactly one
/// notification is emitted and an [`Error`] carrying the same text is
/// returned. Nothing is retried.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    notifier: Arc<dyn Notifier>,
    /// Called when the user accepts the re-authentication prompt.
    reauth: RwLock<Option<Arc<dyn ReauthHandler>>>,
    /// Session token sent as `Authorization: Bearer` when present.
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `server` (e.g. `https://fw.example.com`),
    /// applying the transport's API prefix and timeout.
    pub fn new(
        server: &Url,
        transport: &TransportConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            server,
            &transport.api_prefix,
            notifier,
        ))
    }

    /// Wrap an existing `reqwest::Client` (caller manages timeout and TLS).
    pub fn with_client(
        http: reqwest::Client,
        server: &Url,
        api_prefix: &str,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            http,
            base_url: Self::normalize_base_url(server, api_prefix),
            notifier,
            reauth: RwLock::new(None),
            token: RwLock::new(None),
        }
    }

    /// Append the API prefix to the server URL, ending in `/`.
    ///
    /// `https://host` + `/api/v1` → `https://host/api/v1/`.
    /// A server URL that already ends with the prefix is left as is.
    fn normalize_base_url(server: &Url, api_prefix: &str) -> Url {
        let mut url = server.clone();
        let path = url.path().trim_end_matches('/').to_owned();
        let prefix = api_prefix.trim_matches('/');

        if prefix.is_empty() || path.ends_with(&format!("/{prefix}")) {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/{prefix}/"));
        }
        url
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The API base URL, including the prefix and a trailing slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Install or clear the session token sent with every request.
    pub fn set_token(&self, token: Option<SecretString>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Register the action run when the user accepts re-authentication.
    pub fn set_reauth_handler(&self, handler: Arc<dyn ReauthHandler>) {
        *self.reauth.write().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join path segments onto the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, path: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                self.fail(Error::RequestConfig {
                    message: REQUEST_CONFIG_MESSAGE.into(),
                })
            })?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        self.json(Method::GET, path, |b| b).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &[&str], query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.json(Method::GET, path, |b| b.query(query)).await
    }

    pub(crate) async fn post<T, B>(&self, path: &[&str], body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.json(Method::POST, path, |b| b.json(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        self.json(Method::POST, path, |b| b).await
    }

    pub(crate) async fn put<T, B>(&self, path: &[&str], body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.json(Method::PUT, path, |b| b.json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, Error> {
        self.json(Method::DELETE, path, |b| b).await
    }

    pub(crate) async fn delete_with_query<T, Q>(
        &self,
        path: &[&str],
        query: &Q,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.json(Method::DELETE, path, |b| b.query(query)).await
    }

    /// Binary download: the body is returned untouched, no envelope.
    pub(crate) async fn download(
        &self,
        method: Method,
        path: &[&str],
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Bytes, Error> {
        let url = self.endpoint(path)?;
        debug!("{method} {url} (download)");

        match self
            .send(build(self.http.request(method, url)), ResponseKind::Binary)
            .await?
        {
            Payload::Binary(bytes) => Ok(bytes),
            Payload::Text(text) => Ok(Bytes::from(text)),
            Payload::Json(value) => Ok(Bytes::from(value.to_string())),
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("{method} {url}");

        let payload = self
            .send(build(self.http.request(method, url)), ResponseKind::Json)
            .await?;
        self.decode(payload)
    }

    /// Send the request and run the response through the normalizer.
    ///
    /// Every `Err` returned from here has already been reported to the
    /// notifier exactly once.
    async fn send(&self, builder: RequestBuilder, kind: ResponseKind) -> Result<Payload, Error> {
        let builder = self.apply_token(builder);

        let resp = builder
            .send()
            .await
            .map_err(|e| self.fail(transport_error(e)))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| self.fail(transport_error(e)))?;

        if !status.is_success() {
            trace!(%status, len = body.len(), "non-success status");
            return Err(self.fail(Error::Http {
                status: status.as_u16(),
                message: status_message(status.as_u16(), &body),
            }));
        }

        match normalize(kind, body) {
            Normalized::Ok(payload) => Ok(payload),
            Normalized::Failed { message, code } => {
                let err = self.fail(Error::Business { message, code });
                if matches!(code, Some(401 | 403)) {
                    self.prompt_reauth();
                }
                Err(err)
            }
        }
    }

    fn decode<T: DeserializeOwned>(&self, payload: Payload) -> Result<T, Error> {
        let value = payload.into_json().unwrap_or_default();
        serde_json::from_value(value.clone()).map_err(|e| {
            let body = value.to_string();
            let preview: String = body.chars().take(200).collect();
            self.fail(Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            })
        })
    }

    /// Report a failure to the notifier and hand it back to the caller.
    fn fail(&self, err: Error) -> Error {
        self.notifier.error(&err.to_string());
        err
    }

    fn prompt_reauth(&self) {
        if !self.notifier.confirm_reauth(REAUTH_PROMPT) {
            return;
        }
        debug!("re-authentication accepted, dropping session token");
        self.set_token(None);

        let handler = self
            .reauth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler.reauthenticate();
        }
    }

    fn apply_token(&self, builder: RequestBuilder) -> RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

/// Classify a reqwest failure that produced no usable HTTP response.
fn transport_error(err: reqwest::Error) -> Error {
    if err.is_builder() {
        let message = err.to_string();
        return Error::RequestConfig {
            message: if message.is_empty() {
                REQUEST_CONFIG_MESSAGE.into()
            } else {
                message
            },
        };
    }
    Error::NoResponse {
        message: NO_RESPONSE_MESSAGE.into(),
        source: err,
    }
}
