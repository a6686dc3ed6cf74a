// Response envelope parsing
//
// Every JSON endpoint answers `{success, data, error, message, code}`.
// This module holds the pure half of the normalizer: deciding what a
// response body means and which message a failure gets. The side effects
// (notification, re-auth prompt) live in `client.rs` so they happen in
// exactly one place.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message used when a failed envelope carries neither `error` nor `message`.
pub const DEFAULT_FAILURE_MESSAGE: &str = "operation failed";

/// Message used when the request went out but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "network connection timeout";

/// Message used when the request could not be built and the underlying
/// error has no text of its own.
pub const REQUEST_CONFIG_MESSAGE: &str = "request configuration error";

/// Question asked after an envelope reports an authentication failure.
pub const REAUTH_PROMPT: &str = "Your login session has expired. Log in again?";

/// How the caller wants the response body treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Parse the body as an envelope.
    Json,
    /// File download: hand back the raw bytes untouched.
    Binary,
}

/// The uniform wrapper every JSON endpoint uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl Envelope {
    /// Read an envelope out of a JSON object.
    ///
    /// Returns `None` when the object has no boolean `success` field; such
    /// objects are treated as already-unwrapped payloads. Field types are
    /// checked leniently: a non-string `error` or an out-of-range `code`
    /// is ignored rather than failing the whole response.
    pub fn from_object(map: &Map<String, Value>) -> Option<Self> {
        let success = map.get("success")?.as_bool()?;
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        Some(Self {
            success,
            data: map.get("data").cloned(),
            error: text("error"),
            message: text("message"),
            code: map
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok()),
        })
    }

    /// The user-facing text for a failed envelope:
    /// `error`, then `message`, then [`DEFAULT_FAILURE_MESSAGE`].
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_owned())
    }

    /// `code` 401 or 403.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code, Some(401 | 403))
    }
}

/// A successfully normalized response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Unwrapped `data`, or a JSON value that was not an envelope.
    Json(Value),
    /// A body that was not valid JSON, returned as text.
    Text(String),
    /// A binary download.
    Binary(Bytes),
}

impl Payload {
    /// View the payload as JSON. Text becomes a JSON string; binary
    /// payloads have no JSON view.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(s) => Some(Value::String(s)),
            Self::Binary(_) => None,
        }
    }
}

/// Outcome of running a 2xx body through the envelope rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Ok(Payload),
    Failed { message: String, code: Option<u16> },
}

/// Apply the envelope rules, in order, to a successful (2xx) body.
///
/// 1. Binary downloads bypass parsing.
/// 2. Anything that is not a JSON object is returned unchanged.
/// 3. `success == false` fails with the envelope's message.
/// 4. Otherwise `data` is the value (`null` when absent).
pub fn normalize(kind: ResponseKind, body: Bytes) -> Normalized {
    if kind == ResponseKind::Binary {
        return Normalized::Ok(Payload::Binary(body));
    }

    let value = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(_) => {
                return Normalized::Ok(Payload::Text(
                    String::from_utf8_lossy(&body).into_owned(),
                ));
            }
        }
    };

    let Value::Object(map) = &value else {
        return Normalized::Ok(Payload::Json(value));
    };

    match Envelope::from_object(map) {
        None => Normalized::Ok(Payload::Json(value)),
        Some(envelope) if !envelope.success => Normalized::Failed {
            message: envelope.failure_message(),
            code: envelope.code,
        },
        Some(envelope) => Normalized::Ok(Payload::Json(envelope.data.unwrap_or(Value::Null))),
    }
}

/// Map a non-2xx HTTP status to its fixed user-facing message.
///
/// 400 and unlisted statuses prefer the body's own `error` (and, for
/// unlisted statuses, `message`) when the body is a JSON object.
pub fn status_message(status: u16, body: &[u8]) -> String {
    let field = |key: &str| {
        serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| v.get(key).and_then(Value::as_str).map(str::to_owned))
            .filter(|s| !s.is_empty())
    };

    let fixed = match status {
        400 => return field("error").unwrap_or_else(|| "request parameter error".into()),
        401 => "unauthorized, please log in",
        403 => "access denied",
        404 => "requested resource not found",
        408 => "request timeout",
        500 => "internal server error",
        501 => "service not implemented",
        502 => "bad gateway",
        503 => "service unavailable",
        504 => "gateway timeout",
        505 => "HTTP version not supported",
        _ => {
            return field("error")
                .or_else(|| field("message"))
                .unwrap_or_else(|| format!("connection error {status}"));
        }
    };
    fixed.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn body(v: &Value) -> Bytes {
        Bytes::from(serde_json::to_vec(v).unwrap())
    }

    #[test]
    fn success_envelope_yields_data() {
        let out = normalize(
            ResponseKind::Json,
            body(&json!({"success": true, "data": {"total": 3}})),
        );
        assert_eq!(out, Normalized::Ok(Payload::Json(json!({"total": 3}))));
    }

    #[test]
    fn success_envelope_without_data_yields_null() {
        let out = normalize(ResponseKind::Json, body(&json!({"success": true})));
        assert_eq!(out, Normalized::Ok(Payload::Json(Value::Null)));
    }

    #[test]
    fn failure_message_precedence() {
        let both = normalize(
            ResponseKind::Json,
            body(&json!({"success": false, "error": "E", "message": "M"})),
        );
        let message_only = normalize(
            ResponseKind::Json,
            body(&json!({"success": false, "message": "M"})),
        );
        let neither = normalize(ResponseKind::Json, body(&json!({"success": false})));

        assert_eq!(
            both,
            Normalized::Failed {
                message: "E".into(),
                code: None
            }
        );
        assert_eq!(
            message_only,
            Normalized::Failed {
                message: "M".into(),
                code: None
            }
        );
        assert_eq!(
            neither,
            Normalized::Failed {
                message: DEFAULT_FAILURE_MESSAGE.into(),
                code: None
            }
        );
    }

    #[test]
    fn empty_error_string_falls_through_to_message() {
        let out = normalize(
            ResponseKind::Json,
            body(&json!({"success": false, "error": "", "message": "M", "code": 403})),
        );
        assert_eq!(
            out,
            Normalized::Failed {
                message: "M".into(),
                code: Some(403)
            }
        );
    }

    #[test]
    fn binary_bypasses_envelope_parsing() {
        let raw = body(&json!({"success": false, "error": "ignored"}));
        let out = normalize(ResponseKind::Binary, raw.clone());
        assert_eq!(out, Normalized::Ok(Payload::Binary(raw)));
    }

    #[test]
    fn non_objects_are_returned_unchanged() {
        assert_eq!(
            normalize(ResponseKind::Json, Bytes::from_static(b"plain text")),
            Normalized::Ok(Payload::Text("plain text".into()))
        );
        assert_eq!(
            normalize(ResponseKind::Json, Bytes::from_static(b"[1,2]")),
            Normalized::Ok(Payload::Json(json!([1, 2])))
        );
        assert_eq!(
            normalize(ResponseKind::Json, Bytes::from_static(b"null")),
            Normalized::Ok(Payload::Json(Value::Null))
        );
    }

    #[test]
    fn objects_without_success_flag_are_returned_unchanged() {
        let out = normalize(ResponseKind::Json, body(&json!({"status": "ok"})));
        assert_eq!(out, Normalized::Ok(Payload::Json(json!({"status": "ok"}))));
    }

    #[test]
    fn status_table_is_fixed() {
        let table = [
            (401, "unauthorized, please log in"),
            (403, "access denied"),
            (404, "requested resource not found"),
            (408, "request timeout"),
            (500, "internal server error"),
            (501, "service not implemented"),
            (502, "bad gateway"),
            (503, "service unavailable"),
            (504, "gateway timeout"),
            (505, "HTTP version not supported"),
        ];
        for (status, expected) in table {
            assert_eq!(status_message(status, b""), expected, "status {status}");
        }
        assert_eq!(status_message(400, b""), "request parameter error");
        assert_eq!(status_message(418, b""), "connection error 418");
    }

    #[test]
    fn bad_request_prefers_body_error() {
        let raw = serde_json::to_vec(&json!({"success": false, "error": "bad duration"})).unwrap();
        assert_eq!(status_message(400, &raw), "bad duration");
        // Listed statuses other than 400 ignore the body.
        assert_eq!(status_message(500, &raw), "internal server error");
    }
}
