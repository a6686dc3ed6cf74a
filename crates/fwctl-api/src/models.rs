// Wire types for the firewall backend
//
// Only the shapes the client layer relies on are typed. Resource
// listings (logs, bans, scores) stay loosely typed as `serde_json::Value`
// because their field sets are owned by the backend and change with it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── System ──────────────────────────────────────────────────────────

/// `GET /system/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default, alias = "userRegistrationAllowed")]
    pub user_registration_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_time: Option<String>,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            name: "SecureFingerprint".into(),
            version: "v1.0.0".into(),
            status: "running".into(),
            uptime: String::new(),
            user_registration_allowed: false,
            go_version: None,
            build_time: None,
        }
    }
}

/// Overall backend health.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Unhealthy,
}

/// `GET /system/health`. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    /// Service name → state, e.g. `redis` → `connected`.
    #[serde(default)]
    pub services: BTreeMap<String, String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

// ── Queries ─────────────────────────────────────────────────────────

/// Page-based listing parameters shared by most list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

/// Filters for `GET /logs`. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogQuery {
    #[serde(flatten)]
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_dir: Option<String>,
}

/// Time window shared by stats and export endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// `GET /logs/export` parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogExportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(flatten)]
    pub range: TimeRange,
}

// ── Request bodies ──────────────────────────────────────────────────

/// `POST /rule/ban`. `duration` uses Go syntax, e.g. `"1h"` or `"24h"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BanRequest {
    pub fingerprint: String,
    pub reason: String,
    pub duration: String,
}

/// `POST /rule/ban/batch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchBanRequest {
    pub fingerprints: Vec<String>,
    pub reason: String,
    pub duration: String,
}

/// `POST /rule/whitelist`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhitelistRequest {
    pub fingerprint: String,
    pub reason: String,
}

/// `POST /score/{fingerprint}/adjust`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreAdjustment {
    pub adjustment: i32,
    pub reason: String,
}

/// Operation applied by `POST /score/batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BatchScoreOperation {
    Reset,
    Adjust,
}

/// `POST /score/batch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchScoreRequest {
    pub operation: BatchScoreOperation,
    pub fingerprints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<i32>,
    pub reason: String,
}
