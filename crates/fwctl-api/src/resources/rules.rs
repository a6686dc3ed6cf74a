// Ban and whitelist rule endpoints
//
// Everything under `/rule`: bans, whitelist, per-fingerprint behaviour
// analysis and rule housekeeping.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{BanRequest, BatchBanRequest, Page, WhitelistRequest};

impl ApiClient {
    /// `GET /rule/ban`
    pub async fn get_banned_users(&self, page: Page) -> Result<Value, Error> {
        self.get_with_query(&["rule", "ban"], &page).await
    }

    /// `POST /rule/ban`
    pub async fn ban_user(&self, request: &BanRequest) -> Result<Value, Error> {
        debug!(fingerprint = %request.fingerprint, duration = %request.duration, "banning user");
        self.post(&["rule", "ban"], request).await
    }

    /// `POST /rule/ban/batch`
    pub async fn batch_ban_users(&self, request: &BatchBanRequest) -> Result<Value, Error> {
        debug!(count = request.fingerprints.len(), "batch banning users");
        self.post(&["rule", "ban", "batch"], request).await
    }

    /// `DELETE /rule/ban/{fingerprint}`
    pub async fn unban_user(&self, fingerprint: &str) -> Result<Value, Error> {
        debug!(fingerprint, "unbanning user");
        self.delete(&["rule", "ban", fingerprint]).await
    }

    /// `GET /rule/whitelist`
    pub async fn get_whitelist_users(&self, page: Page) -> Result<Value, Error> {
        self.get_with_query(&["rule", "whitelist"], &page).await
    }

    /// `POST /rule/whitelist`
    pub async fn add_to_whitelist(&self, request: &WhitelistRequest) -> Result<Value, Error> {
        debug!(fingerprint = %request.fingerprint, "whitelisting user");
        self.post(&["rule", "whitelist"], request).await
    }

    /// `DELETE /rule/whitelist/{fingerprint}`
    pub async fn remove_from_whitelist(&self, fingerprint: &str) -> Result<Value, Error> {
        debug!(fingerprint, "removing user from whitelist");
        self.delete(&["rule", "whitelist", fingerprint]).await
    }

    /// `GET /rule/analysis/{fingerprint}`
    pub async fn get_user_analysis(&self, fingerprint: &str) -> Result<Value, Error> {
        self.get(&["rule", "analysis", fingerprint]).await
    }

    /// `GET /rule/stats`
    pub async fn get_rule_stats(&self) -> Result<Value, Error> {
        self.get(&["rule", "stats"]).await
    }

    /// `POST /rule/cleanup`
    pub async fn cleanup_expired_rules(&self) -> Result<Value, Error> {
        self.post_empty(&["rule", "cleanup"]).await
    }
}
