// Access log endpoints
//
// Listing, search, per-fingerprint history, stats and export under `/logs`.

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LogExportQuery, LogQuery, Page, TimeRange};

/// `GET /logs/recent` parameters.
#[derive(Serialize)]
struct RecentQuery {
    minutes: u32,
    limit: u32,
}

/// `GET /logs/search` parameters.
#[derive(Serialize)]
struct KeywordQuery<'a> {
    keyword: &'a str,
    #[serde(flatten)]
    page: Page,
}

/// `DELETE /logs/cleanup` parameters.
#[derive(Serialize)]
struct CleanupQuery {
    days: u32,
}

impl ApiClient {
    /// List access logs with optional filters.
    ///
    /// `GET /logs`
    pub async fn get_access_logs(&self, query: &LogQuery) -> Result<Value, Error> {
        self.get_with_query(&["logs"], query).await
    }

    /// Structured search with a free-form criteria body.
    ///
    /// `POST /logs/search`
    pub async fn advanced_search_logs(
        &self,
        criteria: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.post(&["logs", "search"], criteria).await
    }

    /// `GET /logs/user/{fingerprint}`
    pub async fn get_user_access_logs(&self, fingerprint: &str, page: Page) -> Result<Value, Error> {
        self.get_with_query(&["logs", "user", fingerprint], &page)
            .await
    }

    /// Most recent entries within the last `minutes`.
    ///
    /// `GET /logs/recent`
    pub async fn get_recent_access_logs(&self, minutes: u32, limit: u32) -> Result<Value, Error> {
        self.get_with_query(&["logs", "recent"], &RecentQuery { minutes, limit })
            .await
    }

    /// `GET /logs/stats`
    pub async fn get_log_stats(&self, range: &TimeRange) -> Result<Value, Error> {
        self.get_with_query(&["logs", "stats"], range).await
    }

    /// Download matching logs as a file.
    ///
    /// `GET /logs/export` (binary)
    pub async fn export_logs(&self, query: &LogExportQuery) -> Result<Bytes, Error> {
        debug!(?query, "exporting logs");
        self.download(Method::GET, &["logs", "export"], |b| b.query(query))
            .await
    }

    /// `GET /logs/realtime`
    pub async fn get_realtime_logs(&self) -> Result<Value, Error> {
        self.get(&["logs", "realtime"]).await
    }

    /// Keyword search.
    ///
    /// `GET /logs/search`
    pub async fn search_logs(&self, keyword: &str, page: Page) -> Result<Value, Error> {
        self.get_with_query(&["logs", "search"], &KeywordQuery { keyword, page })
            .await
    }

    /// Delete logs older than `days`.
    ///
    /// `DELETE /logs/cleanup`
    pub async fn cleanup_logs(&self, days: u32) -> Result<Value, Error> {
        debug!(days, "cleaning up logs");
        self.delete_with_query(&["logs", "cleanup"], &CleanupQuery { days })
            .await
    }
}
