// Configuration endpoints
//
// Scoring, limiter and system configuration under `/config`. Bodies are
// passed through untyped; the backend owns the schema.

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Page;

impl ApiClient {
    /// `GET /config`
    pub async fn get_system_config(&self) -> Result<Value, Error> {
        self.get(&["config"]).await
    }

    /// `PUT /config`
    pub async fn update_system_config(&self, config: &(impl Serialize + Sync)) -> Result<Value, Error> {
        self.put(&["config"], config).await
    }

    /// `GET /config/scoring`
    pub async fn get_scoring_config(&self) -> Result<Value, Error> {
        self.get(&["config", "scoring"]).await
    }

    /// `PUT /config/scoring`
    pub async fn update_scoring_config(
        &self,
        config: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.put(&["config", "scoring"], config).await
    }

    /// `GET /config/limiter`
    pub async fn get_limiter_config(&self) -> Result<Value, Error> {
        self.get(&["config", "limiter"]).await
    }

    /// `PUT /config/limiter`
    pub async fn update_limiter_config(
        &self,
        config: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.put(&["config", "limiter"], config).await
    }

    /// Reset one configuration section to its defaults.
    ///
    /// `POST /config/reset/{kind}`
    pub async fn reset_config(&self, kind: &str) -> Result<Value, Error> {
        debug!(kind, "resetting config");
        self.post_empty(&["config", "reset", kind]).await
    }

    /// Download the full configuration as a file.
    ///
    /// `POST /config/export` (binary)
    pub async fn export_config(&self) -> Result<Bytes, Error> {
        self.download(Method::POST, &["config", "export"], |b| b)
            .await
    }

    /// `POST /config/import`
    pub async fn import_config(&self, config: &(impl Serialize + Sync)) -> Result<Value, Error> {
        self.post(&["config", "import"], config).await
    }

    /// `GET /config/history`
    pub async fn get_config_history(&self, page: Page) -> Result<Value, Error> {
        self.get_with_query(&["config", "history"], &page).await
    }
}
