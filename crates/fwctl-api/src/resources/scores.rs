// Score endpoints
//
// Per-fingerprint scores and batch score operations under `/score`.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{BatchScoreRequest, Page, ScoreAdjustment};

#[derive(Serialize)]
struct HistoryQuery {
    hours: u32,
}

#[derive(Serialize)]
struct LowScoreQuery {
    threshold: i32,
    #[serde(flatten)]
    page: Page,
}

impl ApiClient {
    /// `GET /score/{fingerprint}`
    pub async fn get_user_score(&self, fingerprint: &str) -> Result<Value, Error> {
        self.get(&["score", fingerprint]).await
    }

    /// `POST /score/{fingerprint}/reset`
    pub async fn reset_user_score(&self, fingerprint: &str) -> Result<Value, Error> {
        debug!(fingerprint, "resetting score");
        self.post_empty(&["score", fingerprint, "reset"]).await
    }

    /// `POST /score/{fingerprint}/adjust`
    pub async fn adjust_user_score(
        &self,
        fingerprint: &str,
        adjustment: &ScoreAdjustment,
    ) -> Result<Value, Error> {
        debug!(fingerprint, delta = adjustment.adjustment, "adjusting score");
        self.post(&["score", fingerprint, "adjust"], adjustment)
            .await
    }

    /// Score trend over the last `hours`.
    ///
    /// `GET /score/{fingerprint}/history`
    pub async fn get_user_score_history(&self, fingerprint: &str, hours: u32) -> Result<Value, Error> {
        self.get_with_query(&["score", fingerprint, "history"], &HistoryQuery { hours })
            .await
    }

    /// `GET /score/stats`
    pub async fn get_score_stats(&self) -> Result<Value, Error> {
        self.get(&["score", "stats"]).await
    }

    /// Users scoring below `threshold`.
    ///
    /// `GET /score/low-score-users`
    pub async fn get_low_score_users(&self, threshold: i32, page: Page) -> Result<Value, Error> {
        self.get_with_query(
            &["score", "low-score-users"],
            &LowScoreQuery { threshold, page },
        )
        .await
    }

    /// `POST /score/batch`
    pub async fn batch_score_operation(&self, request: &BatchScoreRequest) -> Result<Value, Error> {
        debug!(op = %request.operation, count = request.fingerprints.len(), "batch score operation");
        self.post(&["score", "batch"], request).await
    }
}
