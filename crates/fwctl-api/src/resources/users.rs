// Tracked user endpoints
//
// Fingerprinted clients as the backend sees them, under `/users`.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Page;

impl ApiClient {
    /// `GET /users`
    pub async fn get_user_list(&self, page: Page) -> Result<Value, Error> {
        self.get_with_query(&["users"], &page).await
    }

    /// `GET /users/{fingerprint}`
    pub async fn get_user_detail(&self, fingerprint: &str) -> Result<Value, Error> {
        self.get(&["users", fingerprint]).await
    }
}
