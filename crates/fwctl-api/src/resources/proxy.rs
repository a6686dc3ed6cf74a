// Proxy detection endpoints
//
// Read-only views and dry-run checks for the backend's proxy detector.

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// `GET /proxy/info`
    pub async fn get_proxy_info(&self) -> Result<Value, Error> {
        self.get(&["proxy", "info"]).await
    }

    /// `GET /proxy/config`
    pub async fn get_proxy_config(&self) -> Result<Value, Error> {
        self.get(&["proxy", "config"]).await
    }

    /// Run the detector against a sample request.
    ///
    /// `POST /proxy/test`
    pub async fn test_proxy_detection(
        &self,
        sample: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.post(&["proxy", "test"], sample).await
    }

    /// `GET /proxy/stats`
    pub async fn get_proxy_stats(&self) -> Result<Value, Error> {
        self.get(&["proxy", "stats"]).await
    }

    /// `POST /proxy/validate`
    pub async fn validate_proxy_config(
        &self,
        config: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        self.post(&["proxy", "validate"], config).await
    }
}
