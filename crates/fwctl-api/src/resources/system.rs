// System endpoints
//
// Backend identity and health. These two feed the system status store.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{HealthSnapshot, SystemInfo};

impl ApiClient {
    /// `GET /system/info`
    pub async fn get_system_info(&self) -> Result<SystemInfo, Error> {
        self.get(&["system", "info"]).await
    }

    /// `GET /system/health`
    pub async fn get_health_check(&self) -> Result<HealthSnapshot, Error> {
        self.get(&["system", "health"]).await
    }
}
