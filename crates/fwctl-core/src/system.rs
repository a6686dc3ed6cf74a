// ── System status store ──
//
// Latest backend identity and health snapshot. Fetch failures never
// propagate: the notifier has already told the user, the store only
// decides what the stale state should look like.

use std::sync::Arc;

use fwctl_api::{ApiClient, HealthSnapshot, HealthStatus, SystemInfo};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Snapshot of everything the store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemState {
    pub system_info: SystemInfo,
    pub health: HealthSnapshot,
    pub loading: bool,
}

/// Backend info and health container.
pub struct SystemStatusStore {
    api: Arc<ApiClient>,
    info: watch::Sender<SystemInfo>,
    health: watch::Sender<HealthSnapshot>,
    loading: watch::Sender<bool>,
    initial: SystemState,
}

impl SystemStatusStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self::with_initial(api, SystemState::default())
    }

    pub fn with_initial(api: Arc<ApiClient>, initial: SystemState) -> Self {
        Self {
            api,
            info: watch::Sender::new(initial.system_info.clone()),
            health: watch::Sender::new(initial.health.clone()),
            loading: watch::Sender::new(initial.loading),
            initial,
        }
    }

    // ── Getters ──────────────────────────────────────────────────────

    pub fn state(&self) -> SystemState {
        SystemState {
            system_info: self.system_info(),
            health: self.health_status(),
            loading: self.is_loading(),
        }
    }

    pub fn system_info(&self) -> SystemInfo {
        self.info.borrow().clone()
    }

    pub fn health_status(&self) -> HealthSnapshot {
        self.health.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn is_healthy(&self) -> bool {
        self.health.borrow().status == HealthStatus::Healthy
    }

    pub fn system_version(&self) -> String {
        self.info.borrow().version.clone()
    }

    pub fn is_registration_allowed(&self) -> bool {
        self.info.borrow().user_registration_allowed
    }

    pub fn subscribe_health(&self) -> watch::Receiver<HealthSnapshot> {
        self.health.subscribe()
    }

    pub fn subscribe_info(&self) -> watch::Receiver<SystemInfo> {
        self.info.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refresh backend identity. On failure the previous value stays.
    pub async fn fetch_system_info(&self) {
        self.loading.send_replace(true);
        match self.api.get_system_info().await {
            Ok(info) => {
                debug!(name = %info.name, version = %info.version, "system info refreshed");
                self.info.send_replace(info);
            }
            Err(e) => warn!(error = %e, "system info fetch failed, keeping previous value"),
        }
        self.loading.send_replace(false);
    }

    /// Refresh health. Success replaces the snapshot wholesale; failure
    /// marks the backend unhealthy and keeps the rest of the snapshot.
    pub async fn fetch_health_status(&self) {
        match self.api.get_health_check().await {
            Ok(snapshot) => {
                debug!(status = %snapshot.status, services = snapshot.services.len(), "health refreshed");
                self.health.send_replace(snapshot);
            }
            Err(e) => {
                warn!(error = %e, "health check failed, marking unhealthy");
                self.health
                    .send_modify(|snapshot| snapshot.status = HealthStatus::Unhealthy);
            }
        }
    }

    /// Run both refreshes concurrently. Resolves once both have finished;
    /// neither failure cancels the other.
    pub async fn init_system(&self) {
        tokio::join!(self.fetch_system_info(), self.fetch_health_status());
    }

    /// Back to the constructor-injected state.
    pub fn reset(&self) {
        self.info.send_replace(self.initial.system_info.clone());
        self.health.send_replace(self.initial.health.clone());
        self.loading.send_replace(self.initial.loading);
    }
}
