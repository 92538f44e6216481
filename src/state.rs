// Application state management
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::remote::gateway::SettingsGateway;
use crate::settings::store::SettingsStore;
use crate::view::SyncStatus;

/// How long a transient "Saved!" label stays before reverting to
/// "Connected".
pub const STATUS_REVERT_DELAY: Duration = Duration::from_secs(2);

/// Write access to the system clipboard, when the environment offers one.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

pub struct AppState {
    pub store: Arc<Mutex<SettingsStore>>,
    pub gateway: Arc<dyn SettingsGateway>,
    pub status: Arc<Mutex<SyncStatus>>,
    pub clipboard: Option<Arc<dyn Clipboard>>,
    /// Client used for the image probe.
    pub http: reqwest::Client,
    pub status_revert_delay: Duration,
}

impl AppState {
    pub fn new(gateway: Arc<dyn SettingsGateway>) -> Self {
        Self {
            store: Arc::new(Mutex::new(SettingsStore::new())),
            gateway,
            status: Arc::new(Mutex::new(SyncStatus::default())),
            clipboard: None,
            http: reqwest::Client::new(),
            status_revert_delay: STATUS_REVERT_DELAY,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Run `f` with the store locked. The lock is never held across an
    /// await; overlapping commands interleave last-write-wins.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut SettingsStore) -> R) -> R {
        let mut store = self.store.lock().unwrap();
        f(&mut store)
    }

    pub fn status(&self) -> SyncStatus {
        self.status.lock().unwrap().clone()
    }

    pub fn set_status(&self, status: SyncStatus) {
        *self.status.lock().unwrap() = status;
    }

    /// Show a transient label, reverting to "Connected" after the
    /// configured delay unless another status replaced it first.
    pub fn set_transient_status(&self, status: SyncStatus) {
        self.set_status(status.clone());

        let cell = Arc::clone(&self.status);
        let delay = self.status_revert_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut current = cell.lock().unwrap();
            if *current == status {
                *current = SyncStatus::connected("Connected");
            }
        });
    }
}
