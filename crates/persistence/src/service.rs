//! Navigation persistence service.
//!
//! Auto-saves go through a [`Debouncer`] into the local store. Explicit
//! saves write local immediately and, for [`save_to_server`], the remote
//! copy too. Loading reconciles the two copies by `lastUpdated`.
//!
//! [`save_to_server`]: NavigationPersistence::save_to_server

use std::sync::Arc;
use std::time::Duration;

use navedit_core::storage::{NavigationStorageData, STORAGE_KEY};
use navedit_core::store::NavigationState;
use serde::Serialize;

use crate::debounce::Debouncer;
use crate::local::{LocalStore, StoreError};
use crate::remote::{RemoteError, RemoteStore};

/// Errors surfaced through [`SaveResult::error`] and
/// [`PersistenceCallbacks::on_error`].
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to save navigation data locally: {0}")]
    Local(#[from] StoreError),

    #[error("Failed to save navigation data to remote: {0}")]
    Remote(#[from] RemoteError),

    #[error("Remote storage is not configured")]
    RemoteNotConfigured,

    #[error("Failed to serialize navigation data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of an explicit save.
///
/// `success` follows the local leg: a remote failure alone still counts as a
/// successful save, with the failure reported in `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub success: bool,
    pub local: bool,
    pub remote: bool,
    pub error: Option<String>,
}

type SaveCallback = Arc<dyn Fn(&NavigationStorageData) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&PersistenceError) + Send + Sync>;

/// Completion hooks. `on_save` runs after every successful local write,
/// including debounced ones; `on_error` runs for every failed leg.
#[derive(Clone, Default)]
pub struct PersistenceCallbacks {
    pub on_save: Option<SaveCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl PersistenceCallbacks {
    pub fn on_save(mut self, f: impl Fn(&NavigationStorageData) + Send + Sync + 'static) -> Self {
        self.on_save = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&PersistenceError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    fn saved(&self, data: &NavigationStorageData) {
        if let Some(on_save) = &self.on_save {
            on_save(data);
        }
    }

    fn failed(&self, error: &PersistenceError) {
        tracing::warn!(error = %error, "Navigation persistence failed");
        if let Some(on_error) = &self.on_error {
            on_error(error);
        }
    }
}

// ---------------------------------------------------------------------------
// Local helpers
// ---------------------------------------------------------------------------

fn write_local(local: &dyn LocalStore, data: &NavigationStorageData) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(data)?;
    local.set(STORAGE_KEY, &json)?;
    Ok(())
}

/// Read the local envelope. Unreadable or corrupt data counts as absent.
fn read_local(local: &dyn LocalStore) -> Option<NavigationStorageData> {
    let json = match local.get(STORAGE_KEY) {
        Ok(json) => json?,
        Err(e) => {
            tracing::warn!(store = local.name(), error = %e, "Failed to read local navigation data");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(store = local.name(), error = %e, "Ignoring corrupt local navigation data");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// NavigationPersistence
// ---------------------------------------------------------------------------

/// Saves and loads the navigation envelope.
///
/// One instance per editing session. `save_to_server` calls must not
/// overlap; the caller awaits one before issuing the next. Dropping the
/// service cancels a pending auto-save.
pub struct NavigationPersistence {
    local: Arc<dyn LocalStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    callbacks: PersistenceCallbacks,
    debouncer: Debouncer<NavigationStorageData>,
}

impl NavigationPersistence {
    pub fn new(
        local: Arc<dyn LocalStore>,
        remote: Option<Arc<dyn RemoteStore>>,
        debounce: Duration,
        callbacks: PersistenceCallbacks,
    ) -> Self {
        let debouncer = {
            let local = Arc::clone(&local);
            let callbacks = callbacks.clone();
            Debouncer::new(debounce, move |data: NavigationStorageData| {
                match write_local(local.as_ref(), &data) {
                    Ok(()) => {
                        tracing::debug!(last_updated = %data.last_updated, "Auto-saved navigation");
                        callbacks.saved(&data);
                    }
                    Err(e) => callbacks.failed(&e),
                }
            })
        };
        Self {
            local,
            remote,
            callbacks,
            debouncer,
        }
    }

    pub fn remote_name(&self) -> Option<&str> {
        self.remote.as_deref().map(|r| r.name())
    }

    /// Schedule a debounced local save of `state`.
    pub fn auto_save(&self, state: &NavigationState) {
        self.debouncer.call(NavigationStorageData::from_state(state));
    }

    /// Whether an auto-save is waiting for its debounce window.
    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drop a pending auto-save.
    pub fn cancel_pending(&self) -> bool {
        self.debouncer.cancel()
    }

    /// Write a pending auto-save now.
    pub fn flush_pending(&self) -> bool {
        self.debouncer.flush()
    }

    /// Cancel any pending auto-save and write `state` locally now. Does not
    /// touch the remote.
    pub fn save_immediately(&self, state: &NavigationState) -> SaveResult {
        self.debouncer.cancel();
        let data = NavigationStorageData::from_state(state);
        match write_local(self.local.as_ref(), &data) {
            Ok(()) => {
                self.callbacks.saved(&data);
                SaveResult {
                    success: true,
                    local: true,
                    remote: false,
                    error: None,
                }
            }
            Err(e) => {
                self.callbacks.failed(&e);
                SaveResult {
                    success: false,
                    local: false,
                    remote: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Flush any pending auto-save, then write `state` locally and remotely.
    pub async fn save_to_server(&self, state: &NavigationState) -> SaveResult {
        self.debouncer.flush();
        let data = NavigationStorageData::from_state(state);
        let mut errors = Vec::new();

        let local = match write_local(self.local.as_ref(), &data) {
            Ok(()) => true,
            Err(e) => {
                self.callbacks.failed(&e);
                errors.push(e.to_string());
                false
            }
        };

        let remote_result = match &self.remote {
            Some(remote) => remote.save(&data).await.map_err(PersistenceError::from),
            None => Err(PersistenceError::RemoteNotConfigured),
        };
        let remote = match remote_result {
            Ok(()) => true,
            Err(e) => {
                self.callbacks.failed(&e);
                errors.push(e.to_string());
                false
            }
        };

        if local {
            self.callbacks.saved(&data);
        }
        tracing::info!(local, remote, "Saved navigation to server");

        SaveResult {
            success: local,
            local,
            remote,
            error: (!errors.is_empty()).then(|| errors.join("; ")),
        }
    }

    /// Load the newest available envelope.
    ///
    /// A remote copy newer than the local one (or with no local copy at all)
    /// is written back to the local store. Remote failures are logged and
    /// treated as "no remote data"; this never fails.
    pub async fn load(&self) -> Option<NavigationStorageData> {
        let local = read_local(self.local.as_ref());
        let remote = match &self.remote {
            Some(remote) => match remote.load().await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(remote = remote.name(), error = %e, "Remote load failed, using local copy");
                    None
                }
            },
            None => None,
        };

        match (local, remote) {
            (Some(local), Some(remote)) if !remote.is_newer_than(&local) => Some(local),
            (_, Some(remote)) => {
                if let Err(e) = write_local(self.local.as_ref(), &remote) {
                    tracing::warn!(error = %e, "Failed to promote remote navigation to local store");
                }
                Some(remote)
            }
            (local, None) => local,
        }
    }
}
