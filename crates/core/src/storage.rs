//! Persisted navigation envelope shared by the local store, the remote
//! store and the local save endpoint.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::navigation::{FooterData, HeaderData, LayoutConfig};
use crate::store::NavigationState;
use crate::types::Timestamp;

/// Version tag written into every envelope.
pub const STORAGE_VERSION: &str = "1.0.0";

/// Key of the envelope in the local key-value store.
pub const STORAGE_KEY: &str = "navigation-data";

/// Repository-relative path of the envelope in the remote content store.
pub const REMOTE_FILE_PATH: &str = "src/data/navigation.json";

/// Route of the local save/load endpoint.
pub const LOCAL_API_PATH: &str = "/api/navigation";

/// Versioned, timestamped snapshot of the editable navigation.
///
/// `last_updated` is the reconciliation key between local and remote copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStorageData {
    pub header_data: HeaderData,
    pub footer_data: FooterData,
    pub layout: LayoutConfig,
    pub last_updated: Timestamp,
    pub version: String,
}

impl NavigationStorageData {
    /// Build a fresh envelope from the current state, stamped now.
    pub fn from_state(state: &NavigationState) -> Self {
        Self {
            header_data: state.header_data(),
            footer_data: state.footer_data.clone(),
            layout: state.layout.clone(),
            last_updated: Utc::now(),
            version: STORAGE_VERSION.to_string(),
        }
    }

    /// Whether this copy was written after `other`.
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.last_updated > other.last_updated
    }
}
