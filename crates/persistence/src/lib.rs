//! Debounced local and remote persistence for navigation data.
//!
//! - [`Debouncer`] -- trailing-edge debounce on the tokio timer.
//! - [`LocalStore`] -- synchronous key-value store ([`MemoryStore`],
//!   [`FileStore`]).
//! - [`RemoteStore`] -- async remote copy ([`LocalApiRemote`],
//!   [`GitHubRemote`]).
//! - [`NavigationPersistence`] -- auto-save, explicit saves and load with
//!   reconciliation by `lastUpdated`.

pub mod config;
pub mod debounce;
pub mod local;
pub mod remote;
pub mod service;

pub use config::{ConfigError, GitHubConfig, PersistenceConfig};
pub use debounce::Debouncer;
pub use local::{FileStore, LocalStore, MemoryStore, StoreError};
pub use remote::{remote_from_config, GitHubRemote, LocalApiRemote, RemoteError, RemoteStore};
pub use service::{NavigationPersistence, PersistenceCallbacks, PersistenceError, SaveResult};
