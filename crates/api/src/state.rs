use std::sync::Arc;

use navedit_events::EventBus;
use navedit_persistence::LocalStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Where saved navigation envelopes live.
    pub store: Arc<dyn LocalStore>,
    /// Saves are announced here.
    pub event_bus: Arc<EventBus>,
}
