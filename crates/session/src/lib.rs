//! Editing session: the single API surface a navigation editor UI talks to.
//!
//! [`EditingSession`] owns the reducer state, the drag-and-drop manager and
//! the persistence service, and publishes drag and save events on an
//! [`EventBus`](navedit_events::EventBus).

pub mod session;

pub use session::{EditingSession, SessionStores};
