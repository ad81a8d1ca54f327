//! Navigation store: editor state and the reducer that evolves it.
//!
//! All mutation goes through [`reduce`]. A transition that changes nothing
//! hands back the same `Arc`, so callers can detect changes with
//! [`Arc::ptr_eq`](std::sync::Arc::ptr_eq).

pub mod action;
pub mod reducer;
pub mod state;

pub use action::{FooterKey, NavTarget, NavigationAction, NodeUpdate};
pub use reducer::reduce;
pub use state::{DragState, NavigationState};
