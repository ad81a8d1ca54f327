//! Editor event bus.
//!
//! The editing session publishes drag lifecycle transitions and save
//! outcomes here so that views, the store projection and loggers can follow
//! along without the session knowing about them.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`EditorEvent`] -- the event envelope, with its type names in
//!   [`event_types`].

pub mod bus;

pub use bus::{event_types, EditorEvent, EventBus};
