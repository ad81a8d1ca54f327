//! Local save server for the navigation editor.
//!
//! Serves the stored navigation envelope to the editor during development
//! and accepts saves, plus the two export artifacts. Exposes its building
//! blocks so integration tests and the binary share them.

pub mod config;
pub mod error;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
