//! Navigation tree editing core.
//!
//! Pure building blocks for the header/footer navigation editor: the data
//! model, field and structural validation, JSON and source-text
//! serialization, drag-and-drop tree mutation, and the reducer that owns
//! the editor state. Nothing in this crate performs I/O.

pub mod codegen;
pub mod dragdrop;
pub mod error;
pub mod navigation;
pub mod serializer;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;
