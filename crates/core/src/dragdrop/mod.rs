//! Drag-and-drop reordering of navigation trees.
//!
//! [`tree`] holds the tree primitives (lookup, depth, drop validity, move);
//! [`manager`] wraps them in a single-flight drag session with
//! commit-or-cancel semantics.

pub mod manager;
pub mod tree;

pub use manager::{DragDropManager, DragPhase};
pub use tree::{DropPosition, ParentLookup, TreeUpdateResult};
