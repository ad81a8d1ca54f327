//! Stateful drag session over a navigation tree.
//!
//! ```text
//!   Idle ──start_drag──▶ Dragging ──update_drop_target(valid)──▶ DraggingWithTarget
//!    ▲                     ▲  │                                      │
//!    │                     └──┴──── update_drop_target(invalid) ◀────┘
//!    └──────── complete_drop / cancel_drag ◀─────────────────────────┘
//! ```
//!
//! The tree as it was at `start_drag` is kept as a snapshot and restored on
//! cancel. Only one drag may be in flight at a time.

use crate::navigation::NavigationNode;
use crate::store::DragState;
use crate::types::NodeId;

use super::tree::{self, DropPosition, TreeUpdateResult};

/// Coarse lifecycle phase of a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    DraggingWithTarget,
}

/// Owner of the in-progress drag and the working tree it applies to.
#[derive(Debug, Clone)]
pub struct DragDropManager {
    tree: Vec<NavigationNode>,
    original_tree: Option<Vec<NavigationNode>>,
    state: DragState,
    max_depth: usize,
}

impl DragDropManager {
    pub fn new(tree: Vec<NavigationNode>, max_depth: usize) -> Self {
        Self {
            tree,
            original_tree: None,
            state: DragState::default(),
            max_depth,
        }
    }

    /// The working tree.
    pub fn tree(&self) -> &[NavigationNode] {
        &self.tree
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current drag state, suitable for projecting into the store.
    pub fn drag_state(&self) -> &DragState {
        &self.state
    }

    pub fn phase(&self) -> DragPhase {
        match (self.state.is_dragging, self.state.drop_target_id.is_some()) {
            (false, _) => DragPhase::Idle,
            (true, false) => DragPhase::Dragging,
            (true, true) => DragPhase::DraggingWithTarget,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    /// Replace the working tree. Refused while a drag is in progress.
    pub fn replace_tree(&mut self, tree: Vec<NavigationNode>) -> bool {
        if self.state.is_dragging {
            tracing::warn!("Ignoring tree replacement during an active drag");
            return false;
        }
        self.tree = tree;
        true
    }

    /// Begin dragging `node_id`.
    ///
    /// Returns `false` and stays idle when the node does not exist, and
    /// returns `false` without touching the active drag when one is already
    /// in progress.
    pub fn start_drag(&mut self, node_id: &str) -> bool {
        if self.state.is_dragging {
            tracing::warn!(
                node_id,
                active = ?self.state.dragged_node_id,
                "Drag already in progress, rejecting start_drag",
            );
            return false;
        }
        if tree::find_node_by_id(&self.tree, node_id).is_none() {
            tracing::debug!(node_id, "Cannot drag unknown node");
            return false;
        }

        self.original_tree = Some(tree::clone_tree(&self.tree));
        self.state = DragState {
            is_dragging: true,
            dragged_node_id: Some(node_id.to_string()),
            drop_target_id: None,
            drop_position: None,
        };
        true
    }

    /// Point the drag at a new target.
    ///
    /// An invalid target clears any previously set target; it is not an
    /// error. Returns whether the target stuck.
    pub fn update_drop_target(&mut self, target_id: &str, position: DropPosition) -> bool {
        let Some(source_id) = self.dragged_id() else {
            return false;
        };

        if self.is_valid_drop(&source_id, target_id, position) {
            self.state.drop_target_id = Some(target_id.to_string());
            self.state.drop_position = Some(position);
            true
        } else {
            self.clear_drop_target();
            false
        }
    }

    /// Drop the current target but keep dragging.
    pub fn clear_drop_target(&mut self) {
        self.state.drop_target_id = None;
        self.state.drop_position = None;
    }

    /// Drop validity against the working tree and this manager's depth limit.
    pub fn is_valid_drop(&self, source_id: &str, target_id: &str, position: DropPosition) -> bool {
        tree::is_valid_drop(&self.tree, source_id, target_id, position, self.max_depth)
    }

    /// Apply the pending move and return to idle.
    ///
    /// Without a valid target this behaves as [`cancel_drag`](Self::cancel_drag)
    /// and reports `success: false`.
    pub fn complete_drop(&mut self) -> TreeUpdateResult {
        let pending = match (
            self.state.dragged_node_id.clone(),
            self.state.drop_target_id.clone(),
            self.state.drop_position,
        ) {
            (Some(source), Some(target), Some(position)) if self.state.is_dragging => {
                Some((source, target, position))
            }
            _ => None,
        };

        let Some((source, target, position)) = pending else {
            self.cancel_drag();
            return TreeUpdateResult::unchanged(&self.tree);
        };

        let result = tree::move_node(&self.tree, &source, &target, position);
        if result.success {
            self.tree = result.tree.clone();
            self.original_tree = None;
            self.state = DragState::default();
            tracing::debug!(
                source = %source,
                target = %target,
                ?position,
                "Drop committed",
            );
        } else {
            self.cancel_drag();
        }
        result
    }

    /// Abandon the drag and restore the tree captured at `start_drag`.
    pub fn cancel_drag(&mut self) {
        if let Some(original) = self.original_tree.take() {
            self.tree = original;
        }
        self.state = DragState::default();
    }

    fn dragged_id(&self) -> Option<NodeId> {
        if self.state.is_dragging {
            self.state.dragged_node_id.clone()
        } else {
            None
        }
    }
}
