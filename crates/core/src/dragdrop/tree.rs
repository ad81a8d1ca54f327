//! Tree primitives used by drag-and-drop reordering.
//!
//! Lookups borrow the tree immutably. [`remove_node`] and [`insert_node`]
//! take `&mut` and edit in place; [`move_node`] only ever runs them on its
//! own clone, so the caller's tree is never touched.

use serde::{Deserialize, Serialize};

use crate::navigation::NavigationNode;
use crate::types::NodeId;
use crate::validation::get_max_depth;

/// Where a dragged node lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    /// Sibling, immediately before the target.
    Before,
    /// Sibling, immediately after the target.
    After,
    /// Last child of the target.
    Child,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find a node anywhere in the tree.
pub fn find_node_by_id<'a>(tree: &'a [NavigationNode], id: &str) -> Option<&'a NavigationNode> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_by_id(node.child_nodes(), id) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_node_mut<'a>(
    tree: &'a mut [NavigationNode],
    id: &str,
) -> Option<&'a mut NavigationNode> {
    for node in tree.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Location of a node inside its sibling list.
#[derive(Debug, Clone, Copy)]
pub struct ParentLookup<'a> {
    /// Parent node, `None` for root-level nodes.
    pub parent: Option<&'a NavigationNode>,
    /// Position of the node among its siblings.
    pub index: usize,
    /// The sibling list that contains the node.
    pub siblings: &'a [NavigationNode],
}

fn find_parent_in<'a>(
    siblings: &'a [NavigationNode],
    parent: Option<&'a NavigationNode>,
    id: &str,
) -> Option<ParentLookup<'a>> {
    if let Some(index) = siblings.iter().position(|n| n.id == id) {
        return Some(ParentLookup {
            parent,
            index,
            siblings,
        });
    }
    siblings
        .iter()
        .find_map(|node| find_parent_in(node.child_nodes(), Some(node), id))
}

/// Find the parent, index and sibling list of the node with `id`.
pub fn find_parent_node<'a>(tree: &'a [NavigationNode], id: &str) -> Option<ParentLookup<'a>> {
    find_parent_in(tree, None, id)
}

fn siblings_of_mut<'a>(
    tree: &'a mut Vec<NavigationNode>,
    id: &str,
) -> Option<(&'a mut Vec<NavigationNode>, usize)> {
    if let Some(index) = tree.iter().position(|n| n.id == id) {
        return Some((tree, index));
    }
    for node in tree.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = siblings_of_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// 1-based depth of the node with `id`, or `None` if it is not in the tree.
pub fn get_node_depth(tree: &[NavigationNode], id: &str) -> Option<usize> {
    fn walk(nodes: &[NavigationNode], id: &str, depth: usize) -> Option<usize> {
        nodes.iter().find_map(|node| {
            if node.id == id {
                Some(depth)
            } else {
                walk(node.child_nodes(), id, depth + 1)
            }
        })
    }
    walk(tree, id, 1)
}

/// Height of the subtree rooted at `node`; a leaf has height 1.
pub fn get_subtree_depth(node: &NavigationNode) -> usize {
    1 + get_max_depth(node.child_nodes())
}

/// Whether `descendant_id` sits strictly below `ancestor_id`.
pub fn is_descendant(tree: &[NavigationNode], ancestor_id: &str, descendant_id: &str) -> bool {
    find_node_by_id(tree, ancestor_id)
        .is_some_and(|ancestor| find_node_by_id(ancestor.child_nodes(), descendant_id).is_some())
}

// ---------------------------------------------------------------------------
// Drop validity
// ---------------------------------------------------------------------------

/// Whether dropping `source_id` at `position` relative to `target_id` keeps
/// the tree acyclic and within `max_depth`.
///
/// A sibling drop lands under the target's current parent, a child drop
/// lands under the target itself, so the depth check differs per position.
pub fn is_valid_drop(
    tree: &[NavigationNode],
    source_id: &str,
    target_id: &str,
    position: DropPosition,
    max_depth: usize,
) -> bool {
    if source_id == target_id {
        return false;
    }
    if is_descendant(tree, source_id, target_id) {
        return false;
    }

    let Some(source) = find_node_by_id(tree, source_id) else {
        return false;
    };
    let Some(target_depth) = get_node_depth(tree, target_id) else {
        return false;
    };
    let source_height = get_subtree_depth(source);

    let new_parent_depth = match position {
        DropPosition::Child => target_depth,
        DropPosition::Before | DropPosition::After => {
            match find_parent_node(tree, target_id).and_then(|lookup| lookup.parent) {
                Some(parent) => get_node_depth(tree, &parent.id).unwrap_or(0),
                None => 0,
            }
        }
    };

    new_parent_depth + source_height <= max_depth
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Deep copy of a tree.
pub fn clone_tree(tree: &[NavigationNode]) -> Vec<NavigationNode> {
    tree.to_vec()
}

/// Detach the node with `id` (and its subtree) from `tree` in place.
///
/// Root level is searched first, then each subtree in order.
pub fn remove_node(tree: &mut Vec<NavigationNode>, id: &str) -> Option<NavigationNode> {
    if let Some(index) = tree.iter().position(|n| n.id == id) {
        return Some(tree.remove(index));
    }
    for node in tree.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            if let Some(removed) = remove_node(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

/// Insert `node` relative to `target_id` in place.
///
/// `Child` appends to the target's children, creating the list if needed.
/// When the target is missing the node is handed back in `Err`.
pub fn insert_node(
    tree: &mut Vec<NavigationNode>,
    node: NavigationNode,
    target_id: &str,
    position: DropPosition,
) -> Result<(), NavigationNode> {
    match position {
        DropPosition::Child => match find_node_mut(tree, target_id) {
            Some(target) => {
                target.children.get_or_insert_with(Vec::new).push(node);
                Ok(())
            }
            None => Err(node),
        },
        DropPosition::Before | DropPosition::After => match siblings_of_mut(tree, target_id) {
            Some((siblings, index)) => {
                let at = if position == DropPosition::Before {
                    index
                } else {
                    index + 1
                };
                siblings.insert(at, node);
                Ok(())
            }
            None => Err(node),
        },
    }
}

/// Outcome of a tree move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeUpdateResult {
    pub success: bool,
    pub tree: Vec<NavigationNode>,
    pub moved_node_id: Option<NodeId>,
    pub new_parent_id: Option<NodeId>,
    pub new_index: Option<usize>,
}

impl TreeUpdateResult {
    /// A failed move carrying the tree exactly as it was given.
    pub fn unchanged(tree: &[NavigationNode]) -> Self {
        Self {
            success: false,
            tree: tree.to_vec(),
            moved_node_id: None,
            new_parent_id: None,
            new_index: None,
        }
    }
}

/// Move `source_id` to `position` relative to `target_id`.
///
/// Works on a clone; on any failure the returned tree equals the input.
/// Drop validity is not checked here, see [`is_valid_drop`].
pub fn move_node(
    tree: &[NavigationNode],
    source_id: &str,
    target_id: &str,
    position: DropPosition,
) -> TreeUpdateResult {
    let mut working = clone_tree(tree);

    let Some(node) = remove_node(&mut working, source_id) else {
        return TreeUpdateResult::unchanged(tree);
    };
    if insert_node(&mut working, node, target_id, position).is_err() {
        return TreeUpdateResult::unchanged(tree);
    }

    let (new_parent_id, new_index) = match find_parent_node(&working, source_id) {
        Some(lookup) => (lookup.parent.map(|p| p.id.clone()), Some(lookup.index)),
        None => (None, None),
    };

    TreeUpdateResult {
        success: true,
        tree: working,
        moved_node_id: Some(source_id.to_string()),
        new_parent_id,
        new_index,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
