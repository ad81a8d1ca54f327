//! Pure `(state, action) -> state` transition function.

use std::sync::Arc;

use crate::dragdrop::tree::{find_node_mut, insert_node, remove_node};
use crate::dragdrop::DropPosition;
use crate::navigation::{FooterLink, FooterLinkGroup, HeaderTree, NavigationNode};
use crate::types::new_node_id;

use super::action::{FooterKey, NavTarget, NavigationAction, NodeUpdate};
use super::state::{DragState, NavigationState};

/// Apply `action` to `state`.
///
/// Content edits set `is_dirty`. An action that resolves to nothing (unknown
/// id, malformed footer key, out-of-range index, failed move) returns the
/// same `Arc` it was given.
pub fn reduce(state: &Arc<NavigationState>, action: NavigationAction) -> Arc<NavigationState> {
    match action {
        NavigationAction::SetHeaderData(data) => edit(state, |s| {
            s.header = HeaderTree::from_header_data(&data);
            true
        }),
        NavigationAction::SetFooterData(data) => edit(state, |s| {
            s.footer_data = data;
            true
        }),
        NavigationAction::SetLayout(layout) => edit(state, |s| {
            s.layout = layout;
            true
        }),
        NavigationAction::AddNode {
            parent_id,
            node,
            target,
        } => edit(state, |s| match target {
            NavTarget::Header => add_header_node(s, parent_id.as_deref(), node),
            NavTarget::Footer => add_footer_entry(s, parent_id.as_deref(), node),
        }),
        NavigationAction::UpdateNode {
            node_id,
            updates,
            target,
        } => edit(state, |s| match target {
            NavTarget::Header => match find_node_mut(&mut s.header.links, &node_id) {
                Some(node) => {
                    updates.apply_to_node(node);
                    true
                }
                None => false,
            },
            NavTarget::Footer => update_footer_entry(s, &node_id, &updates),
        }),
        NavigationAction::DeleteNode { node_id, target } => edit(state, |s| match target {
            NavTarget::Header => remove_node(&mut s.header.links, &node_id).is_some(),
            NavTarget::Footer => delete_footer_entry(s, &node_id),
        }),
        NavigationAction::MoveNode(result) => {
            if !result.success {
                return Arc::clone(state);
            }
            edit(state, |s| {
                s.header.links = result.tree;
                true
            })
        }
        NavigationAction::StartDrag { node_id } => project_drag(
            state,
            DragState {
                is_dragging: true,
                dragged_node_id: Some(node_id),
                drop_target_id: None,
                drop_position: None,
            },
        ),
        NavigationAction::UpdateDropTarget {
            target_id,
            position,
        } => {
            if !state.drag_state.is_dragging {
                return Arc::clone(state);
            }
            project_drag(
                state,
                DragState {
                    drop_target_id: target_id,
                    drop_position: position,
                    ..state.drag_state.clone()
                },
            )
        }
        NavigationAction::EndDrag => project_drag(state, DragState::default()),
        NavigationAction::MarkSaved { saved_at } => {
            let mut next = NavigationState::clone(state);
            next.is_dirty = false;
            next.last_saved = Some(saved_at);
            Arc::new(next)
        }
        NavigationAction::Hydrate(data) => {
            let mut next = NavigationState::new(&data.header_data, data.footer_data, data.layout);
            next.last_saved = Some(data.last_updated);
            Arc::new(next)
        }
    }
}

/// Clone-and-edit. `apply` returns whether it changed anything; if not, the
/// original `Arc` is returned.
fn edit(
    state: &Arc<NavigationState>,
    apply: impl FnOnce(&mut NavigationState) -> bool,
) -> Arc<NavigationState> {
    let mut next = NavigationState::clone(state);
    if !apply(&mut next) {
        return Arc::clone(state);
    }
    next.is_dirty = true;
    Arc::new(next)
}

fn project_drag(state: &Arc<NavigationState>, drag: DragState) -> Arc<NavigationState> {
    if state.drag_state == drag {
        return Arc::clone(state);
    }
    let mut next = NavigationState::clone(state);
    next.drag_state = drag;
    Arc::new(next)
}

// ---------------------------------------------------------------------------
// Header edits
// ---------------------------------------------------------------------------

fn add_header_node(
    state: &mut NavigationState,
    parent_id: Option<&str>,
    mut node: NavigationNode,
) -> bool {
    if node.id.is_empty() {
        node.id = new_node_id();
    }
    match parent_id {
        None => {
            state.header.links.push(node);
            true
        }
        Some(parent) => insert_node(&mut state.header.links, node, parent, DropPosition::Child)
            .map_err(|node| {
                tracing::debug!(parent, node_id = %node.id, "Parent link not found");
            })
            .is_ok(),
    }
}

// ---------------------------------------------------------------------------
// Footer edits
// ---------------------------------------------------------------------------

fn add_footer_entry(
    state: &mut NavigationState,
    parent_id: Option<&str>,
    node: NavigationNode,
) -> bool {
    let Some(parent) = parent_id else {
        state.footer_data.links.push(FooterLinkGroup {
            title: node.text,
            links: Vec::new(),
        });
        return true;
    };

    let Ok(group_index) = parent.parse::<usize>() else {
        tracing::debug!(parent, "Footer parent must be a group index");
        return false;
    };
    match state.footer_data.links.get_mut(group_index) {
        Some(group) => {
            group.links.push(FooterLink {
                text: node.text,
                href: node.href,
            });
            true
        }
        None => false,
    }
}

fn update_footer_entry(state: &mut NavigationState, key: &str, updates: &NodeUpdate) -> bool {
    let Ok(key) = key.parse::<FooterKey>() else {
        return false;
    };
    match key {
        FooterKey::Group(group) => match state.footer_data.links.get_mut(group) {
            Some(group) => {
                if let Some(title) = &updates.text {
                    group.title = title.clone();
                }
                true
            }
            None => false,
        },
        FooterKey::Link { group, link } => {
            let Some(link) = state
                .footer_data
                .links
                .get_mut(group)
                .and_then(|g| g.links.get_mut(link))
            else {
                return false;
            };
            if let Some(text) = &updates.text {
                link.text = text.clone();
            }
            if let Some(href) = &updates.href {
                link.href = href.clone();
            }
            true
        }
    }
}

fn delete_footer_entry(state: &mut NavigationState, key: &str) -> bool {
    let Ok(key) = key.parse::<FooterKey>() else {
        return false;
    };
    let groups = &mut state.footer_data.links;
    match key {
        FooterKey::Group(group) if group < groups.len() => {
            groups.remove(group);
            true
        }
        FooterKey::Link { group, link } => match groups.get_mut(group) {
            Some(group) if link < group.links.len() => {
                group.links.remove(link);
                true
            }
            _ => false,
        },
        FooterKey::Group(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
