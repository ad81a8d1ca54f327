use serde::{Deserialize, Serialize};

use crate::dragdrop::DropPosition;
use crate::navigation::{FooterData, HeaderData, HeaderTree, LayoutConfig};
use crate::types::{NodeId, Timestamp};

/// Transient drag-and-drop state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    pub is_dragging: bool,
    pub dragged_node_id: Option<NodeId>,
    pub drop_target_id: Option<NodeId>,
    pub drop_position: Option<DropPosition>,
}

/// Aggregate editor state owned by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState {
    /// Header links in tree-editing shape.
    pub header: HeaderTree,
    pub footer_data: FooterData,
    pub layout: LayoutConfig,
    /// Set by every content mutation, cleared by a save acknowledgment.
    pub is_dirty: bool,
    pub last_saved: Option<Timestamp>,
    /// Read-only projection of the drag session.
    pub drag_state: DragState,
}

impl NavigationState {
    /// Fresh, clean state from wire data.
    pub fn new(header_data: &HeaderData, footer_data: FooterData, layout: LayoutConfig) -> Self {
        Self {
            header: HeaderTree::from_header_data(header_data),
            footer_data,
            layout,
            ..Default::default()
        }
    }

    /// Header navigation in wire shape.
    pub fn header_data(&self) -> HeaderData {
        self.header.to_header_data()
    }
}
