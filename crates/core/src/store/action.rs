use std::fmt;
use std::str::FromStr;

use chrono::Utc;

use crate::dragdrop::{DropPosition, TreeUpdateResult};
use crate::error::CoreError;
use crate::navigation::{FooterData, HeaderData, LayoutConfig, LinkTarget, NavigationNode};
use crate::storage::NavigationStorageData;
use crate::types::{NodeId, Timestamp};

/// Which navigation area an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Header,
    Footer,
}

/// Field updates merged onto an existing link. `None` leaves a field as is.
///
/// `target` and `icon` are doubly optional so an update can clear them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeUpdate {
    pub text: Option<String>,
    pub href: Option<String>,
    pub target: Option<Option<LinkTarget>>,
    pub icon: Option<Option<String>>,
}

impl NodeUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Default::default()
        }
    }

    /// Merge onto a tree node.
    pub fn apply_to_node(&self, node: &mut NavigationNode) {
        if let Some(text) = &self.text {
            node.text = text.clone();
        }
        if let Some(href) = &self.href {
            node.href = href.clone();
        }
        if let Some(target) = self.target {
            node.target = target;
        }
        if let Some(icon) = &self.icon {
            node.icon = icon.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// FooterKey
// ---------------------------------------------------------------------------

/// Positional key addressing a footer group or one link inside a group.
///
/// String forms are `group-{i}` and `link-{i}-{j}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterKey {
    Group(usize),
    Link { group: usize, link: usize },
}

impl fmt::Display for FooterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(group) => write!(f, "group-{group}"),
            Self::Link { group, link } => write!(f, "link-{group}-{link}"),
        }
    }
}

impl FromStr for FooterKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("Invalid footer key '{s}'"));

        if let Some(rest) = s.strip_prefix("group-") {
            return rest.parse().map(Self::Group).map_err(|_| invalid());
        }
        if let Some(rest) = s.strip_prefix("link-") {
            let (group, link) = rest.split_once('-').ok_or_else(invalid)?;
            return Ok(Self::Link {
                group: group.parse().map_err(|_| invalid())?,
                link: link.parse().map_err(|_| invalid())?,
            });
        }
        Err(invalid())
    }
}

// ---------------------------------------------------------------------------
// NavigationAction
// ---------------------------------------------------------------------------

/// Every state transition the store understands.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    SetHeaderData(HeaderData),
    SetFooterData(FooterData),
    SetLayout(LayoutConfig),
    /// Header: append under `parent_id` (root when `None`).
    /// Footer: `None` creates a group titled `node.text`; `Some("{i}")`
    /// appends a link to group `i`.
    AddNode {
        parent_id: Option<String>,
        node: NavigationNode,
        target: NavTarget,
    },
    /// Header: `node_id` is a node id. Footer: `node_id` is a [`FooterKey`].
    UpdateNode {
        node_id: String,
        updates: NodeUpdate,
        target: NavTarget,
    },
    DeleteNode {
        node_id: String,
        target: NavTarget,
    },
    /// Replace the header tree with the outcome of a drag-and-drop move.
    MoveNode(TreeUpdateResult),
    StartDrag {
        node_id: NodeId,
    },
    UpdateDropTarget {
        target_id: Option<NodeId>,
        position: Option<DropPosition>,
    },
    EndDrag,
    MarkSaved {
        saved_at: Timestamp,
    },
    /// Replace content from a loaded envelope without marking it dirty.
    Hydrate(NavigationStorageData),
}

impl NavigationAction {
    /// `MarkSaved` stamped with the current time.
    pub fn mark_saved_now() -> Self {
        Self::MarkSaved {
            saved_at: Utc::now(),
        }
    }

    /// Whether the action edits persisted content (header, footer, layout).
    pub fn is_edit(&self) -> bool {
        !matches!(
            self,
            Self::StartDrag { .. }
                | Self::UpdateDropTarget { .. }
                | Self::EndDrag
                | Self::MarkSaved { .. }
                | Self::Hydrate(_)
        )
    }
}
