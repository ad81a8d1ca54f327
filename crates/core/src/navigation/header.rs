//! Header navigation: wire shape and tree-editing projection.

use serde::{Deserialize, Serialize};

use super::node::{LinkTarget, NavigationNode, NodeDraft};
use crate::types::new_node_id;

/// A header menu entry as persisted. Carries no id.
///
/// `href` may be omitted when the entry only groups nested `links`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLink {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LinkTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<HeaderLink>>,
}

impl HeaderLink {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: Some(href.into()),
            ..Default::default()
        }
    }

    /// A grouping entry with nested links and no href of its own.
    pub fn group(text: impl Into<String>, links: Vec<HeaderLink>) -> Self {
        Self {
            text: text.into(),
            links: Some(links),
            ..Default::default()
        }
    }
}

impl From<&HeaderLink> for NodeDraft {
    fn from(link: &HeaderLink) -> Self {
        Self {
            text: Some(link.text.clone()),
            href: link.href.clone(),
            target: link.target.map(|t| t.as_str().to_string()),
            icon: link.icon.clone(),
            has_nested_links: link.links.as_ref().is_some_and(|l| !l.is_empty()),
        }
    }
}

/// Flat call-to-action button shown next to the header menu.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderAction {
    pub text: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LinkTarget>,
}

/// Persisted header navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderData {
    pub links: Vec<HeaderLink>,
    pub actions: Vec<HeaderAction>,
}

// ---------------------------------------------------------------------------
// HeaderTree
// ---------------------------------------------------------------------------

/// Header navigation in tree-editing shape.
///
/// Every link receives a stable id once, when it enters the editor, so moving
/// or editing a link never has to re-derive identity from its position.
/// [`HeaderTree::to_header_data`] is a pure projection back to the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderTree {
    pub links: Vec<NavigationNode>,
    pub actions: Vec<HeaderAction>,
}

impl HeaderTree {
    /// Lift wire data into the editing shape, assigning fresh ids.
    pub fn from_header_data(data: &HeaderData) -> Self {
        Self {
            links: data.links.iter().map(link_to_node).collect(),
            actions: data.actions.clone(),
        }
    }

    /// Project back to the wire shape, dropping ids.
    pub fn to_header_data(&self) -> HeaderData {
        HeaderData {
            links: self.links.iter().map(node_to_link).collect(),
            actions: self.actions.clone(),
        }
    }
}

/// Convert a wire link (and its nested links) into a tree node with new ids.
pub fn link_to_node(link: &HeaderLink) -> NavigationNode {
    NavigationNode {
        id: new_node_id(),
        text: link.text.clone(),
        href: link.href.clone().unwrap_or_default(),
        target: link.target,
        icon: link.icon.clone(),
        children: link
            .links
            .as_ref()
            .map(|links| links.iter().map(link_to_node).collect()),
    }
}

/// Convert a tree node back into a wire link. An empty `href` becomes `None`.
pub fn node_to_link(node: &NavigationNode) -> HeaderLink {
    HeaderLink {
        text: node.text.clone(),
        href: (!node.href.is_empty()).then(|| node.href.clone()),
        target: node.target,
        icon: node.icon.clone(),
        links: node
            .children
            .as_ref()
            .map(|children| children.iter().map(node_to_link).collect()),
    }
}
