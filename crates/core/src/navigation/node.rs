//! Tree-editing node shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::NodeId;

// ---------------------------------------------------------------------------
// LinkTarget
// ---------------------------------------------------------------------------

/// Browsing context a link opens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    #[serde(rename = "_blank")]
    Blank,
    #[serde(rename = "_self")]
    SelfFrame,
}

impl LinkTarget {
    /// Wire value of the target.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "_blank",
            Self::SelfFrame => "_self",
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "_blank" => Ok(Self::Blank),
            "_self" => Ok(Self::SelfFrame),
            other => Err(CoreError::Validation(format!(
                "Invalid link target '{other}'. Must be one of: _blank, _self"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// NavigationNode
// ---------------------------------------------------------------------------

/// One link in a navigation tree.
///
/// `id`, `text` and `href` default to empty strings when absent from
/// imported JSON so that the validator can report them as missing instead of
/// the import failing outright.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationNode {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LinkTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavigationNode>>,
}

impl NavigationNode {
    /// Create a leaf node.
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            href: href.into(),
            ..Default::default()
        }
    }

    /// Attach child nodes.
    pub fn with_children(mut self, children: Vec<NavigationNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Set the link target.
    pub fn with_target(mut self, target: LinkTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the icon identifier.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Child nodes, empty when the node has none.
    pub fn child_nodes(&self) -> &[NavigationNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.child_nodes().is_empty()
    }
}

// ---------------------------------------------------------------------------
// NodeDraft
// ---------------------------------------------------------------------------

/// Partially filled node as typed into an edit form.
///
/// Every field is optional and `target` is kept as free text so that form
/// input can be validated before it is turned into a [`NavigationNode`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraft {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Whether the draft groups nested links.
    #[serde(default)]
    pub has_nested_links: bool,
}

impl NodeDraft {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            href: Some(href.into()),
            ..Default::default()
        }
    }
}

impl From<&NavigationNode> for NodeDraft {
    fn from(node: &NavigationNode) -> Self {
        Self {
            text: Some(node.text.clone()),
            href: Some(node.href.clone()),
            target: node.target.map(|t| t.as_str().to_string()),
            icon: node.icon.clone(),
            has_nested_links: node.has_children(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_target_parses_wire_values() {
        assert_eq!("_blank".parse::<LinkTarget>().unwrap(), LinkTarget::Blank);
        assert_eq!("_self".parse::<LinkTarget>().unwrap(), LinkTarget::SelfFrame);
        assert!("_parent".parse::<LinkTarget>().is_err());
        assert!("".parse::<LinkTarget>().is_err());
    }

    #[test]
    fn node_serializes_camel_case_without_empty_options() {
        let node = NavigationNode::new("home", "Home", "/");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"id": "home", "text": "Home", "href": "/"}));
    }

    #[test]
    fn node_missing_fields_deserialize_as_empty() {
        let node: NavigationNode = serde_json::from_str(r#"{"text": "Docs"}"#).unwrap();
        assert_eq!(node.id, "");
        assert_eq!(node.href, "");
        assert!(node.children.is_none());
    }

    #[test]
    fn draft_from_node_carries_target_as_text() {
        let node = NavigationNode::new("gh", "GitHub", "https://github.com")
            .with_target(LinkTarget::Blank);
        let draft = NodeDraft::from(&node);
        assert_eq!(draft.target.as_deref(), Some("_blank"));
        assert!(!draft.has_nested_links);
    }
}
