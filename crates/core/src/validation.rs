//! Field and structural validation for navigation nodes and trees.
//!
//! Validation never fails with an error: every check produces a
//! [`ValidationReport`] whose [`FieldError`]s carry a field path the editing
//! UI can route to the matching form control.

use serde::{Deserialize, Serialize};

use crate::dragdrop::tree::get_node_depth;
use crate::navigation::{LinkTarget, NavigationNode, NodeDraft};

/// Default maximum nesting depth of a navigation tree (root level = 1).
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Field name used for whole-tree depth violations.
pub const TREE_FIELD: &str = "tree";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Aggregated outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Build a report from collected errors; valid iff there are none.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// A passing report.
    pub fn ok() -> Self {
        Self::from_errors(Vec::new())
    }

    /// A failing report with a single error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_errors(vec![FieldError::new(field, message)])
    }

    /// Errors reported against `field`.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }
}

// ---------------------------------------------------------------------------
// Node validation
// ---------------------------------------------------------------------------

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn check_draft(draft: &NodeDraft, href_optional: bool) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(draft.text.as_deref()) {
        errors.push(FieldError::new("text", "Text is required"));
    }

    if is_blank(draft.href.as_deref()) && !(href_optional && draft.has_nested_links) {
        errors.push(FieldError::new("href", "URL is required"));
    }

    if let Some(target) = draft.target.as_deref() {
        if target.parse::<LinkTarget>().is_err() {
            errors.push(FieldError::new(
                "target",
                "Target must be either _blank or _self",
            ));
        }
    }

    errors
}

/// Validate a single navigation node as typed into the edit form.
///
/// `text` and `href` must be present and non-blank; `target`, when present,
/// must be `_blank` or `_self`. Every failure is reported.
pub fn validate_node(draft: &NodeDraft) -> ValidationReport {
    ValidationReport::from_errors(check_draft(draft, false))
}

/// Validate a header link. Same rules as [`validate_node`] except that
/// `href` may be omitted when the link groups nested links.
pub fn validate_header_link(draft: &NodeDraft) -> ValidationReport {
    ValidationReport::from_errors(check_draft(draft, true))
}

// ---------------------------------------------------------------------------
// Tree validation
// ---------------------------------------------------------------------------

/// Nesting depth of a tree: 0 when empty, 1 for a flat list.
pub fn get_max_depth(nodes: &[NavigationNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + get_max_depth(node.child_nodes()))
        .max()
        .unwrap_or(0)
}

fn collect_node_errors(
    nodes: &[NavigationNode],
    prefix: &str,
    href_optional: bool,
    errors: &mut Vec<FieldError>,
) {
    for (index, node) in nodes.iter().enumerate() {
        let path = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{prefix}.{index}")
        };

        if node.id.trim().is_empty() {
            errors.push(FieldError::new(format!("{path}.id"), "ID is required"));
        }

        for error in check_draft(&NodeDraft::from(node), href_optional) {
            errors.push(FieldError::new(
                format!("{path}.{}", error.field),
                error.message,
            ));
        }

        if let Some(children) = node.children.as_deref() {
            collect_node_errors(children, &format!("{path}.children"), href_optional, errors);
        }
    }
}

/// Validate a whole tree: depth limit plus every node's own fields.
///
/// A depth violation yields exactly one error on the `"tree"` field. Node
/// errors use dotted index paths such as `"0.children.1.href"`.
pub fn validate_tree(tree: &[NavigationNode], max_depth: usize) -> ValidationReport {
    check_tree(tree, max_depth, false)
}

/// [`validate_tree`] with header link rules: a node with children is a
/// group and may have a blank `href`.
pub fn validate_header_tree(tree: &[NavigationNode], max_depth: usize) -> ValidationReport {
    check_tree(tree, max_depth, true)
}

fn check_tree(tree: &[NavigationNode], max_depth: usize, href_optional: bool) -> ValidationReport {
    let mut errors = Vec::new();

    let depth = get_max_depth(tree);
    if depth > max_depth {
        errors.push(FieldError::new(
            TREE_FIELD,
            format!("Navigation depth {depth} exceeds the maximum of {max_depth} levels"),
        ));
    }

    collect_node_errors(tree, "", href_optional, &mut errors);
    ValidationReport::from_errors(errors)
}

/// Whether a child may be added under `parent_id` without breaking the depth
/// limit. An unknown parent is permitted; resolving it is the caller's job.
pub fn can_add_child(tree: &[NavigationNode], parent_id: &str, max_depth: usize) -> bool {
    match get_node_depth(tree, parent_id) {
        Some(parent_depth) => parent_depth + 1 <= max_depth,
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
