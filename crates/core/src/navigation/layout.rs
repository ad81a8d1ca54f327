//! Page layout configuration stored alongside the navigation.

use serde::{Deserialize, Serialize};

/// Overall page layout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Default,
    Landing,
    Blog,
    Docs,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    Left,
    Right,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    pub header_visible: bool,
    pub footer_visible: bool,
    pub sidebar_position: SidebarPosition,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_type: LayoutType::Default,
            header_visible: true,
            footer_visible: true,
            sidebar_position: SidebarPosition::None,
        }
    }
}
