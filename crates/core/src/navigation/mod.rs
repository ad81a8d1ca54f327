//! Navigation data model.
//!
//! Two shapes live side by side: the tree-editing shape ([`NavigationNode`],
//! every node carries a stable id) and the wire shapes persisted to disk
//! ([`HeaderData`], [`FooterData`], [`LayoutConfig`]).

pub mod footer;
pub mod header;
pub mod layout;
pub mod node;

pub use footer::{FooterData, FooterLink, FooterLinkGroup, SocialLink};
pub use header::{HeaderAction, HeaderData, HeaderLink, HeaderTree};
pub use layout::{LayoutConfig, LayoutType, SidebarPosition};
pub use node::{LinkTarget, NavigationNode, NodeDraft};
