//! Footer navigation wire shape.
//!
//! The footer is not a general tree: named groups each hold a flat list of
//! links, followed by secondary links, social links and a foot note.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterLink {
    pub text: String,
    pub href: String,
}

impl FooterLink {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

/// A titled column of footer links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterLinkGroup {
    pub title: String,
    pub links: Vec<FooterLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub aria_label: String,
    pub icon: String,
    pub href: String,
}

/// Persisted footer navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterData {
    pub links: Vec<FooterLinkGroup>,
    pub secondary_links: Vec<FooterLink>,
    pub social_links: Vec<SocialLink>,
    pub foot_note: String,
}
