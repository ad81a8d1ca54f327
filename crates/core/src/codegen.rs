//! TypeScript source generator for the site's navigation module.
//!
//! Produces a `navigation.ts` equivalent of the header and footer data. The
//! output is for export only and is never parsed back.
//!
//! Internal links are routed through the site's permalink helpers:
//!
//! | href              | emitted                       |
//! |-------------------|-------------------------------|
//! | `/blog`           | `getBlogPermalink()`          |
//! | `/blog/<rest>`    | `getBlogPermalink('<rest>')`  |
//! | `/...` or `#...`  | `getPermalink('<href>')`      |
//! | anything else     | `'<href>'`                    |

use crate::navigation::{
    FooterData, FooterLink, HeaderAction, HeaderData, HeaderLink, LinkTarget, SocialLink,
};

/// Import line placed at the top of the generated module.
pub const PERMALINK_IMPORT: &str =
    "import { getPermalink, getBlogPermalink } from './utils/permalinks';";

const INDENT: &str = "  ";

/// Escape `value` for embedding in a single-quoted TypeScript string.
pub fn escape_ts_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn quoted(value: &str) -> String {
    format!("'{}'", escape_ts_string(value))
}

/// TypeScript expression for an href.
pub fn href_expression(href: &str) -> String {
    if href == "/blog" {
        return "getBlogPermalink()".to_string();
    }
    if let Some(rest) = href.strip_prefix("/blog/") {
        return format!("getBlogPermalink({})", quoted(rest));
    }
    if href.starts_with('/') || href.starts_with('#') {
        return format!("getPermalink({})", quoted(href));
    }
    quoted(href)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Line-oriented builder that tracks the current indent level.
struct TsWriter {
    out: String,
    depth: usize,
}

impl TsWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn property(&mut self, key: &str, expression: &str) {
        self.line(&format!("{key}: {expression},"));
    }

    fn target(&mut self, target: Option<LinkTarget>) {
        if let Some(target) = target {
            self.property("target", &quoted(target.as_str()));
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn write_header_link(w: &mut TsWriter, link: &HeaderLink) {
    w.open("{");
    w.property("text", &quoted(&link.text));
    if let Some(href) = &link.href {
        w.property("href", &href_expression(href));
    }
    w.target(link.target);
    if let Some(icon) = &link.icon {
        w.property("icon", &quoted(icon));
    }
    if let Some(links) = &link.links {
        w.open("links: [");
        for child in links {
            write_header_link(w, child);
        }
        w.close("],");
    }
    w.close("},");
}

fn write_header_action(w: &mut TsWriter, action: &HeaderAction) {
    w.open("{");
    w.property("text", &quoted(&action.text));
    w.property("href", &href_expression(&action.href));
    w.target(action.target);
    w.close("},");
}

fn write_footer_link(w: &mut TsWriter, link: &FooterLink) {
    w.line(&format!(
        "{{ text: {}, href: {} }},",
        quoted(&link.text),
        href_expression(&link.href)
    ));
}

fn write_social_link(w: &mut TsWriter, link: &SocialLink) {
    w.line(&format!(
        "{{ ariaLabel: {}, icon: {}, href: {} }},",
        quoted(&link.aria_label),
        quoted(&link.icon),
        href_expression(&link.href)
    ));
}

fn write_header(w: &mut TsWriter, header: &HeaderData) {
    w.open("export const headerData = {");
    w.open("links: [");
    for link in &header.links {
        write_header_link(w, link);
    }
    w.close("],");
    w.open("actions: [");
    for action in &header.actions {
        write_header_action(w, action);
    }
    w.close("],");
    w.close("};");
}

fn write_footer(w: &mut TsWriter, footer: &FooterData) {
    w.open("export const footerData = {");

    w.open("links: [");
    for group in &footer.links {
        w.open("{");
        w.property("title", &quoted(&group.title));
        w.open("links: [");
        for link in &group.links {
            write_footer_link(w, link);
        }
        w.close("],");
        w.close("},");
    }
    w.close("],");

    w.open("secondaryLinks: [");
    for link in &footer.secondary_links {
        write_footer_link(w, link);
    }
    w.close("],");

    w.open("socialLinks: [");
    for link in &footer.social_links {
        write_social_link(w, link);
    }
    w.close("],");

    w.property("footNote", &quoted(&footer.foot_note));
    w.close("};");
}

/// Render the navigation module for `header` and `footer`.
pub fn to_typescript(header: &HeaderData, footer: &FooterData) -> String {
    let mut w = TsWriter::new();
    w.line(PERMALINK_IMPORT);
    w.line("");
    write_header(&mut w, header);
    w.line("");
    write_footer(&mut w, footer);
    w.finish()
}
