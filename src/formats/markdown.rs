//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides tree-sitter queries for parsing markdown documents
//! and extracting section structure from ATX-style headings (# syntax).

use crate::formats::Format;
use tree_sitter::Node;

/// Tree-sitter queries for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn section_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn heading_level(&self, heading: Node<'_>) -> Option<usize> {
        let marker = heading.child(0)?;
        marker
            .kind()
            .strip_prefix("atx_h")
            .and_then(|rest| rest.strip_suffix("_marker"))
            .and_then(|digit| digit.parse().ok())
    }

    fn heading_title(&self, heading: Node<'_>, source: &str) -> String {
        let text = heading
            .child_by_field_name("heading_content")
            .unwrap_or(heading)
            .utf8_text(source.as_bytes())
            .unwrap_or_default();
        text.trim()
            .trim_start_matches('#')
            .trim_end_matches('#')
            .trim()
            .to_string()
    }
}
