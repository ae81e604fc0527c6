//! Format trait and the import of guides from structured text documents.
//!
//! This module defines the `Format` trait which abstracts over different
//! document formats by providing the tree-sitter grammar and heading queries
//! specific to each one. [`parse_guide`] turns the headings of a document into
//! a guide: headings nest by level and the text between two headings becomes
//! the content of the first.

pub mod markdown;

use crate::error::{GuideError, Result};
use crate::guide::{GuideGroup, GuideNode};
use std::fs;
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

/// Grammar and heading conventions of a document format.
pub trait Format {
    /// Tree-sitter grammar for the format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing every heading node.
    fn section_query(&self) -> &str;
    /// Nesting level of a captured heading, 1 being the outermost.
    fn heading_level(&self, heading: Node<'_>) -> Option<usize>;
    /// Heading text without markup.
    fn heading_title(&self, heading: Node<'_>, source: &str) -> String;
}

struct Heading {
    level: usize,
    title: String,
    start: usize,
    end: usize,
}

/// Builds a guide from the headings of `source`.
///
/// A document with a single outermost heading and no text of its own is
/// treated as titled by that heading; its subsections become the guide's
/// top-level items. Text before the first heading is kept as the content of
/// a leading unlabelled item.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded, the query is invalid or
/// the document cannot be parsed.
pub fn parse_guide(format: &impl Format, id: &str, source: &str) -> Result<GuideGroup> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| GuideError::Parse(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GuideError::Parse("parser produced no tree".to_string()))?;
    let query = Query::new(&language, format.section_query())
        .map_err(|e| GuideError::Parse(e.to_string()))?;

    let mut headings = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            if let Some(level) = format.heading_level(node) {
                headings.push(Heading {
                    level,
                    title: format.heading_title(node, source),
                    start: node.start_byte(),
                    end: node.end_byte(),
                });
            }
        }
    }
    headings.sort_by_key(|h| h.start);

    let mut items = nest(&headings, source);
    let mut title = id.to_string();
    if items.len() == 1 && items[0].content.is_none() && items[0].has_children() {
        let root = items.remove(0);
        title = root.label;
        items = root.children;
    }

    let preamble_end = headings.first().map_or(source.len(), |h| h.start);
    let preamble = source.get(..preamble_end).unwrap_or_default().trim();
    if !preamble.is_empty() {
        items.insert(0, GuideNode::default().with_content(preamble));
    }

    tracing::debug!(id, headings = headings.len(), sections = items.len(), "parsed guide");
    Ok(GuideGroup {
        id: id.to_string(),
        title,
        items,
    })
}

/// Reads `path` and builds a guide named after the file stem.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn import_guide(format: &impl Format, path: &Path) -> Result<GuideGroup> {
    let source = fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .map_or_else(|| "guide".to_string(), |s| s.to_string_lossy().to_string());
    parse_guide(format, &id, &source)
}

fn nest(headings: &[Heading], source: &str) -> Vec<GuideNode> {
    let mut items = Vec::new();
    let mut stack: Vec<(usize, GuideNode)> = Vec::new();

    for (i, heading) in headings.iter().enumerate() {
        let body_end = headings.get(i + 1).map_or(source.len(), |next| next.start);
        let body = source
            .get(heading.end.min(body_end)..body_end)
            .unwrap_or_default()
            .trim_start_matches(['\n', '\r'])
            .trim_end();

        let mut node = GuideNode::new(heading.title.clone());
        if !body.is_empty() {
            node.content = Some(body.to_string());
        }

        while stack.last().is_some_and(|(level, _)| *level >= heading.level) {
            if let Some((_, done)) = stack.pop() {
                attach(&mut stack, &mut items, done);
            }
        }
        stack.push((heading.level, node));
    }

    while let Some((_, done)) = stack.pop() {
        attach(&mut stack, &mut items, done);
    }
    items
}

fn attach(stack: &mut [(usize, GuideNode)], items: &mut Vec<GuideNode>, node: GuideNode) {
    if let Some((_, parent)) = stack.last_mut() {
        parent.children.push(node);
    } else {
        items.push(node);
    }
}

#[cfg(test)]
#[path = "tests/formats.rs"]
mod tests;
