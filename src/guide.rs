//! Guide documents: the recursive section tree shown by the viewer.
//!
//! A [`GuideGroup`] is one routable document identified by its slug. Its items
//! form an ordered forest of [`GuideNode`]s, each carrying a label, optional
//! free text, and optional children. Groups are loaded wholesale from a JSON
//! data file into a [`GuideLibrary`] and are never mutated afterwards.

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// One node of a guide: a labelled section with optional text and subsections.
pub struct GuideNode {
    /// Heading text. Absent or null labels load as the empty string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// Free text shown under the label, rendered with whitespace preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Nested subsections, in display order.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<GuideNode>,
}

impl GuideNode {
    #[must_use]
    /// Creates a node with the given label and nothing else.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Attaches free text to the node.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    /// Appends a child node.
    pub fn child(mut self, child: GuideNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    /// Whether the node can be expanded or collapsed.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// A complete, routable guide document.
pub struct GuideGroup {
    /// Slug the document is addressed by.
    pub id: String,
    /// Display title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Top-level sections. Each one becomes an outline entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<GuideNode>,
}

/// Reads an explicit `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Address of a node: child positions walked from the top-level item.
///
/// `[2]` is the third top-level item, `[2, 0]` its first child.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    #[must_use]
    /// Path of a top-level item.
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    #[must_use]
    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    #[must_use]
    /// Nesting depth, 0 for top-level items.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    #[must_use]
    /// Index of the top-level item this path lives under.
    pub fn top_level(&self) -> Option<usize> {
        self.0.first().copied()
    }

    #[must_use]
    /// True when `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &NodePath) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }

    #[must_use]
    /// Raw child positions.
    pub fn steps(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

#[derive(Clone, Debug, Default)]
/// Every guide available to the viewer, in data-file order.
pub struct GuideLibrary {
    /// Loaded documents.
    pub groups: Vec<GuideGroup>,
}

impl GuideLibrary {
    #[must_use]
    /// Wraps already-loaded groups.
    pub fn new(groups: Vec<GuideGroup>) -> Self {
        Self { groups }
    }

    /// Parses a JSON array of guide groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid array of groups.
    pub fn from_json(text: &str) -> Result<Self> {
        let groups: Vec<GuideGroup> = serde_json::from_str(text)?;
        Ok(Self::new(groups))
    }

    /// Reads and parses the JSON data file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let library = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            guides = library.groups.len(),
            "loaded guide library"
        );
        Ok(library)
    }

    #[must_use]
    /// Resolves a slug to its document. `None` means "no content", not an error.
    pub fn find(&self, slug: &str) -> Option<&GuideGroup> {
        self.groups.iter().find(|g| g.id == slug)
    }

    #[must_use]
    /// Slug of the first document, used when none was requested.
    pub fn first_slug(&self) -> Option<&str> {
        self.groups.first().map(|g| g.id.as_str())
    }

    #[must_use]
    /// Slug following `slug` in data-file order, wrapping around.
    ///
    /// An unknown slug resolves to the first document.
    pub fn next_slug(&self, slug: &str) -> Option<&str> {
        let len = self.groups.len();
        if len == 0 {
            return None;
        }
        let next = self
            .groups
            .iter()
            .position(|g| g.id == slug)
            .map_or(0, |i| (i + 1) % len);
        Some(self.groups[next].id.as_str())
    }

    #[must_use]
    /// Slug preceding `slug` in data-file order, wrapping around.
    ///
    /// An unknown slug resolves to the last document.
    pub fn prev_slug(&self, slug: &str) -> Option<&str> {
        let len = self.groups.len();
        if len == 0 {
            return None;
        }
        let prev = self
            .groups
            .iter()
            .position(|g| g.id == slug)
            .map_or(len - 1, |i| (i + len - 1) % len);
        Some(self.groups[prev].id.as_str())
    }
}

#[cfg(test)]
#[path = "tests/guide.rs"]
mod tests;
