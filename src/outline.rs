//! Table of contents derived from a guide's top-level sections.
//!
//! The outline is section-level, not heading-level: nested children never get
//! their own entry. It is a pure function of the item list and is rebuilt only
//! when a different guide is opened.

use crate::guide::GuideNode;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One navigable line of the outline.
pub struct OutlineEntry {
    /// Position of the section in the guide's item list.
    pub index: usize,
    /// Section label, copied verbatim.
    pub label: String,
}

#[must_use]
/// Builds one entry per top-level item, indexed by array position.
pub fn build_outline(items: &[GuideNode]) -> Vec<OutlineEntry> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| OutlineEntry {
            index,
            label: item.label.clone(),
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
