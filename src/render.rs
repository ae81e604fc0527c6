//! Recursive section rendering into a flat list of terminal lines.
//!
//! Every top-level item becomes a card: a bold header row, its content, its
//! children and a closing rule. Deeper nodes render as indented rows inside the
//! card. Collapsed nodes emit no content and no children at all, so the line
//! list is exactly what is on screen and row offsets can be used as positions.
//!
//! Alongside the lines, rendering records one [`Anchor`] per top-level item: the
//! row range its card occupies. Anchors are what the viewport tracker observes.
//!
//! Content is word-wrapped to the pane width here rather than by the terminal
//! widget, so that every wrapped row is a line of its own and anchors stay exact.

use crate::guide::{GuideNode, NodePath};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::collections::HashMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CARD_RULE_WIDTH: usize = 32;
// Gutter plus the content indent.
const CONTENT_PREFIX: usize = 4;

#[derive(Clone, Debug, Default)]
/// Expanded/collapsed flags for every mounted node of the open guide.
///
/// Nodes default to expanded. Collapsing a node unmounts its subtree, which
/// discards the remembered state of every descendant.
pub struct SectionStates {
    expanded: HashMap<NodePath, bool>,
}

impl SectionStates {
    #[must_use]
    /// Whether the node at `path` is expanded.
    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.get(path).copied().unwrap_or(true)
    }

    /// Flips the node at `path` and returns its new state.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        let expanded = !self.is_expanded(path);
        self.set_expanded(path, expanded);
        expanded
    }

    /// Sets the node at `path` to the given state.
    pub fn set_expanded(&mut self, path: &NodePath, expanded: bool) {
        if !expanded {
            self.expanded.retain(|p, _| !p.is_descendant_of(path));
        }
        self.expanded.insert(path.clone(), expanded);
    }

    /// Forgets every node, as when a different guide is opened.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a rendered line shows.
pub enum LineKind {
    /// Header row of a top-level card.
    CardHeader,
    /// Label row of a nested node.
    Row,
    /// One line of a node's free text.
    Content,
    /// Placeholder for a subtree nested deeper than the render limit.
    Truncated,
    /// Closing rule of a top-level card.
    CardEnd,
    /// Blank line between cards.
    Spacer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A single row of the rendered guide.
pub struct RenderedLine {
    /// Kind of row.
    pub kind: LineKind,
    /// Depth of the node the row belongs to.
    pub depth: usize,
    /// Label or content text, without decoration.
    pub text: String,
    /// Top-level section the row sits in.
    pub section: usize,
    /// Node toggled by activating this row; only set for nodes with children.
    pub toggle: Option<NodePath>,
    /// Expanded state of the toggle target when the row was rendered.
    pub expanded: bool,
}

impl RenderedLine {
    fn gutter(&self) -> &'static str {
        match self.kind {
            LineKind::CardHeader => "┃ ",
            LineKind::Spacer | LineKind::CardEnd => "",
            LineKind::Row | LineKind::Content | LineKind::Truncated => "│ ",
        }
    }

    fn glyph(&self) -> &'static str {
        match (&self.toggle, self.expanded) {
            (Some(_), true) => "▾ ",
            (Some(_), false) => "▸ ",
            (None, _) if self.kind == LineKind::Row => "· ",
            (None, _) => "",
        }
    }

    #[must_use]
    /// Styled terminal line for this row.
    pub fn to_line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let indent = "  ".repeat(self.depth);
        match self.kind {
            LineKind::Spacer => Line::default(),
            LineKind::CardEnd => Line::from(Span::styled(
                format!("╰{}", "─".repeat(CARD_RULE_WIDTH)),
                dim,
            )),
            LineKind::CardHeader => Line::from(vec![
                Span::styled(self.gutter(), Style::default().fg(Color::Magenta)),
                Span::styled(self.glyph(), Style::default().fg(Color::Magenta)),
                Span::styled(
                    self.text.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            LineKind::Row => Line::from(vec![
                Span::styled(self.gutter(), dim),
                Span::raw(indent),
                Span::styled(self.glyph(), dim),
                Span::styled(self.text.clone(), Style::default().fg(Color::Gray)),
            ]),
            LineKind::Content => Line::from(vec![
                Span::styled(self.gutter(), dim),
                Span::raw(format!("{indent}  ")),
                Span::styled(self.text.clone(), Style::default().fg(Color::Gray)),
            ]),
            LineKind::Truncated => Line::from(vec![
                Span::styled(self.gutter(), dim),
                Span::raw(indent),
                Span::styled("…", dim),
            ]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Row range occupied by one top-level card.
pub struct Anchor {
    /// Index of the top-level item.
    pub index: usize,
    /// First row of the card.
    pub top: usize,
    /// Number of rows from the header to the closing rule.
    pub height: usize,
}

impl Anchor {
    #[must_use]
    /// One past the card's last row.
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }
}

#[derive(Clone, Debug, Default)]
/// Rendered lines plus the anchor of every top-level card.
pub struct RenderedGuide {
    /// Rows in display order.
    pub lines: Vec<RenderedLine>,
    /// One anchor per top-level item, in item order.
    pub anchors: Vec<Anchor>,
}

impl RenderedGuide {
    #[must_use]
    /// Anchor of the top-level item at `index`, if it is rendered.
    pub fn anchor(&self, index: usize) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.index == index)
    }

    #[must_use]
    /// Node toggled by the row at `row`, if that row has a toggle.
    pub fn toggle_at(&self, row: usize) -> Option<&NodePath> {
        self.lines.get(row).and_then(|l| l.toggle.as_ref())
    }

    #[must_use]
    /// Number of rendered rows.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    /// Whether nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[must_use]
/// Renders every top-level item as a card and records its anchor.
///
/// Subtrees nested deeper than `max_depth` are replaced by a placeholder row.
/// Content is wrapped to fit `width` columns; a width of 0 disables wrapping.
pub fn render_guide(
    items: &[GuideNode],
    states: &SectionStates,
    max_depth: usize,
    width: usize,
) -> RenderedGuide {
    let mut rendered = RenderedGuide::default();
    for (index, item) in items.iter().enumerate() {
        let top = rendered.lines.len();
        render_node(
            item,
            0,
            &NodePath::root(index),
            states,
            max_depth,
            width,
            &mut rendered.lines,
        );
        rendered.lines.push(line(LineKind::CardEnd, 0, String::new(), index));
        rendered.anchors.push(Anchor {
            index,
            top,
            height: rendered.lines.len() - top,
        });
        rendered.lines.push(line(LineKind::Spacer, 0, String::new(), index));
    }
    rendered
}

/// Appends the rows for `node` and, when expanded, its content and children.
pub fn render_node(
    node: &GuideNode,
    depth: usize,
    path: &NodePath,
    states: &SectionStates,
    max_depth: usize,
    width: usize,
    out: &mut Vec<RenderedLine>,
) {
    let section = path.top_level().unwrap_or_default();
    if depth > max_depth {
        out.push(line(LineKind::Truncated, depth, String::new(), section));
        return;
    }

    let expanded = states.is_expanded(path);
    let kind = if depth == 0 {
        LineKind::CardHeader
    } else {
        LineKind::Row
    };
    out.push(RenderedLine {
        kind,
        depth,
        text: node.label.clone(),
        section,
        toggle: node.has_children().then(|| path.clone()),
        expanded,
    });

    if !expanded {
        return;
    }

    if let Some(content) = &node.content {
        let room = if width == 0 {
            0
        } else {
            width.saturating_sub(CONTENT_PREFIX + 2 * depth).max(1)
        };
        for text in content.lines() {
            for row in wrap_content(text, room) {
                out.push(line(LineKind::Content, depth, row, section));
            }
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        render_node(
            child,
            depth + 1,
            &path.child(i),
            states,
            max_depth,
            width,
            out,
        );
    }
}

#[must_use]
/// Splits one content line into rows of at most `width` columns.
///
/// Breaks fall between words; a word wider than a row is split by character.
/// Continuation rows repeat the line's leading indentation when it leaves room
/// for text. A width of 0 returns the line unchanged.
pub fn wrap_content(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.width() <= width {
        return vec![text.to_string()];
    }

    let body = text.trim_start();
    let lead = &text[..text.len() - body.len()];
    let indent = if lead.width() * 2 < width { lead } else { "" };
    let room = width - indent.width();

    let mut rows: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    let flush = |rows: &mut Vec<String>, current: &mut String, used: &mut usize| {
        rows.push(format!("{indent}{current}"));
        current.clear();
        *used = 0;
    };

    for word in body.split_whitespace() {
        let word_width = word.width();
        if used > 0 && used + 1 + word_width > room {
            flush(&mut rows, &mut current, &mut used);
        }
        if used > 0 {
            current.push(' ');
            used += 1;
        }
        if word_width <= room {
            current.push_str(word);
            used += word_width;
            continue;
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if used > 0 && used + ch_width > room {
                flush(&mut rows, &mut current, &mut used);
            }
            current.push(ch);
            used += ch_width;
        }
    }
    if !current.is_empty() || rows.is_empty() {
        flush(&mut rows, &mut current, &mut used);
    }
    rows
}

fn line(kind: LineKind, depth: usize, text: String, section: usize) -> RenderedLine {
    RenderedLine {
        kind,
        depth,
        text,
        section,
        toggle: None,
        expanded: true,
    }
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
