//! Outline side panel: the guide's table of contents with the active entry marked.
//!
//! The panel only presents. It reads the active index handed to it and reports
//! which entry was clicked; moving the highlight is left to the scroll sync
//! controller. A tall outline scrolls on its own, independently of the content.

use crate::outline::OutlineEntry;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, StatefulWidget, Widget},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Scroll position and keyboard cursor of the outline panel.
pub struct OutlinePanelState {
    offset: usize,
    selected: usize,
    rows: usize,
    followed: Option<usize>,
}

impl OutlinePanelState {
    #[must_use]
    /// First entry shown.
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    /// Entry under the keyboard cursor.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Moves the keyboard cursor by `delta` entries within `len`.
    pub fn select_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    /// Places the keyboard cursor on `index`.
    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    /// Scrolls the list by `delta` rows without moving any highlight.
    pub fn scroll_by(&mut self, delta: isize, len: usize) {
        let max = len.saturating_sub(self.rows.max(1));
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }

    /// Forgets scroll position and cursor, as when a new guide opens.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn follow(&mut self, target: usize, rows: usize) {
        self.rows = rows;
        if self.followed == Some(target) || rows == 0 {
            return;
        }
        self.followed = Some(target);
        if target < self.offset {
            self.offset = target;
        } else if target >= self.offset + rows {
            self.offset = target + 1 - rows;
        }
    }

    #[must_use]
    /// Index of the entry drawn at (`column`, `row`) when the panel occupies `area`.
    pub fn entry_at(&self, area: Rect, column: u16, row: u16, len: usize) -> Option<usize> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if column < inner.x || column >= inner.right() || row < inner.y || row >= inner.bottom() {
            return None;
        }
        let index = self.offset + usize::from(row - inner.y);
        (index < len).then_some(index)
    }
}

#[derive(Clone, Copy, Debug)]
/// Widget drawing the outline entries inside a bordered block.
pub struct OutlinePanel<'a> {
    entries: &'a [OutlineEntry],
    active: usize,
    focused: bool,
}

impl<'a> OutlinePanel<'a> {
    #[must_use]
    /// Panel for `entries` with `active` highlighted.
    pub fn new(entries: &'a [OutlineEntry], active: usize) -> Self {
        Self {
            entries,
            active,
            focused: false,
        }
    }

    #[must_use]
    /// Shows the keyboard cursor when the panel has focus.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn entry_line(&self, entry: &OutlineEntry, selected: bool, width: usize) -> Line<'static> {
        let is_active = entry.index == self.active;
        let marker = if is_active { " ↑" } else { "" };
        let room = width.saturating_sub(marker.chars().count() + 1);
        let mut label: String = entry.label.chars().take(room).collect();
        if entry.label.chars().count() > room && room > 0 {
            label.pop();
            label.push('…');
        }

        let mut style = if is_active {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if selected && self.focused {
            style = style.add_modifier(Modifier::REVERSED);
        }

        Line::from(vec![
            Span::styled(format!(" {label}"), style),
            Span::styled(marker, Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl StatefulWidget for OutlinePanel<'_> {
    type State = OutlinePanelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border = if self.focused {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Contents");
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = usize::from(inner.height);
        let target = if self.focused {
            state.selected
        } else {
            self.active
        };
        state.follow(target, rows);

        let width = usize::from(inner.width);
        for (y, (position, entry)) in (inner.y..inner.bottom())
            .zip(self.entries.iter().enumerate().skip(state.offset))
        {
            let line = self.entry_line(entry, position == state.selected, width);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
#[path = "tests/outline_panel.rs"]
mod tests;
