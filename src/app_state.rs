//! The core state machine bridging the open guide, its outline and the viewport.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user scrolls
//! and clicks. `AppState` owns the guide library, the rendered lines of the open guide, the
//! content viewport and the subscription feeding visibility batches into the scroll sync
//! controller. Opening a different guide tears all of that down before anything is rebuilt, so
//! nothing observed for the previous guide can leak into the next one.

use crate::config::Config;
use crate::guide::{GuideGroup, GuideLibrary};
use crate::outline::{build_outline, OutlineEntry};
use crate::outline_panel::OutlinePanelState;
use crate::render::{render_guide, RenderedGuide, SectionStates};
use crate::scroll_sync::ScrollSyncController;
use crate::viewport::{DocumentToken, Subscription, Viewport, ViewportTracker};
use ratatui::layout::Rect;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which pane receives navigation keys.
pub enum Focus {
    /// The rendered guide; keys move the cursor and toggle sections.
    Content,
    /// The outline; keys move the outline cursor and jump to sections.
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Determines how input is interpreted.
pub enum View {
    /// Reading the guide.
    Guide,
    /// Captures vim-style command input after ':' keystroke.
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What the content pane has to show for the requested slug.
pub enum Screen {
    /// No guide is known under the slug.
    NotFound,
    /// The guide exists but has no sections; the outline panel is omitted.
    Empty,
    /// The guide has sections to render.
    Guide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of running a command line.
pub enum CommandOutcome {
    /// Keep running.
    Continue,
    /// Leave the application.
    Quit,
}

/// Session state of the guide viewer.
pub struct AppState {
    /// Every guide that can be opened.
    pub library: GuideLibrary,
    /// Slug requested most recently.
    pub slug: String,
    /// Table of contents of the open guide.
    pub outline: Vec<OutlineEntry>,
    /// Expanded/collapsed flags of the open guide's nodes.
    pub sections: SectionStates,
    /// Lines and anchors of the open guide as currently expanded.
    pub rendered: RenderedGuide,
    /// Visible window of the content pane.
    pub viewport: Viewport,
    /// Row of the content cursor.
    pub cursor: usize,
    /// Pane receiving navigation keys.
    pub focus: Focus,
    /// Active input mode.
    pub current_view: View,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Scroll position and cursor of the outline panel.
    pub outline_state: OutlinePanelState,
    /// Screen area of the content pane from the last draw.
    pub content_area: Rect,
    /// Screen area of the outline panel from the last draw, if shown.
    pub outline_area: Option<Rect>,
    /// Owner of the active outline index.
    pub sync: ScrollSyncController,
    guide: Option<GuideGroup>,
    token: DocumentToken,
    tracker: ViewportTracker,
    subscription: Option<Subscription>,
    max_depth: usize,
    width: usize,
}

impl AppState {
    #[must_use]
    /// Initialises the viewer with the guide under `slug` open.
    pub fn new(library: GuideLibrary, slug: &str, cfg: &Config) -> Self {
        let token = DocumentToken::default();
        let mut app = Self {
            library,
            slug: String::new(),
            outline: Vec::new(),
            sections: SectionStates::default(),
            rendered: RenderedGuide::default(),
            viewport: Viewport::default(),
            cursor: 0,
            focus: Focus::Content,
            current_view: View::Guide,
            command_buffer: String::new(),
            message: None,
            outline_state: OutlinePanelState::default(),
            content_area: Rect::default(),
            outline_area: None,
            sync: ScrollSyncController::new(cfg.scroll_settings(), token),
            guide: None,
            token,
            tracker: ViewportTracker::new(cfg.focus_band()),
            subscription: None,
            max_depth: cfg.max_depth,
            width: 0,
        };
        app.open_guide(slug);
        app
    }

    /// Replaces the open guide with the one under `slug`.
    ///
    /// The previous subscription is released before the new one is made, the
    /// outline is rebuilt once, and every per-guide state starts over.
    pub fn open_guide(&mut self, slug: &str) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.tracker.disconnect();

        self.token = self.token.next();
        self.slug = slug.to_string();
        self.guide = self.library.find(slug).cloned();
        self.outline = self
            .guide
            .as_ref()
            .map(|g| build_outline(&g.items))
            .unwrap_or_default();

        self.sections.clear();
        self.viewport.offset = 0;
        self.cursor = 0;
        self.focus = Focus::Content;
        self.outline_state.reset();
        self.sync.reset(self.token);
        self.rerender();

        if !self.outline.is_empty() {
            self.subscription = Some(self.tracker.subscribe(self.token));
        }

        match &self.guide {
            Some(guide) => tracing::info!(
                slug,
                sections = self.outline.len(),
                token = ?self.token,
                title = %guide.title,
                "opened guide"
            ),
            None => tracing::info!(slug, "no guide for slug"),
        }
    }

    #[must_use]
    /// The open guide, if the slug resolved to one.
    pub fn guide(&self) -> Option<&GuideGroup> {
        self.guide.as_ref()
    }

    #[must_use]
    /// Generation token of the open guide.
    pub fn token(&self) -> DocumentToken {
        self.token
    }

    #[must_use]
    /// What the content pane shows.
    pub fn screen(&self) -> Screen {
        match &self.guide {
            None => Screen::NotFound,
            Some(guide) if guide.items.is_empty() => Screen::Empty,
            Some(_) => Screen::Guide,
        }
    }

    #[must_use]
    /// Index of the highlighted outline entry.
    pub fn active_index(&self) -> usize {
        self.sync.active_index()
    }

    fn rerender(&mut self) {
        self.rendered = match &self.guide {
            Some(guide) => render_guide(
                &guide.items,
                &self.sections,
                self.max_depth,
                self.width,
            ),
            None => RenderedGuide::default(),
        };
        self.viewport.offset = self
            .viewport
            .clamp_offset(self.viewport.offset, self.rendered.len());
        self.cursor = self.cursor.min(self.rendered.len().saturating_sub(1));
    }

    /// Records the content pane height measured during drawing.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.height = height;
        self.viewport.offset = self
            .viewport
            .clamp_offset(self.viewport.offset, self.rendered.len());
    }

    /// Records the content pane width, rewrapping the guide when it changed.
    ///
    /// A width of 0 leaves content unwrapped.
    pub fn set_viewport_width(&mut self, width: usize) {
        if width == self.width {
            return;
        }
        self.width = width;
        self.rerender();
    }

    /// Toggles the node whose header sits at `row`.
    ///
    /// Returns `false` for rows without a toggle, such as leaves and content.
    pub fn toggle_at(&mut self, row: usize) -> bool {
        let Some(path) = self.rendered.toggle_at(row).cloned() else {
            return false;
        };
        let expanded = self.sections.toggle(&path);
        tracing::debug!(path = ?path.steps(), expanded, "toggled section");
        self.rerender();
        true
    }

    /// Toggles the node under the content cursor.
    pub fn toggle_cursor(&mut self) -> bool {
        self.toggle_at(self.cursor)
    }

    /// Moves the content cursor, scrolling to keep it visible.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.rendered.is_empty() {
            return;
        }
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.rendered.len() - 1);
        let height = self.viewport.height.max(1);
        if self.cursor < self.viewport.offset {
            self.set_offset(self.cursor);
        } else if self.cursor >= self.viewport.offset + height {
            self.set_offset(self.cursor + 1 - height);
        }
    }

    /// Scrolls the content by hand, abandoning any programmatic scroll.
    pub fn scroll_by(&mut self, delta: isize) {
        let offset = self.viewport.offset.saturating_add_signed(delta);
        self.set_offset(offset);
        let height = self.viewport.height.max(1);
        self.cursor = self
            .cursor
            .clamp(self.viewport.offset, self.viewport.offset + height - 1)
            .min(self.rendered.len().saturating_sub(1));
    }

    fn set_offset(&mut self, offset: usize) {
        self.sync.interrupt();
        self.viewport.offset = self.viewport.clamp_offset(offset, self.rendered.len());
    }

    /// Smoothly scrolls to top-level section `index` and highlights it.
    ///
    /// Returns `false` without side effects when the section is not rendered.
    pub fn jump_to_section(&mut self, index: usize, now: Instant) -> bool {
        let target = self.sync.scroll_to_section(
            index,
            &self.rendered.anchors,
            self.viewport,
            self.rendered.len(),
            now,
        );
        if target.is_none() {
            return false;
        }
        self.outline_state.select(index);
        if let Some(anchor) = self.rendered.anchor(index) {
            self.cursor = anchor.top;
        }
        true
    }

    /// Jumps to the entry under the outline cursor.
    pub fn jump_to_selected(&mut self, now: Instant) -> bool {
        self.jump_to_section(self.outline_state.selected(), now)
    }

    /// Advances the smooth scroll, observes the viewport and applies the resulting batches.
    pub fn tick(&mut self, now: Instant) {
        if let Some(offset) = self.sync.tick(now) {
            self.viewport.offset = offset;
        }
        self.tracker.observe(&self.rendered.anchors, self.viewport);
        if let Some(subscription) = &self.subscription {
            self.sync.drain(subscription, now);
        }
    }

    /// Switches keyboard focus between content and outline.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Content if !self.outline.is_empty() => {
                self.outline_state.select(self.active_index());
                Focus::Outline
            }
            _ => Focus::Content,
        };
    }

    /// Opens the guide after the current one.
    pub fn next_guide(&mut self) {
        if let Some(slug) = self.library.next_slug(&self.slug).map(str::to_string) {
            self.open_guide(&slug);
        }
    }

    /// Opens the guide before the current one.
    pub fn prev_guide(&mut self) {
        if let Some(slug) = self.library.prev_slug(&self.slug).map(str::to_string) {
            self.open_guide(&slug);
        }
    }

    /// Expands or collapses every top-level section.
    pub fn set_all_expanded(&mut self, expanded: bool) {
        let paths: Vec<_> = self
            .rendered
            .lines
            .iter()
            .filter(|l| l.depth == 0)
            .filter_map(|l| l.toggle.clone())
            .collect();
        if expanded {
            self.sections.clear();
        } else {
            for path in &paths {
                self.sections.set_expanded(path, false);
            }
        }
        self.rerender();
    }

    /// Runs a command typed after ':'.
    pub fn execute_command(&mut self, command: &str) -> CommandOutcome {
        let command = command.trim();
        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match name {
            "q" | "q!" | "quit" => return CommandOutcome::Quit,
            "open" | "o" if !argument.is_empty() => {
                self.open_guide(argument);
                if self.guide.is_none() {
                    self.message = Some(format!("No guide named {argument}"));
                }
            }
            "next" | "n" => self.next_guide(),
            "prev" | "p" => self.prev_guide(),
            "expand" => self.set_all_expanded(true),
            "collapse" => self.set_all_expanded(false),
            "list" | "ls" => {
                let slugs: Vec<&str> = self.library.groups.iter().map(|g| g.id.as_str()).collect();
                self.message = Some(slugs.join(" "));
            }
            "" => {}
            _ => self.message = Some(format!("Unknown command: {command}")),
        }
        CommandOutcome::Continue
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
