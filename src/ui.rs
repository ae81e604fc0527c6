//! The UI renders the application state into something visible and clickable.
//!
//! The draw function lays out a title bar, the content pane with the outline panel beside it,
//! and a help/command bar. Guides that cannot be shown get a neutral placeholder instead of the
//! content pane, and the outline panel is left out entirely.

use crate::app_state::{AppState, Focus, Screen, View};
use crate::config::Config;
use crate::outline_panel::OutlinePanel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renders the viewer and records the pane geometry used for mouse hit-testing.
pub fn draw(f: &mut Frame, app: &mut AppState, cfg: &Config) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Content and outline
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    draw_title(f, app, chunks[0]);

    match app.screen() {
        Screen::Guide => draw_guide(f, app, cfg, chunks[1]),
        Screen::Empty => draw_placeholder(f, app, chunks[1], "This guide has no sections yet."),
        Screen::NotFound => draw_placeholder(f, app, chunks[1], "No content for this guide."),
    }

    draw_help(f, app, chunks[2]);
}

fn draw_title(f: &mut Frame, app: &AppState, area: Rect) {
    let position = app
        .library
        .groups
        .iter()
        .position(|g| g.id == app.slug)
        .map_or_else(String::new, |i| {
            format!(" ({}/{})", i + 1, app.library.groups.len())
        });
    let title = app.guide().map_or("", |g| g.title.as_str());
    let line = Line::from(vec![
        Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}{position}", app.slug),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_guide(f: &mut Frame, app: &mut AppState, cfg: &Config, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(cfg.outline_width)])
        .split(area);

    let border = if app.focus == Focus::Content {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(columns[0]);
    f.render_widget(block, columns[0]);

    app.content_area = inner;
    app.set_viewport_width(usize::from(inner.width));
    app.set_viewport_height(usize::from(inner.height));

    let lines: Vec<Line> = app
        .rendered
        .lines
        .iter()
        .enumerate()
        .skip(app.viewport.offset)
        .take(app.viewport.height)
        .map(|(row, line)| {
            let rendered = line.to_line();
            if row == app.cursor && app.focus == Focus::Content {
                rendered.patch_style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                rendered
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);

    app.outline_area = Some(columns[1]);
    let panel = OutlinePanel::new(&app.outline, app.active_index())
        .focused(app.focus == Focus::Outline);
    f.render_stateful_widget(panel, columns[1], &mut app.outline_state);
}

fn draw_placeholder(f: &mut Frame, app: &mut AppState, area: Rect, text: &str) {
    app.content_area = area;
    app.outline_area = None;
    app.set_viewport_height(0);

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let top = inner.height / 2;
    let centred = Rect {
        y: inner.y + top,
        height: inner.height.saturating_sub(top).min(1),
        ..inner
    };
    let placeholder = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(placeholder, centred);
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let help_text = if app.current_view == View::Command {
        format!(":{}", app.command_buffer)
    } else if let Some(ref msg) = app.message {
        msg.clone()
    } else if app.focus == Focus::Outline {
        "↑/↓: Select | Enter: Jump | Tab: Content | [/]: Prev/Next guide | :q Quit".to_string()
    } else {
        "↑/↓: Move | PgUp/PgDn: Scroll | Enter: Expand/Collapse | Tab: Outline | :open <guide> | :q Quit"
            .to_string()
    };

    let title = if app.current_view == View::Command {
        "Command"
    } else {
        ""
    };
    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(help, area);
}
