//! guidewiki: browse guide documents with a scroll-synchronised outline.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use guidewiki::app_state::{AppState, CommandOutcome, Focus, View};
use guidewiki::formats::{self, markdown::MarkdownFormat};
use guidewiki::guide::GuideLibrary;
use guidewiki::{config, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::Position;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "guidewiki")]
#[command(about = "Browse guides with a scroll-synchronised outline", long_about = None)]
struct Args {
    /// Guide to open (defaults to the first one)
    #[arg(value_name = "SLUG")]
    slug: Option<String>,

    /// JSON file holding the array of guides
    #[arg(long, short = 'd', value_name = "FILE")]
    data: Option<PathBuf>,

    /// Markdown files to add as guides, sectioned by their headings
    #[arg(long, short = 'm', value_name = "FILE")]
    markdown: Vec<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let (mut cfg, config_error) = config::Config::load();

    // Override config with command line args
    if let Some(data) = &args.data {
        cfg.data_file = data.to_string_lossy().to_string();
    }
    if let Some(log) = &args.log {
        cfg.log_file = Some(log.to_string_lossy().to_string());
    }
    if let Some(log_file) = &cfg.log_file {
        init_logging(Path::new(log_file))?;
    }
    if let Some(message) = config_error {
        if cfg.log_file.is_some() {
            tracing::warn!("{message}");
        } else {
            eprintln!("Warning: {message}");
        }
    }

    let library = load_library(&args, &cfg)?;
    let Some(slug) = args
        .slug
        .clone()
        .or_else(|| library.first_slug().map(str::to_string))
    else {
        eprintln!("No guides found");
        return Ok(());
    };

    let state = AppState::new(library, &slug, &cfg);
    run_tui(state, &cfg)
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("guidewiki=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(io::Error::other)
}

fn load_library(args: &Args, cfg: &config::Config) -> io::Result<GuideLibrary> {
    let data_path = PathBuf::from(&cfg.data_file);
    let mut library = if args.data.is_some() || args.markdown.is_empty() || data_path.exists() {
        GuideLibrary::load(&data_path).map_err(io::Error::other)?
    } else {
        GuideLibrary::default()
    };

    let format = MarkdownFormat;
    for path in &args.markdown {
        let guide = formats::import_guide(&format, path).map_err(io::Error::other)?;
        library.groups.push(guide);
    }
    Ok(library)
}

fn run_tui(mut app: AppState, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, cfg);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    cfg: &config::Config,
) -> io::Result<()> {
    let tick = Duration::from_millis(cfg.tick_ms.max(1));
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) == CommandOutcome::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            _ => {}
        }
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> CommandOutcome {
    let now = Instant::now();
    match app.current_view {
        View::Guide => match key.code {
            KeyCode::Char('q') => return CommandOutcome::Quit,
            KeyCode::Char(':') => {
                app.current_view = View::Command;
                app.command_buffer.clear();
                app.message = None;
            }
            KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
            KeyCode::Char('[') => app.prev_guide(),
            KeyCode::Char(']') => app.next_guide(),
            KeyCode::Esc => {
                app.message = None;
                app.focus = Focus::Content;
            }
            code => match app.focus {
                Focus::Content => handle_content_key(app, code),
                Focus::Outline => handle_outline_key(app, code, now),
            },
        },
        View::Command => match key.code {
            KeyCode::Char(c) => {
                app.command_buffer.push(c);
            }
            KeyCode::Backspace => {
                app.command_buffer.pop();
            }
            KeyCode::Enter => {
                let cmd = app.command_buffer.clone();
                app.current_view = View::Guide; // Always return to the guide
                app.command_buffer.clear();
                return app.execute_command(&cmd);
            }
            KeyCode::Esc => {
                app.current_view = View::Guide;
                app.command_buffer.clear();
            }
            _ => {}
        },
    }
    CommandOutcome::Continue
}

fn handle_content_key(app: &mut AppState, code: KeyCode) {
    let page = isize::try_from(app.viewport.height.max(1)).unwrap_or(isize::MAX);
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::PageUp => app.scroll_by(-page),
        KeyCode::PageDown => app.scroll_by(page),
        KeyCode::Home | KeyCode::Char('g') => app.move_cursor(isize::MIN),
        KeyCode::End | KeyCode::Char('G') => app.move_cursor(isize::MAX),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_cursor();
        }
        _ => {}
    }
}

fn handle_outline_key(app: &mut AppState, code: KeyCode, now: Instant) {
    let len = app.outline.len();
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.outline_state.select_by(-1, len),
        KeyCode::Down | KeyCode::Char('j') => app.outline_state.select_by(1, len),
        KeyCode::Home | KeyCode::Char('g') => app.outline_state.select(0),
        KeyCode::End | KeyCode::Char('G') => app.outline_state.select(len.saturating_sub(1)),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.jump_to_selected(now);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    let position = Position::new(mouse.column, mouse.row);
    let over_outline = app.outline_area.is_some_and(|area| area.contains(position));
    let len = app.outline.len();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(area) = app.outline_area {
                if let Some(index) = app.outline_state.entry_at(area, mouse.column, mouse.row, len) {
                    app.jump_to_section(index, Instant::now());
                    return;
                }
            }
            if app.content_area.contains(position) {
                let row = app.viewport.offset + usize::from(mouse.row - app.content_area.y);
                if row < app.rendered.len() {
                    app.focus = Focus::Content;
                    app.cursor = row;
                    app.toggle_at(row);
                }
            }
        }
        MouseEventKind::ScrollUp if over_outline => app.outline_state.scroll_by(-1, len),
        MouseEventKind::ScrollDown if over_outline => app.outline_state.scroll_by(1, len),
        MouseEventKind::ScrollUp => app.scroll_by(-3),
        MouseEventKind::ScrollDown => app.scroll_by(3),
        _ => {}
    }
}
