use super::{AppState, CommandOutcome, Focus, Screen};
use crate::config::Config;
use crate::guide::{GuideGroup, GuideLibrary, GuideNode, NodePath};
use crate::viewport::VisibilityBatch;
use std::time::{Duration, Instant};

fn section(label: &str, rows: usize) -> GuideNode {
    let content = (0..rows)
        .map(|i| format!("{label} line {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    GuideNode::new(label).with_content(content)
}

fn library() -> GuideLibrary {
    GuideLibrary::new(vec![
        GuideGroup {
            id: "basics".to_string(),
            title: "Basics".to_string(),
            items: vec![
                section("A", 8),
                section("B", 8).child(GuideNode::new("B1").child(GuideNode::new("B1a"))),
                section("C", 8),
            ],
        },
        GuideGroup {
            id: "empty".to_string(),
            title: "Empty".to_string(),
            items: Vec::new(),
        },
        GuideGroup {
            id: "culture".to_string(),
            title: "Culture".to_string(),
            items: vec![section("X", 2), section("Y", 2)],
        },
    ])
}

fn app(slug: &str) -> AppState {
    let mut app = AppState::new(library(), slug, &Config::default());
    app.set_viewport_height(10);
    app
}

#[test]
fn test_open_guide_builds_outline() {
    let app = app("basics");

    assert_eq!(app.screen(), Screen::Guide);
    let labels: Vec<&str> = app.outline.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(app.active_index(), 0);
    assert_eq!(app.rendered.anchors.len(), 3);
}

#[test]
fn test_unknown_slug_shows_not_found() {
    let app = app("missing");

    assert_eq!(app.screen(), Screen::NotFound);
    assert!(app.outline.is_empty());
    assert!(app.rendered.is_empty());
}

#[test]
fn test_empty_guide_has_no_outline() {
    let mut app = app("empty");

    assert_eq!(app.screen(), Screen::Empty);
    assert!(app.outline.is_empty());

    app.toggle_focus();
    assert_eq!(app.focus, Focus::Content, "no outline to focus");
    assert!(!app.jump_to_section(0, Instant::now()));
}

#[test]
fn test_scrolling_moves_active_section() {
    let now = Instant::now();
    let mut app = app("basics");
    app.tick(now);
    assert_eq!(app.active_index(), 0);

    let b = app.rendered.anchor(1).unwrap().top;
    app.scroll_by(isize::try_from(b).unwrap());
    app.tick(now);

    assert_eq!(app.active_index(), 1);
}

#[test]
fn test_jump_highlights_immediately_and_holds() {
    let now = Instant::now();
    let mut app = app("basics");
    app.tick(now);

    assert!(app.jump_to_section(2, now));
    assert_eq!(app.active_index(), 2);
    assert_eq!(app.outline_state.selected(), 2);
    assert_eq!(app.cursor, app.rendered.anchor(2).unwrap().top);

    // The animation passes over B on its way down.
    let mut t = now;
    while t < now + Duration::from_millis(300) {
        t += Duration::from_millis(16);
        app.tick(t);
        assert_eq!(app.active_index(), 2);
    }
    assert_eq!(
        app.viewport.offset,
        app.viewport
            .clamp_offset(app.rendered.anchor(2).unwrap().top - 1, app.rendered.len())
    );
}

#[test]
fn test_jump_to_missing_section_is_ignored() {
    let now = Instant::now();
    let mut app = app("basics");

    assert!(!app.jump_to_section(7, now));
    assert_eq!(app.active_index(), 0);
    assert_eq!(app.viewport.offset, 0);
}

#[test]
fn test_document_swap_isolates_old_batches() {
    let now = Instant::now();
    let mut app = app("basics");
    app.tick(now);
    let old_token = app.token();

    app.open_guide("culture");
    assert_ne!(app.token(), old_token);

    let stale = VisibilityBatch::new(old_token, [(1, true)]);
    assert!(!app.sync.apply_batch(&stale, now));
    assert_eq!(app.active_index(), 0);

    app.tick(now);
    assert_eq!(app.active_index(), 0);
}

#[test]
fn test_document_swap_resets_view_state() {
    let now = Instant::now();
    let mut app = app("basics");
    app.toggle_at(app.rendered.anchor(1).unwrap().top);
    app.scroll_by(5);
    app.jump_to_section(2, now);

    app.next_guide();

    assert_eq!(app.slug, "empty");
    assert_eq!(app.viewport.offset, 0);
    assert_eq!(app.cursor, 0);
    assert_eq!(app.active_index(), 0);
    assert!(!app.sync.is_scrolling());

    app.open_guide("basics");
    assert!(app.sections.is_expanded(&NodePath::root(1)));
}

#[test]
fn test_toggle_collapses_only_that_node() {
    let mut app = app("basics");
    let header = app.rendered.anchor(1).unwrap().top;
    let before = app.rendered.len();

    assert!(app.toggle_at(header));

    assert!(!app.sections.is_expanded(&NodePath::root(1)));
    assert!(app.sections.is_expanded(&NodePath::root(0)));
    assert!(app.sections.is_expanded(&NodePath::root(2)));
    assert_eq!(app.rendered.len(), before - 10);
    assert_eq!(app.outline.len(), 3, "outline is unaffected");
    assert_eq!(app.rendered.anchors.len(), 3);
}

#[test]
fn test_narrow_pane_rewraps_content() {
    let mut app = app("basics");
    assert_eq!(app.rendered.anchor(1).unwrap().top, 11);

    // "A line 0" no longer fits next to the gutter and splits in two.
    app.set_viewport_width(10);
    assert_eq!(app.rendered.anchor(1).unwrap().top, 19);
    assert_eq!(app.rendered.lines[1].text, "A line");
    assert_eq!(app.rendered.lines[2].text, "0");

    app.set_viewport_width(0);
    assert_eq!(app.rendered.anchor(1).unwrap().top, 11);
}

#[test]
fn test_static_rows_do_not_toggle() {
    let mut app = app("basics");

    assert!(!app.toggle_at(0), "leaf card header");
    assert!(!app.toggle_at(1), "content line");
}

#[test]
fn test_cursor_keeps_viewport_in_view() {
    let mut app = app("basics");

    app.move_cursor(15);
    assert_eq!(app.cursor, 15);
    assert_eq!(app.viewport.offset, 6);

    app.move_cursor(isize::MIN);
    assert_eq!(app.cursor, 0);
    assert_eq!(app.viewport.offset, 0);
}

#[test]
fn test_manual_scroll_interrupts_jump() {
    let now = Instant::now();
    let mut app = app("basics");
    app.jump_to_section(2, now);

    app.scroll_by(1);

    assert!(!app.sync.is_scrolling());
    assert!(!app.sync.is_guarded(now));
}

#[test]
fn test_commands() {
    let mut app = app("basics");

    assert_eq!(app.execute_command("open culture"), CommandOutcome::Continue);
    assert_eq!(app.slug, "culture");

    app.execute_command("open nowhere");
    assert_eq!(app.screen(), Screen::NotFound);
    assert_eq!(app.message.as_deref(), Some("No guide named nowhere"));

    app.execute_command("o basics");
    app.execute_command("collapse");
    assert!(!app.sections.is_expanded(&NodePath::root(1)));
    app.execute_command("expand");
    assert!(app.sections.is_expanded(&NodePath::root(1)));

    app.execute_command("bogus");
    assert_eq!(app.message.as_deref(), Some("Unknown command: bogus"));

    app.execute_command("prev");
    assert_eq!(app.slug, "culture");

    assert_eq!(app.execute_command("q"), CommandOutcome::Quit);
}
