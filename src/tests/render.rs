use super::{render_guide, wrap_content, Anchor, LineKind, SectionStates};
use crate::guide::{GuideNode, NodePath};

fn sample() -> Vec<GuideNode> {
    vec![
        GuideNode::new("A").with_content("hello\n  world"),
        GuideNode::new("B")
            .child(GuideNode::new("B1"))
            .child(GuideNode::new("B2").child(GuideNode::new("B2a"))),
    ]
}

fn text_of(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn test_cards_rows_and_anchors() {
    let rendered = render_guide(&sample(), &SectionStates::default(), 32, 0);

    let kinds: Vec<LineKind> = rendered.lines.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LineKind::CardHeader,
            LineKind::Content,
            LineKind::Content,
            LineKind::CardEnd,
            LineKind::Spacer,
            LineKind::CardHeader,
            LineKind::Row,
            LineKind::Row,
            LineKind::Row,
            LineKind::CardEnd,
            LineKind::Spacer,
        ]
    );
    assert_eq!(
        rendered.anchors,
        vec![
            Anchor {
                index: 0,
                top: 0,
                height: 4
            },
            Anchor {
                index: 1,
                top: 5,
                height: 5
            },
        ]
    );
    assert_eq!(rendered.lines[8].text, "B2a");
    assert_eq!(rendered.lines[8].depth, 2);
    assert!(rendered.lines.iter().skip(5).all(|l| l.section == 1));
}

#[test]
fn test_content_whitespace_is_preserved() {
    let rendered = render_guide(&sample(), &SectionStates::default(), 32, 0);

    assert_eq!(rendered.lines[1].text, "hello");
    assert_eq!(rendered.lines[2].text, "  world");
}

#[test]
fn test_only_nodes_with_children_toggle() {
    let rendered = render_guide(&sample(), &SectionStates::default(), 32, 0);

    assert_eq!(rendered.toggle_at(0), None, "leaf card header is static");
    assert_eq!(rendered.toggle_at(5), Some(&NodePath::root(1)));
    assert_eq!(rendered.toggle_at(6), None, "leaf row is static");
    assert_eq!(rendered.toggle_at(7), Some(&NodePath::from(vec![1, 1])));
    assert_eq!(rendered.toggle_at(99), None);
}

#[test]
fn test_collapsed_subtree_is_not_rendered() {
    let mut states = SectionStates::default();
    states.toggle(&NodePath::from(vec![1, 1]));

    let rendered = render_guide(&sample(), &states, 32, 0);

    assert!(rendered.lines.iter().all(|l| l.text != "B2a"));
    assert!(!rendered.lines[7].expanded);
    assert_eq!(rendered.anchor(1).map(|a| a.height), Some(4));
}

#[test]
fn test_collapsed_card_keeps_header_and_anchor() {
    let mut states = SectionStates::default();
    states.toggle(&NodePath::root(1));

    let rendered = render_guide(&sample(), &states, 32, 0);

    assert_eq!(rendered.anchors.len(), 2);
    assert_eq!(
        rendered.anchor(1),
        Some(&Anchor {
            index: 1,
            top: 5,
            height: 2
        })
    );
}

#[test]
fn test_content_renders_above_children() {
    let items = vec![GuideNode::new("Top")
        .with_content("intro")
        .child(GuideNode::new("Child"))];

    let rendered = render_guide(&items, &SectionStates::default(), 32, 0);

    assert_eq!(rendered.lines[1].kind, LineKind::Content);
    assert_eq!(rendered.lines[1].text, "intro");
    assert_eq!(rendered.lines[2].kind, LineKind::Row);
    assert_eq!(rendered.lines[2].text, "Child");
}

#[test]
fn test_missing_label_renders_blank() {
    let items = vec![GuideNode::default()];

    let rendered = render_guide(&items, &SectionStates::default(), 32, 0);

    assert_eq!(rendered.lines[0].text, "");
    assert_eq!(text_of(&rendered.lines[0].to_line()), "┃ ");
}

#[test]
fn test_depth_limit_elides_deep_subtrees() {
    let chain = (0..5).rev().fold(GuideNode::new("leaf"), |node, level| {
        GuideNode::new(format!("level{level}")).child(node)
    });

    let rendered = render_guide(&[chain], &SectionStates::default(), 2, 0);

    let depths: Vec<(LineKind, usize)> = rendered
        .lines
        .iter()
        .map(|l| (l.kind, l.depth))
        .take_while(|(kind, _)| *kind != LineKind::CardEnd)
        .collect();
    assert_eq!(
        depths,
        vec![
            (LineKind::CardHeader, 0),
            (LineKind::Row, 1),
            (LineKind::Row, 2),
            (LineKind::Truncated, 3),
        ]
    );
}

#[test]
fn test_collapse_leaves_siblings_and_ancestors_alone() {
    let mut states = SectionStates::default();
    let card = NodePath::root(1);
    let first = card.child(0);
    let second = card.child(1);

    states.set_expanded(&first, false);
    states.toggle(&second);

    assert!(states.is_expanded(&card));
    assert!(!states.is_expanded(&first));
    assert!(!states.is_expanded(&second));
    assert!(states.is_expanded(&NodePath::root(0)));
}

#[test]
fn test_collapsing_forgets_descendant_state() {
    let mut states = SectionStates::default();
    let card = NodePath::root(0);
    let inner = card.child(0);

    states.set_expanded(&inner, false);
    assert!(!states.toggle(&card));
    assert!(states.toggle(&card));

    assert!(states.is_expanded(&inner), "remounted subtree starts expanded");
}

#[test]
fn test_line_decoration() {
    let mut states = SectionStates::default();
    states.toggle(&NodePath::from(vec![1, 1]));
    let rendered = render_guide(&sample(), &states, 32, 0);

    assert_eq!(text_of(&rendered.lines[5].to_line()), "┃ ▾ B");
    assert_eq!(text_of(&rendered.lines[6].to_line()), "│   · B1");
    assert_eq!(text_of(&rendered.lines[7].to_line()), "│   ▸ B2");
    assert_eq!(text_of(&rendered.lines[1].to_line()), "│   hello");
    assert!(text_of(&rendered.lines[3].to_line()).starts_with('╰'));
    assert_eq!(text_of(&rendered.lines[4].to_line()), "");
}

#[test]
fn test_long_content_wraps_into_rows() {
    let items = vec![GuideNode::new("A").with_content("alpha beta gamma delta")];

    let rendered = render_guide(&items, &SectionStates::default(), 32, 14);

    let content: Vec<&str> = rendered
        .lines
        .iter()
        .filter(|l| l.kind == LineKind::Content)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(content, vec!["alpha beta", "gamma", "delta"]);
    assert_eq!(rendered.anchor(0).map(|a| a.height), Some(5));
    assert!(rendered
        .lines
        .iter()
        .all(|l| text_of(&l.to_line()).chars().count() <= 14 || l.kind == LineKind::CardEnd));
}

#[test]
fn test_wrap_keeps_indentation_on_continuation_rows() {
    assert_eq!(
        wrap_content("  - a long item here", 12),
        vec!["  - a long", "  item here"]
    );
}

#[test]
fn test_wrap_splits_words_wider_than_a_row() {
    assert_eq!(wrap_content("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
}

#[test]
fn test_wrap_leaves_short_or_unbounded_lines_alone() {
    assert_eq!(wrap_content("  short", 20), vec!["  short"]);
    assert_eq!(wrap_content("no limit at all", 0), vec!["no limit at all"]);
    assert_eq!(wrap_content("", 5), vec![""]);
}
