use super::{DocumentToken, FocusBand, Viewport, ViewportTracker, VisibilityBatch, VisibilityChange};
use crate::render::Anchor;

fn anchors() -> Vec<Anchor> {
    vec![
        Anchor {
            index: 0,
            top: 0,
            height: 4,
        },
        Anchor {
            index: 1,
            top: 5,
            height: 5,
        },
        Anchor {
            index: 2,
            top: 11,
            height: 9,
        },
    ]
}

fn at(offset: usize) -> Viewport {
    Viewport { offset, height: 10 }
}

fn change(index: usize, is_intersecting: bool) -> VisibilityChange {
    VisibilityChange {
        index,
        is_intersecting,
    }
}

#[test]
fn test_focus_band_insets_viewport() {
    let band = FocusBand::default();

    assert_eq!(band.rows(at(0)), 1..3);
    assert_eq!(band.rows(at(9)), 10..12);
    assert_eq!(
        band.rows(Viewport {
            offset: 4,
            height: 0
        }),
        4..5,
        "a collapsed band still covers one row"
    );
}

#[test]
fn test_intersection_excludes_edges() {
    let band = FocusBand::default();
    let anchors = anchors();

    assert!(band.intersects(&anchors[0], at(0)));
    assert!(!band.intersects(&anchors[1], at(0)), "below the band");
    assert!(!band.intersects(&anchors[1], at(9)), "scrolled past the band");
    assert!(band.intersects(&anchors[2], at(9)));
}

#[test]
fn test_nothing_observed_without_subscriber() {
    let mut tracker = ViewportTracker::new(FocusBand::default());

    assert!(!tracker.is_subscribed());
    assert_eq!(tracker.observe(&anchors(), at(0)), 0);
}

#[test]
fn test_batches_report_transitions_only() {
    let token = DocumentToken::default().next();
    let mut tracker = ViewportTracker::new(FocusBand::default());
    let subscription = tracker.subscribe(token);

    assert_eq!(tracker.observe(&anchors(), at(0)), 1);
    assert_eq!(tracker.observe(&anchors(), at(0)), 0, "no change, no batch");
    assert_eq!(tracker.observe(&anchors(), at(5)), 2);

    let batches = subscription.pending();
    assert_eq!(
        batches,
        vec![
            VisibilityBatch {
                token,
                changes: vec![change(0, true)],
            },
            VisibilityBatch {
                token,
                changes: vec![change(0, false), change(1, true)],
            },
        ]
    );
    assert!(subscription.pending().is_empty(), "batches are taken once");
}

#[test]
fn test_dropped_subscription_is_released() {
    let mut tracker = ViewportTracker::new(FocusBand::default());
    let subscription = tracker.subscribe(DocumentToken::default());
    subscription.unsubscribe();

    tracker.observe(&anchors(), at(0));

    assert!(!tracker.is_subscribed());
}

#[test]
fn test_subscribing_for_new_document_tears_down_old() {
    let first = DocumentToken::default().next();
    let second = first.next();
    let mut tracker = ViewportTracker::new(FocusBand::default());

    let old = tracker.subscribe(first);
    tracker.observe(&anchors(), at(0));
    assert_eq!(old.pending().len(), 1);

    let new = tracker.subscribe(second);
    tracker.observe(&anchors(), at(0));

    assert!(old.pending().is_empty(), "old subscriber hears nothing more");
    let batches = new.pending();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].token, second);
    assert_eq!(
        batches[0].changes,
        vec![change(0, true)],
        "visible set restarts for the new document"
    );
}

#[test]
fn test_resubscribing_same_document_keeps_visible_set() {
    let token = DocumentToken::default().next();
    let mut tracker = ViewportTracker::new(FocusBand::default());
    let first = tracker.subscribe(token);
    tracker.observe(&anchors(), at(0));

    let second = tracker.subscribe(token);
    assert_eq!(tracker.observe(&anchors(), at(0)), 0);
    assert_eq!(first.pending().len(), 1);
    assert!(second.pending().is_empty());
}

#[test]
fn test_batch_is_keyed_by_index() {
    let batch = VisibilityBatch::new(
        DocumentToken::default(),
        [(2, true), (0, false), (2, false)],
    );

    assert_eq!(batch.changes, vec![change(0, false), change(2, false)]);
}

#[test]
fn test_clamp_offset() {
    let viewport = at(0);

    assert_eq!(viewport.max_offset(25), 15);
    assert_eq!(viewport.clamp_offset(40, 25), 15);
    assert_eq!(viewport.clamp_offset(3, 5), 0);
}
