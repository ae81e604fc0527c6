//! Active-section bookkeeping between the viewport tracker and the outline.
//!
//! The controller is the only owner of the active outline index. It consumes
//! visibility batches, applies the tie-break rule, and runs the smooth scroll
//! started by selecting an outline entry.
//!
//! Tie-break, evaluated once per batch after the tracked set is updated:
//!
//! 1. if any anchor entered the band in this batch, the smallest one wins;
//! 2. otherwise the active section stays while it still intersects;
//! 3. otherwise the topmost intersecting section takes over;
//! 4. with nothing intersecting the last active section is kept.
//!
//! While a programmatic scroll is animating, and for a short grace period
//! after it, batches still update the tracked set but never move the active
//! index. The click target therefore stays highlighted while the cards it
//! scrolls past report themselves.

use crate::render::Anchor;
use crate::viewport::{DocumentToken, Subscription, Viewport, VisibilityBatch};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Tunables for programmatic scrolling.
pub struct ScrollSettings {
    /// Rows left above a section heading after scrolling to it.
    pub clearance: usize,
    /// Length of the smooth scroll animation.
    pub duration: Duration,
    /// Extra time after the animation during which batches cannot move the highlight.
    pub grace: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            clearance: 1,
            duration: Duration::from_millis(300),
            grace: Duration::from_millis(150),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Ease-out animation between two scroll offsets.
pub struct SmoothScroll {
    from: usize,
    to: usize,
    started: Instant,
    duration: Duration,
}

impl SmoothScroll {
    #[must_use]
    /// Starts an animation from `from` to `to` at `started`.
    pub fn new(from: usize, to: usize, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    #[must_use]
    /// Offset the animation ends at.
    pub fn target(&self) -> usize {
        self.to
    }

    #[must_use]
    /// Whether the animation has reached its target at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    #[must_use]
    /// Offset at `now`, following a cubic ease-out curve.
    pub fn offset_at(&self, now: Instant) -> usize {
        if self.is_finished(now) {
            return self.to;
        }
        let total = self.duration.as_micros().max(1);
        let elapsed = now.saturating_duration_since(self.started).as_micros();
        // Progress and easing in thousandths.
        let remaining = 1000 - (elapsed * 1000 / total).min(1000);
        let eased = 1000 - remaining * remaining * remaining / 1_000_000;
        let distance = u128::try_from(self.to.abs_diff(self.from)).unwrap_or(u128::MAX);
        let moved = usize::try_from(distance * eased / 1000).unwrap_or(usize::MAX);
        if self.to >= self.from {
            self.from.saturating_add(moved).min(self.to)
        } else {
            self.from.saturating_sub(moved).max(self.to)
        }
    }
}

#[derive(Debug)]
/// Owner of the active outline index for one open guide.
pub struct ScrollSyncController {
    settings: ScrollSettings,
    token: DocumentToken,
    active: usize,
    intersecting: BTreeSet<usize>,
    animation: Option<SmoothScroll>,
    guard_until: Option<Instant>,
}

impl ScrollSyncController {
    #[must_use]
    /// Creates a controller for the guide identified by `token`.
    pub fn new(settings: ScrollSettings, token: DocumentToken) -> Self {
        Self {
            settings,
            token,
            active: 0,
            intersecting: BTreeSet::new(),
            animation: None,
            guard_until: None,
        }
    }

    #[must_use]
    /// Index of the highlighted outline entry.
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    /// Guide the controller currently accepts batches for.
    pub fn token(&self) -> DocumentToken {
        self.token
    }

    #[must_use]
    /// Sections currently known to intersect the focus band, topmost first.
    pub fn intersecting(&self) -> Vec<usize> {
        self.intersecting.iter().copied().collect()
    }

    #[must_use]
    /// Whether a programmatic scroll is still animating.
    pub fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    /// Whether batches are currently barred from moving the highlight.
    pub fn is_guarded(&self, now: Instant) -> bool {
        self.animation.is_some() || self.guard_until.is_some_and(|until| now < until)
    }

    /// Starts over for a newly opened guide.
    pub fn reset(&mut self, token: DocumentToken) {
        self.token = token;
        self.active = 0;
        self.intersecting.clear();
        self.animation = None;
        self.guard_until = None;
    }

    /// Applies one visibility batch atomically.
    ///
    /// Returns `true` when the active index changed. Batches observed for a
    /// different guide are discarded untouched.
    pub fn apply_batch(&mut self, batch: &VisibilityBatch, now: Instant) -> bool {
        if batch.token != self.token {
            tracing::debug!(
                batch = ?batch.token,
                current = ?self.token,
                "discarding stale visibility batch"
            );
            return false;
        }

        let mut entrants = BTreeSet::new();
        for change in &batch.changes {
            if change.is_intersecting {
                if self.intersecting.insert(change.index) {
                    entrants.insert(change.index);
                }
            } else {
                self.intersecting.remove(&change.index);
            }
        }

        if self.is_guarded(now) {
            return false;
        }

        let next = if let Some(&entrant) = entrants.first() {
            entrant
        } else if self.intersecting.contains(&self.active) {
            self.active
        } else if let Some(&topmost) = self.intersecting.first() {
            topmost
        } else {
            self.active
        };

        if next == self.active {
            return false;
        }
        tracing::debug!(from = self.active, to = next, "active section changed");
        self.active = next;
        true
    }

    /// Applies every batch waiting on `subscription`, oldest first.
    ///
    /// Returns `true` when the active index changed.
    pub fn drain(&mut self, subscription: &Subscription, now: Instant) -> bool {
        let batches = subscription.pending();
        if subscription.token() != self.token {
            tracing::debug!(
                dropped = batches.len(),
                "draining subscription of a replaced guide"
            );
            return false;
        }
        let mut changed = false;
        for batch in &batches {
            changed |= self.apply_batch(batch, now);
        }
        changed
    }

    /// Scrolls the content so that section `index` sits just below the top.
    ///
    /// Highlights `index` immediately and returns the target offset. Does
    /// nothing and returns `None` when the section has no anchor, which happens
    /// when a click races a guide swap.
    pub fn scroll_to_section(
        &mut self,
        index: usize,
        anchors: &[Anchor],
        viewport: Viewport,
        content_len: usize,
        now: Instant,
    ) -> Option<usize> {
        let Some(anchor) = anchors.iter().find(|a| a.index == index) else {
            tracing::warn!(index, "no anchor for outline entry; ignoring");
            return None;
        };

        let target = viewport.clamp_offset(
            anchor.top.saturating_sub(self.settings.clearance),
            content_len,
        );
        self.animation = Some(SmoothScroll::new(
            viewport.offset,
            target,
            now,
            self.settings.duration,
        ));
        self.guard_until = Some(now + self.settings.duration + self.settings.grace);
        self.active = index;
        tracing::debug!(index, target, "scrolling to section");
        Some(target)
    }

    /// Advances the running animation and returns the offset to display.
    ///
    /// Returns `None` when no programmatic scroll is in flight.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let animation = self.animation?;
        let offset = animation.offset_at(now);
        if animation.is_finished(now) {
            self.animation = None;
        }
        Some(offset)
    }

    /// Abandons a programmatic scroll because the user scrolled by hand.
    pub fn interrupt(&mut self) {
        self.animation = None;
        self.guard_until = None;
    }
}

#[cfg(test)]
#[path = "tests/scroll_sync.rs"]
mod tests;
