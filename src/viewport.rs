//! Observation of which top-level cards sit in the viewport's focus band.
//!
//! The tracker is push-based: subscribers receive [`VisibilityBatch`]es over a
//! channel, each listing only the anchors whose intersection state changed since
//! the previous observation. Batches carry the [`DocumentToken`] of the guide
//! they were observed for, so a consumer can reject anything left over from a
//! guide that has since been replaced.
//!
//! The focus band is narrower than the viewport. A card barely peeking in at
//! the top or far down the screen does not count as visible.

use crate::render::Anchor;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Generation number of the guide currently open.
pub struct DocumentToken(u64);

impl DocumentToken {
    #[must_use]
    /// Token for the next guide to be opened.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Visible window of the content pane, in rows.
pub struct Viewport {
    /// First visible row.
    pub offset: usize,
    /// Number of visible rows.
    pub height: usize,
}

impl Viewport {
    #[must_use]
    /// Largest offset that still fills the window with `content_len` rows.
    pub fn max_offset(&self, content_len: usize) -> usize {
        content_len.saturating_sub(self.height)
    }

    #[must_use]
    /// `offset` clamped to the scrollable range.
    pub fn clamp_offset(&self, offset: usize, content_len: usize) -> usize {
        offset.min(self.max_offset(content_len))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Insets applied to the viewport before testing intersection.
pub struct FocusBand {
    /// Share of the viewport height cut from the top, in percent.
    pub top_percent: u16,
    /// Share of the viewport height cut from the bottom, in percent.
    pub bottom_percent: u16,
}

impl Default for FocusBand {
    fn default() -> Self {
        Self {
            top_percent: 10,
            bottom_percent: 70,
        }
    }
}

impl FocusBand {
    #[must_use]
    /// Rows covered by the band. Never empty for a non-empty viewport.
    pub fn rows(&self, viewport: Viewport) -> Range<usize> {
        let top = viewport.height * usize::from(self.top_percent.min(100)) / 100;
        let bottom = viewport.height * usize::from(self.bottom_percent.min(100)) / 100;
        let start = viewport.offset + top;
        let end = (viewport.offset + viewport.height.saturating_sub(bottom)).max(start + 1);
        start..end
    }

    #[must_use]
    /// Whether `anchor` overlaps the band.
    pub fn intersects(&self, anchor: &Anchor, viewport: Viewport) -> bool {
        let band = self.rows(viewport);
        anchor.height > 0 && anchor.top < band.end && anchor.bottom() > band.start
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Change of one anchor's intersection state.
pub struct VisibilityChange {
    /// Top-level section index.
    pub index: usize,
    /// Whether the anchor now overlaps the focus band.
    pub is_intersecting: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Every change seen in one observation, at most one per anchor.
pub struct VisibilityBatch {
    /// Guide the observation was made for.
    pub token: DocumentToken,
    /// Changes ordered by section index.
    pub changes: Vec<VisibilityChange>,
}

impl VisibilityBatch {
    #[must_use]
    /// Builds a batch from `(index, is_intersecting)` pairs.
    ///
    /// Pairs are keyed by index; if an index repeats, the later pair wins.
    pub fn new(token: DocumentToken, changes: impl IntoIterator<Item = (usize, bool)>) -> Self {
        let changes = changes
            .into_iter()
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .map(|(index, is_intersecting)| VisibilityChange {
                index,
                is_intersecting,
            })
            .collect();
        Self { token, changes }
    }
}

/// Receiving end of a tracker subscription.
///
/// Dropping it releases the subscription; the tracker prunes the dead sender on
/// its next send.
pub struct Subscription {
    token: DocumentToken,
    receiver: Receiver<VisibilityBatch>,
}

impl Subscription {
    #[must_use]
    /// Guide this subscription was made for.
    pub fn token(&self) -> DocumentToken {
        self.token
    }

    #[must_use]
    /// Takes every batch delivered so far, oldest first.
    pub fn pending(&self) -> Vec<VisibilityBatch> {
        self.receiver.try_iter().collect()
    }

    /// Releases the subscription.
    pub fn unsubscribe(self) {
        tracing::debug!(token = ?self.token, "visibility subscription released");
    }
}

#[derive(Debug, Default)]
/// Watches the anchors of the open guide and reports intersection changes.
pub struct ViewportTracker {
    band: FocusBand,
    token: DocumentToken,
    senders: Vec<Sender<VisibilityBatch>>,
    visible: BTreeSet<usize>,
}

impl ViewportTracker {
    #[must_use]
    /// Creates a tracker with no subscribers.
    pub fn new(band: FocusBand) -> Self {
        Self {
            band,
            ..Self::default()
        }
    }

    #[must_use]
    /// The band used for intersection tests.
    pub fn band(&self) -> FocusBand {
        self.band
    }

    /// Subscribes to visibility changes for the guide identified by `token`.
    ///
    /// Subscribing for a different guide first tears down every existing
    /// subscription and forgets what was visible, so the next observation
    /// reports every card in the band as a new entrant.
    pub fn subscribe(&mut self, token: DocumentToken) -> Subscription {
        if token != self.token {
            self.disconnect();
            self.token = token;
        }
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        tracing::debug!(?token, "visibility subscription created");
        Subscription { token, receiver }
    }

    /// Drops every subscriber and the remembered visible set.
    pub fn disconnect(&mut self) {
        self.senders.clear();
        self.visible.clear();
    }

    #[must_use]
    /// Whether anyone is listening.
    pub fn is_subscribed(&self) -> bool {
        !self.senders.is_empty()
    }

    /// Tests every anchor against the focus band and publishes the changes.
    ///
    /// Returns the number of changes published. Nothing is observed while no
    /// subscriber is attached.
    pub fn observe(&mut self, anchors: &[Anchor], viewport: Viewport) -> usize {
        if self.senders.is_empty() {
            return 0;
        }

        let now_visible: BTreeSet<usize> = anchors
            .iter()
            .filter(|a| self.band.intersects(a, viewport))
            .map(|a| a.index)
            .collect();

        let entered = now_visible.difference(&self.visible).map(|&i| (i, true));
        let left = self.visible.difference(&now_visible).map(|&i| (i, false));
        let batch = VisibilityBatch::new(self.token, entered.chain(left));
        self.visible = now_visible;

        let count = batch.changes.len();
        if count > 0 {
            self.senders.retain(|s| s.send(batch.clone()).is_ok());
        }
        count
    }
}

#[cfg(test)]
#[path = "tests/viewport.rs"]
mod tests;
