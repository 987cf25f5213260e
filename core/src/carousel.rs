use crate::playback::{PlaybackController, PlaybackIntent};
use crate::story::StorySequence;

/// Composes the per-owner sequences behind the owner-selector strip and
/// enforces the one-at-a-time invariant: at most one PlaybackController is
/// alive. Selecting an owner always constructs a fresh controller so viewed
/// ids never leak across owners.
pub struct OwnerCarousel {
    sequences: Vec<StorySequence>,
    consumed: Vec<bool>,
    active: Option<ActiveViewer>,
}

struct ActiveViewer {
    owner_index: usize,
    controller: PlaybackController,
}

impl OwnerCarousel {
    pub fn new(sequences: Vec<StorySequence>) -> Self {
        let consumed = vec![false; sequences.len()];
        Self {
            sequences,
            consumed,
            active: None,
        }
    }

    pub fn sequences(&self) -> &[StorySequence] {
        &self.sequences
    }

    pub fn owner_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_consumed(&self, index: usize) -> bool {
        self.consumed.get(index).copied().unwrap_or(false)
    }

    pub fn active_owner_index(&self) -> Option<usize> {
        self.active.as_ref().map(|viewer| viewer.owner_index)
    }

    pub fn active_controller(&self) -> Option<&PlaybackController> {
        self.active.as_ref().map(|viewer| &viewer.controller)
    }

    pub fn active_controller_mut(&mut self) -> Option<&mut PlaybackController> {
        self.active.as_mut().map(|viewer| &mut viewer.controller)
    }

    /// Opens the viewer for one owner. Out-of-range indices and owners whose
    /// content was already fully consumed are no-ops, and a no-op select
    /// leaves any live viewer untouched. An exhausted viewer is reaped before
    /// the consumed check, so an owner whose active controller just ran past
    /// its last story cannot be reopened. When the selection proceeds, any
    /// previous viewer is torn down and the returned intents belong to the
    /// new controller's `start`.
    pub fn select(&mut self, index: usize, now_ms: f64) -> Vec<PlaybackIntent> {
        if index >= self.sequences.len() {
            return Vec::new();
        }
        self.reap_exhausted();
        if self.is_consumed(index) {
            return Vec::new();
        }
        self.close_active();
        let mut controller = PlaybackController::new(self.sequences[index].clone());
        let intents = controller.start(now_ms);
        self.active = Some(ActiveViewer {
            owner_index: index,
            controller,
        });
        intents
    }

    // An exhausted controller is already closed; only the consumed marking
    // and the teardown remain.
    fn reap_exhausted(&mut self) {
        let exhausted = self
            .active
            .as_ref()
            .map(|viewer| viewer.controller.is_exhausted())
            .unwrap_or(false);
        if exhausted {
            self.close_active();
        }
    }

    /// Tears down the active viewer, cancelling its playback. An owner whose
    /// sequence was exhausted (closed by advancing past the end) is marked
    /// consumed so re-selecting it is a no-op.
    pub fn close_active(&mut self) {
        let Some(mut viewer) = self.active.take() else {
            return;
        };
        if viewer.controller.is_exhausted() {
            if let Some(slot) = self.consumed.get_mut(viewer.owner_index) {
                *slot = true;
            }
        }
        viewer.controller.close();
    }
}
