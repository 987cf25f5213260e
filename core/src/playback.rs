use std::collections::HashSet;

use crate::story::{Story, StoryId, StorySequence};

/// Analytics intent reported by the controller. The gateway turns these into
/// events for the injected sink; the controller itself never performs I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackIntent {
    View { story_id: StoryId },
    CompleteView { story_id: StoryId, elapsed_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Running,
    PausedByUser,
    SuspendedByGesture,
    Closed,
}

/// Read model handed to the renderer. Snapshots are cheap value copies; the
/// controller remains the only mutation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub current_index: usize,
    pub progress_ratio: f64,
    pub is_paused: bool,
    pub is_suspended_by_gesture: bool,
    pub closed: bool,
    pub story_count: usize,
}

/// Owns playback state for one story sequence and exposes the only mutation
/// surface for it. Pause and gesture suspension are independent flags: both
/// can be asserted at once and releasing one never clears the other.
///
/// Commands that need wall-clock time take `now_ms` from the host; elapsed
/// time for analytics is measured against the instant the current story
/// became visible, inclusive of paused time.
pub struct PlaybackController {
    sequence: StorySequence,
    current_index: usize,
    progress_ratio: f64,
    is_paused: bool,
    is_suspended_by_gesture: bool,
    started: bool,
    closed: bool,
    exhausted: bool,
    story_started_at: f64,
    viewed: HashSet<StoryId>,
}

impl PlaybackController {
    pub fn new(sequence: StorySequence) -> Self {
        Self {
            sequence,
            current_index: 0,
            progress_ratio: 0.0,
            is_paused: false,
            is_suspended_by_gesture: false,
            started: false,
            closed: false,
            exhausted: false,
            story_started_at: 0.0,
            viewed: HashSet::new(),
        }
    }

    pub fn sequence(&self) -> &StorySequence {
        &self.sequence
    }

    pub fn current_story(&self) -> Option<&Story> {
        if self.closed {
            return None;
        }
        self.sequence.at(self.current_index).ok()
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.closed {
            PlaybackPhase::Closed
        } else if self.is_suspended_by_gesture {
            PlaybackPhase::SuspendedByGesture
        } else if self.is_paused {
            PlaybackPhase::PausedByUser
        } else {
            PlaybackPhase::Running
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True when the controller closed by advancing past the last story, as
    /// opposed to an explicit close. The carousel uses this to mark an
    /// owner's content as fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current_index,
            progress_ratio: self.progress_ratio,
            is_paused: self.is_paused,
            is_suspended_by_gesture: self.is_suspended_by_gesture,
            closed: self.closed,
            story_count: self.sequence.len(),
        }
    }

    /// Wall-clock ms since the current story became visible. Used for the
    /// reply-click event contract.
    pub fn elapsed_current_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.story_started_at).max(0.0)
    }

    /// Begins playback. Legal only from the initial pre-start condition;
    /// reports the first story as viewed.
    pub fn start(&mut self, now_ms: f64) -> Vec<PlaybackIntent> {
        if self.started || self.closed {
            return Vec::new();
        }
        self.started = true;
        self.story_started_at = now_ms;
        let mut intents = Vec::new();
        self.mark_viewed(&mut intents);
        intents
    }

    /// Accumulates progress while running. Ignored while paused or suspended
    /// so progress never advances during a pause, whatever the host timer
    /// does. Any `delta_ms` accumulates correctly; correctness does not
    /// depend on tick granularity.
    pub fn tick(&mut self, delta_ms: f64, now_ms: f64) -> Vec<PlaybackIntent> {
        if !self.started || self.closed || self.is_paused || self.is_suspended_by_gesture {
            return Vec::new();
        }
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return Vec::new();
        }
        let duration = match self.sequence.at(self.current_index) {
            Ok(story) => self.sequence.duration_of(story),
            Err(_) => return Vec::new(),
        };
        self.progress_ratio += delta_ms / duration;
        if self.progress_ratio < 1.0 {
            return Vec::new();
        }
        let mut intents = Vec::new();
        if let Ok(story) = self.sequence.at(self.current_index) {
            intents.push(PlaybackIntent::CompleteView {
                story_id: story.id.clone(),
                elapsed_ms: self.elapsed_current_ms(now_ms),
            });
        }
        self.advance_inner(now_ms, &mut intents);
        intents
    }

    /// Moves to the next story; from the last index the sequence is exhausted
    /// and the controller closes, signaling the caller to dismiss the viewer.
    pub fn advance(&mut self, now_ms: f64) -> Vec<PlaybackIntent> {
        if !self.started || self.closed {
            return Vec::new();
        }
        let mut intents = Vec::new();
        self.advance_inner(now_ms, &mut intents);
        intents
    }

    /// Moves to the previous story. At index 0 this re-watches the first
    /// story from the start: progress resets, the index never changes and the
    /// controller never closes.
    pub fn retreat(&mut self, now_ms: f64) -> Vec<PlaybackIntent> {
        if !self.started || self.closed {
            return Vec::new();
        }
        let mut intents = Vec::new();
        if self.current_index > 0 {
            self.current_index -= 1;
            self.begin_story(now_ms);
            self.mark_viewed(&mut intents);
        } else {
            self.begin_story(now_ms);
        }
        intents
    }

    /// Explicit selection, e.g. a thumbnail click. Clamps silently, resets
    /// progress, leaves pause and suspension flags untouched.
    pub fn jump_to(&mut self, index: usize, now_ms: f64) -> Vec<PlaybackIntent> {
        if !self.started || self.closed {
            return Vec::new();
        }
        let clamped = index.min(self.sequence.len() - 1);
        let mut intents = Vec::new();
        self.current_index = clamped;
        self.begin_story(now_ms);
        self.mark_viewed(&mut intents);
        intents
    }

    pub fn pause(&mut self) {
        if !self.started || self.closed {
            return;
        }
        self.is_paused = true;
    }

    pub fn resume(&mut self) {
        if !self.started || self.closed {
            return;
        }
        self.is_paused = false;
    }

    /// Freezes progress while a drag or press is in flight. Independent of
    /// the user pause: releasing the gesture must not resume a user pause.
    pub fn suspend_for_gesture(&mut self) {
        if !self.started || self.closed {
            return;
        }
        self.is_suspended_by_gesture = true;
    }

    pub fn release_gesture(&mut self) {
        if !self.started || self.closed {
            return;
        }
        self.is_suspended_by_gesture = false;
    }

    /// Terminal. Idempotent; every mutator is a no-op afterwards so stray
    /// timer ticks during teardown are safe.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Forwards the actual media duration for a video story once the host
    /// learns it. Progress already accumulated is kept as a ratio.
    pub fn report_video_duration(&mut self, id: &StoryId, duration_ms: f64) {
        if self.closed {
            return;
        }
        self.sequence.set_video_duration(id, duration_ms);
    }

    fn advance_inner(&mut self, now_ms: f64, intents: &mut Vec<PlaybackIntent>) {
        if self.current_index + 1 >= self.sequence.len() {
            // A terminal tick may have overshot; the closed snapshot still
            // reports progress within [0, 1].
            self.progress_ratio = self.progress_ratio.min(1.0);
            self.exhausted = true;
            self.close();
            return;
        }
        self.current_index += 1;
        self.begin_story(now_ms);
        self.mark_viewed(intents);
    }

    fn begin_story(&mut self, now_ms: f64) {
        self.progress_ratio = 0.0;
        self.story_started_at = now_ms;
    }

    fn mark_viewed(&mut self, intents: &mut Vec<PlaybackIntent>) {
        let Ok(story) = self.sequence.at(self.current_index) else {
            return;
        };
        if self.viewed.insert(story.id.clone()) {
            intents.push(PlaybackIntent::View {
                story_id: story.id.clone(),
            });
        }
    }
}
