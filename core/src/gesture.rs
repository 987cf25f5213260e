/// Released horizontal displacement beyond this maps to advance/retreat.
pub const SWIPE_THRESHOLD_PX: f64 = 100.0;
/// Released downward displacement beyond this dismisses the viewer.
pub const CLOSE_SWIPE_THRESHOLD_PX: f64 = 150.0;
/// End-points within this slop on both axes classify as a tap.
pub const TAP_SLOP_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCommand {
    Advance,
    Retreat,
    Close,
    SuspendGesture,
    ReleaseGesture,
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    start_x: f64,
    start_y: f64,
}

/// Maps raw pointer/touch primitives to playback commands, decoupled from any
/// rendering framework. One physical gesture yields exactly one
/// suspend/release bracket: a second pointer-down while a gesture is active
/// is ignored, so tap and drag paths can never double-suspend.
#[derive(Debug, Default)]
pub struct GestureInterpreter {
    active: Option<ActiveGesture>,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Pointer down. Suspends playback for the whole gesture, whatever it
    /// later classifies as.
    pub fn begin(&mut self, x: f64, y: f64) -> Option<GestureCommand> {
        if self.active.is_some() {
            return None;
        }
        self.active = Some(ActiveGesture {
            start_x: x,
            start_y: y,
        });
        Some(GestureCommand::SuspendGesture)
    }

    /// Pointer up. Releases the suspension bracket first, then classifies the
    /// released displacement: swipe-down to close, tap halves for prev/next,
    /// horizontal swipe past threshold for retreat/advance. Sub-threshold
    /// drags emit nothing beyond the release (snap back).
    pub fn finish(&mut self, x: f64, y: f64, viewer_width: f64) -> Vec<GestureCommand> {
        let Some(gesture) = self.active.take() else {
            return Vec::new();
        };
        let dx = x - gesture.start_x;
        let dy = y - gesture.start_y;
        let mut commands = vec![GestureCommand::ReleaseGesture];
        if dy > CLOSE_SWIPE_THRESHOLD_PX {
            commands.push(GestureCommand::Close);
        } else if dx.abs() <= TAP_SLOP_PX && dy.abs() <= TAP_SLOP_PX {
            if x < viewer_width * 0.5 {
                commands.push(GestureCommand::Retreat);
            } else {
                commands.push(GestureCommand::Advance);
            }
        } else if dx <= -SWIPE_THRESHOLD_PX {
            commands.push(GestureCommand::Advance);
        } else if dx >= SWIPE_THRESHOLD_PX {
            commands.push(GestureCommand::Retreat);
        }
        commands
    }

    /// Pointer cancel (e.g. the browser reclaims the touch). Only the
    /// suspension bracket is closed; no navigation is inferred.
    pub fn cancel(&mut self) -> Option<GestureCommand> {
        self.active
            .take()
            .map(|_| GestureCommand::ReleaseGesture)
    }
}
