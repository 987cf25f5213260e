use std::collections::HashSet;
use std::fmt;

use crate::playback::PlaybackIntent;
use crate::story::StoryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    View,
    CompleteView,
    ReplyClick,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::View => "view",
            EventKind::CompleteView => "complete_view",
            EventKind::ReplyClick => "reply_click",
        }
    }
}

/// Constructed transiently by the gateway and handed to the sink; the engine
/// does not retain events.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub story_id: StoryId,
    pub kind: EventKind,
    pub elapsed_ms: f64,
    pub emitted_at: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRejection {
    pub reason: String,
}

impl SinkRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SinkRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "analytics sink rejected event: {}", self.reason)
    }
}

impl std::error::Error for SinkRejection {}

/// Delivery boundary for analytics events. Delivery is best-effort; a
/// rejection is swallowed by the gateway and must never stall playback.
pub trait EventSink {
    fn submit(&self, event: AnalyticsEvent) -> Result<(), SinkRejection>;
}

/// Converts controller intents into events for the injected sink. View
/// dedup lives here as well as in the controller: the gateway outlives any
/// single controller, so ids stay deduplicated across owner switches.
pub struct AnalyticsGateway {
    sink: Box<dyn EventSink>,
    reported_views: HashSet<StoryId>,
    dropped: usize,
}

impl AnalyticsGateway {
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self {
            sink,
            reported_views: HashSet::new(),
            dropped: 0,
        }
    }

    /// Events the sink refused since the gateway was constructed. Dropped
    /// events are never retried.
    pub fn dropped_events(&self) -> usize {
        self.dropped
    }

    pub fn handle_intent(&mut self, intent: PlaybackIntent, now_ms: f64) {
        match intent {
            PlaybackIntent::View { story_id } => {
                if !self.reported_views.insert(story_id.clone()) {
                    return;
                }
                self.forward(AnalyticsEvent {
                    story_id,
                    kind: EventKind::View,
                    elapsed_ms: 0.0,
                    emitted_at: now_ms,
                });
            }
            PlaybackIntent::CompleteView {
                story_id,
                elapsed_ms,
            } => {
                self.forward(AnalyticsEvent {
                    story_id,
                    kind: EventKind::CompleteView,
                    elapsed_ms,
                    emitted_at: now_ms,
                });
            }
        }
    }

    /// Reply affordance clicked. `elapsed_ms` is measured from when the
    /// current story became visible, not from viewer open.
    pub fn reply_click(&mut self, story_id: StoryId, elapsed_ms: f64, now_ms: f64) {
        self.forward(AnalyticsEvent {
            story_id,
            kind: EventKind::ReplyClick,
            elapsed_ms,
            emitted_at: now_ms,
        });
    }

    fn forward(&mut self, event: AnalyticsEvent) {
        if self.sink.submit(event).is_err() {
            self.dropped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Rc<RefCell<Vec<AnalyticsEvent>>>,
        reject: bool,
    }

    impl EventSink for RecordingSink {
        fn submit(&self, event: AnalyticsEvent) -> Result<(), SinkRejection> {
            if self.reject {
                return Err(SinkRejection::new("offline"));
            }
            self.events.borrow_mut().push(event);
            Ok(())
        }
    }

    #[test]
    fn view_is_deduplicated_across_controllers() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = RecordingSink {
            events: events.clone(),
            reject: false,
        };
        let mut gateway = AnalyticsGateway::new(Box::new(sink));
        let id = StoryId::new("s-1");
        gateway.handle_intent(
            PlaybackIntent::View {
                story_id: id.clone(),
            },
            10.0,
        );
        // A fresh controller for the same owner would re-report the intent.
        gateway.handle_intent(PlaybackIntent::View { story_id: id }, 20.0);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn rejections_are_swallowed_and_counted() {
        let sink = RecordingSink {
            events: Rc::new(RefCell::new(Vec::new())),
            reject: true,
        };
        let mut gateway = AnalyticsGateway::new(Box::new(sink));
        gateway.reply_click(StoryId::new("s-1"), 1200.0, 99.0);
        gateway.handle_intent(
            PlaybackIntent::CompleteView {
                story_id: StoryId::new("s-2"),
                elapsed_ms: 5000.0,
            },
            100.0,
        );
        assert_eq!(gateway.dropped_events(), 2);
    }

    #[test]
    fn complete_view_is_never_deduplicated() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = RecordingSink {
            events: events.clone(),
            reject: false,
        };
        let mut gateway = AnalyticsGateway::new(Box::new(sink));
        for _ in 0..2 {
            gateway.handle_intent(
                PlaybackIntent::CompleteView {
                    story_id: StoryId::new("s-1"),
                    elapsed_ms: 5000.0,
                },
                50.0,
            );
        }
        assert_eq!(events.borrow().len(), 2);
        assert!(events
            .borrow()
            .iter()
            .all(|event| event.kind == EventKind::CompleteView));
    }
}
