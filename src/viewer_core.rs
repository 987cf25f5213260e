use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sutori_core::{
    mailto_reply_url, whatsapp_reply_url, AnalyticsGateway, EventSink, GestureCommand,
    GestureInterpreter, Owner, OwnerCarousel, PlaybackSnapshot, Story, StoryId, StorySequence,
};

pub(crate) type ViewerSubscriber = Rc<dyn Fn()>;

/// App-side owner of the playback engine. All mutation funnels through the
/// command methods here; renderers read snapshots and subscribe for change
/// notifications.
pub(crate) struct ViewerCore {
    state: RefCell<ViewerState>,
    subscribers: RefCell<Vec<(usize, ViewerSubscriber)>>,
    next_subscriber: Cell<usize>,
}

struct ViewerState {
    carousel: OwnerCarousel,
    gateway: AnalyticsGateway,
    gestures: GestureInterpreter,
}

#[derive(Clone, PartialEq)]
pub(crate) struct ViewerSnapshot {
    pub(crate) active_owner: Option<usize>,
    pub(crate) playback: Option<PlaybackSnapshot>,
    pub(crate) consumed: Vec<bool>,
}

pub(crate) struct ViewerSubscription {
    core: Rc<ViewerCore>,
    id: usize,
}

impl Drop for ViewerSubscription {
    fn drop(&mut self) {
        self.core
            .subscribers
            .borrow_mut()
            .retain(|(id, _)| *id != self.id);
    }
}

impl ViewerCore {
    pub(crate) fn new(sequences: Vec<StorySequence>, sink: Box<dyn EventSink>) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(ViewerState {
                carousel: OwnerCarousel::new(sequences),
                gateway: AnalyticsGateway::new(sink),
                gestures: GestureInterpreter::new(),
            }),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber: Cell::new(0),
        })
    }

    pub(crate) fn subscribe(self: &Rc<Self>, subscriber: ViewerSubscriber) -> ViewerSubscription {
        let id = self.next_subscriber.get();
        self.next_subscriber.set(id + 1);
        self.subscribers.borrow_mut().push((id, subscriber));
        ViewerSubscription {
            core: self.clone(),
            id,
        }
    }

    pub(crate) fn snapshot(&self) -> ViewerSnapshot {
        let state = self.state.borrow();
        ViewerSnapshot {
            active_owner: state.carousel.active_owner_index(),
            playback: state
                .carousel
                .active_controller()
                .map(|controller| controller.snapshot()),
            consumed: (0..state.carousel.owner_count())
                .map(|index| state.carousel.is_consumed(index))
                .collect(),
        }
    }

    pub(crate) fn owners(&self) -> Vec<Owner> {
        let state = self.state.borrow();
        state
            .carousel
            .sequences()
            .iter()
            .map(|sequence| sequence.owner().clone())
            .collect()
    }

    pub(crate) fn current_story(&self) -> Option<Story> {
        let state = self.state.borrow();
        state
            .carousel
            .active_controller()
            .and_then(|controller| controller.current_story().cloned())
    }

    pub(crate) fn select_owner(&self, index: usize, now_ms: f64) {
        {
            let state = &mut *self.state.borrow_mut();
            let intents = state.carousel.select(index, now_ms);
            for intent in intents {
                state.gateway.handle_intent(intent, now_ms);
            }
        }
        self.notify();
    }

    pub(crate) fn close_viewer(&self) {
        self.state.borrow_mut().carousel.close_active();
        self.notify();
    }

    pub(crate) fn tick(&self, delta_ms: f64, now_ms: f64) {
        let changed = {
            let state = &mut *self.state.borrow_mut();
            let Some(controller) = state.carousel.active_controller_mut() else {
                return;
            };
            let before = controller.snapshot();
            let intents = controller.tick(delta_ms, now_ms);
            let closed = controller.is_closed();
            let changed = closed || controller.snapshot() != before;
            for intent in intents {
                state.gateway.handle_intent(intent, now_ms);
            }
            if closed {
                state.carousel.close_active();
            }
            changed
        };
        if changed {
            self.notify();
        }
    }

    pub(crate) fn advance(&self, now_ms: f64) {
        self.apply(GestureCommand::Advance, now_ms);
    }

    pub(crate) fn retreat(&self, now_ms: f64) {
        self.apply(GestureCommand::Retreat, now_ms);
    }

    pub(crate) fn jump_to(&self, index: usize, now_ms: f64) {
        {
            let state = &mut *self.state.borrow_mut();
            let Some(controller) = state.carousel.active_controller_mut() else {
                return;
            };
            let intents = controller.jump_to(index, now_ms);
            for intent in intents {
                state.gateway.handle_intent(intent, now_ms);
            }
        }
        self.notify();
    }

    pub(crate) fn toggle_pause(&self) {
        {
            let state = &mut *self.state.borrow_mut();
            let Some(controller) = state.carousel.active_controller_mut() else {
                return;
            };
            if controller.snapshot().is_paused {
                controller.resume();
            } else {
                controller.pause();
            }
        }
        self.notify();
    }

    pub(crate) fn gesture_begin(&self, x: f64, y: f64, now_ms: f64) {
        let command = self.state.borrow_mut().gestures.begin(x, y);
        if let Some(command) = command {
            self.apply(command, now_ms);
        }
    }

    pub(crate) fn gesture_finish(&self, x: f64, y: f64, viewer_width: f64, now_ms: f64) {
        let commands = self
            .state
            .borrow_mut()
            .gestures
            .finish(x, y, viewer_width);
        for command in commands {
            self.apply(command, now_ms);
        }
    }

    pub(crate) fn gesture_cancel(&self, now_ms: f64) {
        let command = self.state.borrow_mut().gestures.cancel();
        if let Some(command) = command {
            self.apply(command, now_ms);
        }
    }

    pub(crate) fn gesture_active(&self) -> bool {
        self.state.borrow().gestures.is_active()
    }

    pub(crate) fn report_video_duration(&self, id: &StoryId, duration_ms: f64) {
        let state = &mut *self.state.borrow_mut();
        if let Some(controller) = state.carousel.active_controller_mut() {
            controller.report_video_duration(id, duration_ms);
        }
    }

    /// Builds the WhatsApp deep link for the active owner and reports the
    /// reply click. Returns None when the owner has no usable number.
    pub(crate) fn whatsapp_reply(&self, now_ms: f64) -> Option<String> {
        self.reply_link(now_ms, |owner| {
            let number = owner.whatsapp_number.as_deref()?;
            whatsapp_reply_url(number, &owner.display_name)
        })
    }

    pub(crate) fn email_reply(&self, now_ms: f64) -> Option<String> {
        self.reply_link(now_ms, |owner| {
            let email = owner.email.as_deref()?;
            mailto_reply_url(email, &owner.display_name)
        })
    }

    fn reply_link<F>(&self, now_ms: f64, build: F) -> Option<String>
    where
        F: Fn(&Owner) -> Option<String>,
    {
        let state = &mut *self.state.borrow_mut();
        let controller = state.carousel.active_controller()?;
        let story_id = controller.current_story()?.id.clone();
        let elapsed = controller.elapsed_current_ms(now_ms);
        let url = build(controller.sequence().owner())?;
        state.gateway.reply_click(story_id, elapsed, now_ms);
        Some(url)
    }

    fn apply(&self, command: GestureCommand, now_ms: f64) {
        {
            let state = &mut *self.state.borrow_mut();
            let Some(controller) = state.carousel.active_controller_mut() else {
                return;
            };
            let intents = match command {
                GestureCommand::Advance => controller.advance(now_ms),
                GestureCommand::Retreat => controller.retreat(now_ms),
                GestureCommand::Close => {
                    controller.close();
                    Vec::new()
                }
                GestureCommand::SuspendGesture => {
                    controller.suspend_for_gesture();
                    Vec::new()
                }
                GestureCommand::ReleaseGesture => {
                    controller.release_gesture();
                    Vec::new()
                }
            };
            let closed = controller.is_closed();
            for intent in intents {
                state.gateway.handle_intent(intent, now_ms);
            }
            if closed {
                state.carousel.close_active();
            }
        }
        self.notify();
    }

    fn notify(&self) {
        let subscribers: Vec<ViewerSubscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber();
        }
    }
}
