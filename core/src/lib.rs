pub mod analytics;
pub mod carousel;
pub mod gesture;
pub mod playback;
pub mod reply;
pub mod story;

pub use analytics::{AnalyticsEvent, AnalyticsGateway, EventKind, EventSink, SinkRejection};
pub use carousel::OwnerCarousel;
pub use gesture::{
    GestureCommand, GestureInterpreter, CLOSE_SWIPE_THRESHOLD_PX, SWIPE_THRESHOLD_PX, TAP_SLOP_PX,
};
pub use playback::{PlaybackController, PlaybackIntent, PlaybackPhase, PlaybackSnapshot};
pub use reply::{mailto_reply_url, whatsapp_reply_url};
pub use story::{
    Owner, SequenceError, Story, StoryContent, StoryId, StorySequence, DEFAULT_STORY_DURATION_MS,
};
