use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_STORY_DURATION_MS: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content_type", rename_all = "lowercase")]
pub enum StoryContent {
    Image { url: String },
    Video { url: String },
    Text { text: String, background: String },
}

impl StoryContent {
    pub fn is_video(&self) -> bool {
        matches!(self, StoryContent::Video { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(flatten)]
    pub content: StoryContent,
    pub created_at: i64,
    pub expires_at: i64,
    #[serde(default)]
    pub view_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    Empty,
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::Empty => {
                write!(f, "story sequence must contain at least one story")
            }
            SequenceError::IndexOutOfRange { index, len } => {
                write!(f, "story index {index} out of range for sequence of {len}")
            }
        }
    }
}

impl std::error::Error for SequenceError {}

/// An owner's ordered, non-empty list of stories. Immutable for the duration
/// of one playback session, except for video duration corrections reported by
/// the host once media metadata becomes available.
#[derive(Debug, Clone)]
pub struct StorySequence {
    owner: Owner,
    stories: Vec<Story>,
    video_durations: HashMap<StoryId, f64>,
}

impl StorySequence {
    pub fn new(owner: Owner, stories: Vec<Story>) -> Result<Self, SequenceError> {
        if stories.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self {
            owner,
            stories,
            video_durations: HashMap::new(),
        })
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Bounds-checked accessor. Callers clamp before calling; an out-of-range
    /// index here is a programmer error, never silently clamped.
    pub fn at(&self, index: usize) -> Result<&Story, SequenceError> {
        self.stories
            .get(index)
            .ok_or(SequenceError::IndexOutOfRange {
                index,
                len: self.stories.len(),
            })
    }

    /// Display duration for one story. Image and text cards use the fixed
    /// default; video uses the media duration once reported, falling back to
    /// the same default until then.
    pub fn duration_of(&self, story: &Story) -> f64 {
        if story.content.is_video() {
            if let Some(duration) = self.video_durations.get(&story.id) {
                return *duration;
            }
        }
        DEFAULT_STORY_DURATION_MS
    }

    /// Records the actual media duration for a video story. Ignored for ids
    /// not in this sequence, non-video stories, and non-positive durations.
    pub fn set_video_duration(&mut self, id: &StoryId, duration_ms: f64) {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return;
        }
        let is_video = self
            .stories
            .iter()
            .any(|story| story.id == *id && story.content.is_video());
        if is_video {
            self.video_durations.insert(id.clone(), duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, content: StoryContent) -> Story {
        Story {
            id: StoryId::new(id),
            content,
            created_at: 1_000,
            expires_at: 87_401_000,
            view_count: 0,
        }
    }

    fn owner() -> Owner {
        Owner {
            display_name: "Aki".to_string(),
            avatar_url: None,
            whatsapp_number: None,
            email: None,
        }
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let result = StorySequence::new(owner(), Vec::new());
        assert_eq!(result.err(), Some(SequenceError::Empty));
    }

    #[test]
    fn at_reports_out_of_range() {
        let sequence = StorySequence::new(
            owner(),
            vec![story(
                "a",
                StoryContent::Image {
                    url: "a.jpg".to_string(),
                },
            )],
        )
        .unwrap();
        assert!(sequence.at(0).is_ok());
        assert_eq!(
            sequence.at(1).err(),
            Some(SequenceError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn video_duration_falls_back_then_corrects() {
        let mut sequence = StorySequence::new(
            owner(),
            vec![story(
                "v",
                StoryContent::Video {
                    url: "v.mp4".to_string(),
                },
            )],
        )
        .unwrap();
        let id = sequence.at(0).unwrap().id.clone();
        assert_eq!(
            sequence.duration_of(sequence.at(0).unwrap()),
            DEFAULT_STORY_DURATION_MS
        );
        sequence.set_video_duration(&id, 12_000.0);
        assert_eq!(sequence.duration_of(sequence.at(0).unwrap()), 12_000.0);
    }

    #[test]
    fn video_duration_ignores_non_video_and_bad_values() {
        let mut sequence = StorySequence::new(
            owner(),
            vec![story(
                "t",
                StoryContent::Text {
                    text: "hello".to_string(),
                    background: "#222222".to_string(),
                },
            )],
        )
        .unwrap();
        let id = sequence.at(0).unwrap().id.clone();
        sequence.set_video_duration(&id, 9_000.0);
        sequence.set_video_duration(&StoryId::new("missing"), 9_000.0);
        assert_eq!(
            sequence.duration_of(sequence.at(0).unwrap()),
            DEFAULT_STORY_DURATION_MS
        );

        let mut video_sequence = StorySequence::new(
            owner(),
            vec![story(
                "v",
                StoryContent::Video {
                    url: "v.mp4".to_string(),
                },
            )],
        )
        .unwrap();
        let video_id = video_sequence.at(0).unwrap().id.clone();
        video_sequence.set_video_duration(&video_id, 0.0);
        video_sequence.set_video_duration(&video_id, f64::NAN);
        assert_eq!(
            video_sequence.duration_of(video_sequence.at(0).unwrap()),
            DEFAULT_STORY_DURATION_MS
        );
    }

    #[test]
    fn story_record_decodes_tagged_content() {
        let json = r##"{
            "id": "s-1",
            "content_type": "text",
            "text": "open for business",
            "background": "#101010",
            "created_at": 1700000000000,
            "expires_at": 1700086400000,
            "view_count": 7
        }"##;
        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.id.as_str(), "s-1");
        assert_eq!(story.view_count, 7);
        assert!(matches!(story.content, StoryContent::Text { .. }));
    }
}
