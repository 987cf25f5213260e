use serde::Deserialize;
use sutori_core::{Owner, Story, StorySequence};

/// One owner's record in a host-supplied payload: profile fields plus the
/// already-filtered, newest-first story list. Owners whose filtered list came
/// back empty are skipped rather than offered in the carousel.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwnerRecord {
    #[serde(flatten)]
    pub(crate) owner: Owner,
    pub(crate) stories: Vec<Story>,
}

pub(crate) fn sequences_from_json(payload: &str) -> Result<Vec<StorySequence>, serde_json::Error> {
    let records: Vec<OwnerRecord> = serde_json::from_str(payload)?;
    Ok(records
        .into_iter()
        .filter_map(|record| StorySequence::new(record.owner, record.stories).ok())
        .collect())
}

const DEMO_PAYLOAD: &str = r##"[
  {
    "display_name": "Mika Tanaka",
    "avatar_url": "demo/mika.jpg",
    "whatsapp_number": "+81 80 1234 5678",
    "stories": [
      {
        "id": "mika-3",
        "content_type": "image",
        "url": "demo/mika-latte.jpg",
        "created_at": 1756200000000,
        "expires_at": 1756286400000,
        "view_count": 41
      },
      {
        "id": "mika-2",
        "content_type": "text",
        "text": "New seasonal menu starts Friday!",
        "background": "#3d2b56",
        "created_at": 1756180000000,
        "expires_at": 1756266400000,
        "view_count": 87
      },
      {
        "id": "mika-1",
        "content_type": "video",
        "url": "demo/mika-pour.mp4",
        "created_at": 1756160000000,
        "expires_at": 1756246400000,
        "view_count": 129
      }
    ]
  },
  {
    "display_name": "Leo Brandt",
    "avatar_url": "demo/leo.jpg",
    "email": "leo@brandt.studio",
    "stories": [
      {
        "id": "leo-2",
        "content_type": "image",
        "url": "demo/leo-site.jpg",
        "created_at": 1756190000000,
        "expires_at": 1756276400000,
        "view_count": 12
      },
      {
        "id": "leo-1",
        "content_type": "text",
        "text": "Booking spring projects now.",
        "background": "#14532d",
        "created_at": 1756150000000,
        "expires_at": 1756236400000,
        "view_count": 33
      }
    ]
  }
]"##;

pub(crate) fn demo_sequences() -> Vec<StorySequence> {
    sequences_from_json(DEMO_PAYLOAD).unwrap_or_default()
}
