use sutori_core::{
    Owner, OwnerCarousel, PlaybackIntent, Story, StoryContent, StoryId, StorySequence,
};

fn sequence_for(owner_name: &str, story_ids: &[&str]) -> StorySequence {
    let owner = Owner {
        display_name: owner_name.to_string(),
        avatar_url: None,
        whatsapp_number: None,
        email: None,
    };
    let stories = story_ids
        .iter()
        .map(|id| Story {
            id: StoryId::new(*id),
            content: StoryContent::Image {
                url: format!("{id}.jpg"),
            },
            created_at: 1_000,
            expires_at: 87_401_000,
            view_count: 0,
        })
        .collect();
    StorySequence::new(owner, stories).unwrap()
}

fn carousel() -> OwnerCarousel {
    OwnerCarousel::new(vec![
        sequence_for("Aki", &["a-1", "a-2"]),
        sequence_for("Ben", &["b-1"]),
    ])
}

#[test]
fn select_starts_a_fresh_controller() {
    let mut carousel = carousel();
    let intents = carousel.select(0, 100.0);
    assert_eq!(
        intents,
        vec![PlaybackIntent::View {
            story_id: StoryId::new("a-1"),
        }]
    );
    assert_eq!(carousel.active_owner_index(), Some(0));
}

#[test]
fn selecting_another_owner_replaces_the_controller() {
    let mut carousel = carousel();
    carousel.select(0, 0.0);
    carousel.active_controller_mut().unwrap().advance(10.0);

    let intents = carousel.select(1, 20.0);
    assert_eq!(
        intents,
        vec![PlaybackIntent::View {
            story_id: StoryId::new("b-1"),
        }]
    );
    assert_eq!(carousel.active_owner_index(), Some(1));

    // Back to the first owner: a fresh controller re-reports its first view,
    // viewed ids never leak across selections.
    let intents = carousel.select(0, 30.0);
    assert_eq!(
        intents,
        vec![PlaybackIntent::View {
            story_id: StoryId::new("a-1"),
        }]
    );
}

#[test]
fn out_of_range_selection_is_a_no_op() {
    let mut carousel = carousel();
    assert!(carousel.select(7, 0.0).is_empty());
    assert_eq!(carousel.active_owner_index(), None);
}

#[test]
fn exhausted_owner_cannot_be_reselected() {
    let mut carousel = carousel();
    carousel.select(1, 0.0);
    {
        let controller = carousel.active_controller_mut().unwrap();
        controller.advance(10.0);
        assert!(controller.is_closed());
    }
    carousel.close_active();
    assert!(carousel.is_consumed(1));
    assert!(carousel.select(1, 20.0).is_empty());
    assert_eq!(carousel.active_owner_index(), None);

    // The other owner is unaffected.
    assert!(!carousel.select(0, 30.0).is_empty());
}

#[test]
fn reselecting_an_exhausted_owner_before_close_is_a_no_op() {
    let mut carousel = carousel();
    carousel.select(1, 0.0);
    {
        let controller = carousel.active_controller_mut().unwrap();
        controller.advance(10.0);
        assert!(controller.is_exhausted());
    }
    // No close_active between exhaustion and reselection: the dead viewer
    // must still count as consumed, not reopen with fresh intents.
    assert!(carousel.select(1, 20.0).is_empty());
    assert!(carousel.is_consumed(1));
    assert_eq!(carousel.active_owner_index(), None);
}

#[test]
fn consumed_selection_leaves_a_live_viewer_untouched() {
    let mut carousel = carousel();
    carousel.select(1, 0.0);
    carousel.active_controller_mut().unwrap().advance(10.0);
    carousel.close_active();
    assert!(carousel.is_consumed(1));

    carousel.select(0, 20.0);
    assert!(carousel.select(1, 30.0).is_empty());
    assert_eq!(carousel.active_owner_index(), Some(0));
}

#[test]
fn explicit_close_keeps_owner_selectable() {
    let mut carousel = carousel();
    carousel.select(0, 0.0);
    carousel.close_active();
    assert!(!carousel.is_consumed(0));
    assert!(!carousel.select(0, 10.0).is_empty());
}
