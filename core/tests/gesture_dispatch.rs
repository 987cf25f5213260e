use sutori_core::{GestureCommand, GestureInterpreter};

const VIEWER_WIDTH: f64 = 400.0;

fn released(start: (f64, f64), end: (f64, f64)) -> Vec<GestureCommand> {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(
        interpreter.begin(start.0, start.1),
        Some(GestureCommand::SuspendGesture)
    );
    interpreter.finish(end.0, end.1, VIEWER_WIDTH)
}

fn nav_commands(commands: &[GestureCommand]) -> Vec<GestureCommand> {
    commands
        .iter()
        .copied()
        .filter(|command| {
            !matches!(
                command,
                GestureCommand::SuspendGesture | GestureCommand::ReleaseGesture
            )
        })
        .collect()
}

#[test]
fn left_swipe_past_threshold_advances() {
    let commands = released((300.0, 200.0), (180.0, 200.0));
    assert_eq!(nav_commands(&commands), vec![GestureCommand::Advance]);
}

#[test]
fn right_swipe_past_threshold_retreats() {
    let commands = released((100.0, 200.0), (220.0, 200.0));
    assert_eq!(nav_commands(&commands), vec![GestureCommand::Retreat]);
}

#[test]
fn sub_threshold_drag_snaps_back() {
    // Past tap slop but short of the swipe threshold: release only.
    let commands = released((100.0, 200.0), (180.0, 200.0));
    assert_eq!(commands, vec![GestureCommand::ReleaseGesture]);
}

#[test]
fn swipe_down_closes_regardless_of_horizontal() {
    let commands = released((100.0, 100.0), (350.0, 300.0));
    assert_eq!(nav_commands(&commands), vec![GestureCommand::Close]);
}

#[test]
fn swipe_up_never_closes() {
    let commands = released((100.0, 300.0), (100.0, 100.0));
    assert!(nav_commands(&commands).is_empty());
}

#[test]
fn tap_on_left_half_retreats() {
    let commands = released((80.0, 200.0), (90.0, 210.0));
    assert_eq!(nav_commands(&commands), vec![GestureCommand::Retreat]);
}

#[test]
fn tap_on_right_half_advances() {
    let commands = released((320.0, 200.0), (310.0, 190.0));
    assert_eq!(nav_commands(&commands), vec![GestureCommand::Advance]);
}

#[test]
fn suspension_brackets_every_gesture_exactly_once() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(
        interpreter.begin(100.0, 100.0),
        Some(GestureCommand::SuspendGesture)
    );
    // A second down for the same physical gesture must not double-suspend.
    assert_eq!(interpreter.begin(101.0, 101.0), None);

    let commands = interpreter.finish(100.0, 100.0, VIEWER_WIDTH);
    assert_eq!(
        commands
            .iter()
            .filter(|command| **command == GestureCommand::ReleaseGesture)
            .count(),
        1
    );
    // Release without an active gesture emits nothing.
    assert!(interpreter.finish(100.0, 100.0, VIEWER_WIDTH).is_empty());
}

#[test]
fn cancel_releases_without_navigation() {
    let mut interpreter = GestureInterpreter::new();
    interpreter.begin(100.0, 100.0);
    assert_eq!(interpreter.cancel(), Some(GestureCommand::ReleaseGesture));
    assert_eq!(interpreter.cancel(), None);
    assert!(!interpreter.is_active());
}

#[test]
fn release_always_precedes_navigation() {
    let commands = released((300.0, 200.0), (150.0, 200.0));
    assert_eq!(
        commands,
        vec![GestureCommand::ReleaseGesture, GestureCommand::Advance]
    );
}
