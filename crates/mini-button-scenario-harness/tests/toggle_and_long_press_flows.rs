use mini_button_scenario_harness::{
    button, repeat, toggle, watched, Device, ScenarioHarness, SharedClock, SharedLine,
};

#[test]
fn toggle_flips_on_press_edges_only() {
    let mut harness = ScenarioHarness::new(0, toggle(25, false));

    // Presses of very different lengths, separated by releases.
    let presses = [40u32, 3_000, 26, 500, 60_000];
    let mut expected = false;
    for hold in presses {
        let flips = harness.hold(true, hold, 5).iter().filter(|s| s.changed).count();
        expected = !expected;
        assert_eq!(flips, 1, "press of {hold}ms");
        assert_eq!(harness.device().toggle_state(), expected);

        let flips = harness.hold(false, 100, 5).iter().filter(|s| s.changed).count();
        assert_eq!(flips, 0, "release after {hold}ms");
        assert_eq!(harness.device().toggle_state(), expected);
    }
}

#[test]
fn toggle_reports_latch_not_button() {
    let mut harness = ScenarioHarness::new(0, toggle(10, false));

    harness.hold(true, 50, 1);
    harness.hold(false, 50, 1);
    let last = *harness.samples().last().unwrap();
    assert!(last.state);
    assert!(harness.device().button().is_released());
}

#[test]
fn toggle_starting_on() {
    let mut harness = ScenarioHarness::new(0, toggle(10, true));
    harness.hold(false, 100, 1);
    assert!(harness.device().toggle_state());
    harness.hold(true, 100, 1);
    assert!(!harness.device().toggle_state());
}

#[test]
fn long_press_crosses_threshold_once() {
    let mut harness = ScenarioHarness::new(0, watched(button(25), 1_000));

    harness.hold(true, 2_000, 5);
    // Press confirmed at t=25, so the threshold is crossed at t=1025.
    let changes = harness.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].at, 1_025);
    assert!(changes[0].state);
    assert_eq!(harness.device().long_press().last_change(), 1_025);
}

#[test]
fn long_press_drops_on_release() {
    let mut harness = ScenarioHarness::new(0, watched(button(25), 1_000));

    harness.hold(true, 1_500, 5);
    harness.hold(false, 100, 5);
    let changes = harness.changes();
    assert_eq!(changes.len(), 2);
    assert!(!changes[1].state);
    // Release confirmed at 1500 + 25, the observer follows on the same poll.
    assert_eq!(changes[1].at, 1_525);
    assert_eq!(harness.device().device().last_change(), 1_525);
}

#[test]
fn short_presses_never_long_press() {
    let mut harness = ScenarioHarness::new(0, watched(button(25), 1_000));

    for _ in 0..10 {
        harness.hold(true, 900, 10);
        harness.hold(false, 200, 10);
    }
    assert!(harness.changes().is_empty());
}

#[test]
fn long_press_on_a_toggle_measures_the_latch() {
    let mut harness = ScenarioHarness::new(0, watched(toggle(10, false), 500));

    // Tap once: the latch goes on at t=10 and stays on after release.
    harness.hold(true, 50, 1);
    harness.hold(false, 600, 1);
    let changes = harness.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].at, 510);
    assert!(harness.device().device().button().is_released());
}

#[test]
fn long_press_on_repeat_restarts_with_every_blip() {
    let mut harness = ScenarioHarness::new(0, watched(repeat(1, 500, 100), 80));

    harness.hold(true, 1_000, 1);
    // Virtual press at t=1 (observer on at t=81), blips at 501, 601, ...
    // and each virtual re-press starts the 80ms count again.
    let on: Vec<u32> = harness
        .changes()
        .into_iter()
        .filter(|s| s.state)
        .map(|s| s.at)
        .collect();
    assert_eq!(on, vec![81, 582, 682, 782, 882, 982]);
}

/// Replays one script from `start` and returns `(offset, state, changed)`.
fn relative_run<D: Device>(
    start: u32,
    build: impl FnOnce(SharedLine, SharedClock) -> D,
) -> Vec<(u32, bool, bool)> {
    let mut harness = ScenarioHarness::new(start, build);
    harness.script(
        &[
            (true, 4),
            (false, 3),
            (true, 1_300),
            (false, 60),
            (true, 40),
            (false, 200),
        ],
        1,
    );
    harness
        .samples()
        .iter()
        .map(|s| (s.at.wrapping_sub(start), s.state, s.changed))
        .collect()
}

#[test]
fn behaviour_is_the_same_across_clock_wrap() {
    for start in [u32::MAX - 50, u32::MAX - 1_000, 65_530] {
        assert_eq!(
            relative_run(start, watched(button(25), 1_000)),
            relative_run(1_000, watched(button(25), 1_000)),
            "long press from {start}"
        );
        assert_eq!(
            relative_run(start, toggle(25, false)),
            relative_run(1_000, toggle(25, false)),
            "toggle from {start}"
        );
        assert_eq!(
            relative_run(start, repeat(25, 500, 100)),
            relative_run(1_000, repeat(25, 500, 100)),
            "repeat from {start}"
        );
    }
}
