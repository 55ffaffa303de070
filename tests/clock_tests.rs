//! Black-box tests for the clock and timer registry.

use rustfall::clock::Clock;

#[test]
fn test_timers_update_together_on_advance() {
    let mut clock = Clock::new();
    let fast = clock.timer(10, true);
    let slow = clock.timer(100, true);

    clock.advance(10);
    assert!(clock.query(fast, None));
    assert!(!clock.query(slow, None));

    clock.advance(100);
    assert!(clock.query(fast, None));
    assert!(clock.query(slow, None));
}

#[test]
fn test_modifier_shrinks_effective_period() {
    let mut clock = Clock::new();
    let id = clock.timer(600, true);
    clock.set_modifier(id, 0.5);

    clock.advance(299);
    assert!(!clock.query(id, None));
    clock.advance(300);
    assert!(clock.query(id, None));
}

#[test]
fn test_one_shot_gate_pattern() {
    // The soft-drop gate: a one-shot polled with query and manually rearmed.
    let mut clock = Clock::new();
    let gate = clock.timer(30, false);

    assert!(!clock.query(gate, None));
    clock.advance(30);
    assert!(clock.query(gate, None));

    // Rearming clears the latch immediately, with no advance in between.
    clock.reset(gate, None);
    assert!(!clock.query(gate, None));

    clock.advance(59);
    assert!(!clock.query(gate, None));
    clock.advance(60);
    assert!(clock.query(gate, None));
}

#[test]
fn test_delay_stacks_with_periodic_rearm() {
    let mut clock = Clock::new();
    let id = clock.timer(100, true);

    clock.delay(id, 50);
    clock.delay(id, 50);
    clock.advance(199);
    assert!(!clock.query(id, None));
    clock.advance(200);
    assert!(clock.query(id, None));

    // Re-armed from 200; back on the base cadence.
    clock.advance(300);
    assert!(clock.query(id, None));
}

#[test]
fn test_killed_slot_is_reused() {
    let mut clock = Clock::new();
    let a = clock.timer(10, true);
    clock.kill(a);
    let b = clock.timer(20, true);
    // Ids stay dense: the freed slot is recycled for the next timer.
    assert_eq!(a, b);

    clock.advance(20);
    assert!(clock.query(b, None));
}
