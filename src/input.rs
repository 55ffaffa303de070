//! Key bindings and per-action key repeat.
//!
//! Terminals deliver key presses, sometimes releases, and sometimes nothing
//! but a stream of repeated presses. This layer normalizes all of that into
//! one `GameAction` on the press edge plus repeats paced by per-action clock
//! timers: an initial delay, then a steady interval, with different tables
//! per action class (movement repeats fast, rotation slower, meta keys
//! slowest so a held pause key does not bounce).
//!
//! Terminals that never emit release events are handled with a timeout: a
//! held key whose press events stop arriving is treated as released.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::clock::{Clock, TimerId};
use crate::types::GameAction;

/// Initial delay and repeat interval in milliseconds.
fn repeat_delays(action: GameAction) -> (u64, u64) {
    match action {
        GameAction::MoveLeft | GameAction::MoveRight | GameAction::SoftDrop => (120, 20),
        GameAction::HardDrop | GameAction::RotateCw | GameAction::RotateCcw => (200, 100),
        _ => (1_000, 1_000),
    }
}

// Holds with no press activity for this long are treated as released.
const KEY_RELEASE_TIMEOUT_MS: u64 = 150;

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    code: KeyCode,
    action: GameAction,
    timer: TimerId,
    /// Repeat interval rearmed into the timer after the first fire.
    interval: u64,
    /// Clock reading of the most recent press event for this key.
    last_seen: u64,
}

/// Maps key codes to actions and paces repeats through the shared clock.
pub struct InputHandler {
    bindings: Vec<(KeyCode, GameAction)>,
    held: ArrayVec<HeldKey, 8>,
    release_timeout_ms: u64,
}

impl InputHandler {
    pub fn new(bindings: Vec<(KeyCode, GameAction)>) -> Self {
        Self {
            bindings,
            held: ArrayVec::new(),
            release_timeout_ms: KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    fn lookup(&self, code: KeyCode) -> Option<GameAction> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|&(_, action)| action)
    }

    /// Handle a press (or terminal auto-repeat) event.
    ///
    /// Returns the bound action on the press edge only; repeated presses of
    /// a held key just keep the hold alive.
    pub fn key_press(&mut self, clock: &mut Clock, code: KeyCode) -> Option<GameAction> {
        let action = self.lookup(code)?;
        if let Some(held) = self.held.iter_mut().find(|held| held.code == code) {
            held.last_seen = clock.now();
            return None;
        }

        let (delay, interval) = repeat_delays(action);
        let timer = clock.timer(delay, false);
        let held = HeldKey {
            code,
            action,
            timer,
            interval,
            last_seen: clock.now(),
        };
        if self.held.try_push(held).is_err() {
            // Rollover protection; drop the repeat, keep the edge action.
            clock.kill(timer);
        }
        Some(action)
    }

    pub fn key_release(&mut self, clock: &mut Clock, code: KeyCode) {
        if let Some(index) = self.held.iter().position(|held| held.code == code) {
            let held = self.held.swap_remove(index);
            clock.kill(held.timer);
        }
    }

    /// Per-frame poll: emit repeats for held keys, dropping stale holds.
    pub fn poll(&mut self, clock: &mut Clock) -> ArrayVec<GameAction, 16> {
        let mut actions = ArrayVec::new();
        let now = clock.now();

        let mut index = 0;
        while index < self.held.len() {
            let held = self.held[index];
            if now.saturating_sub(held.last_seen) > self.release_timeout_ms {
                clock.kill(held.timer);
                self.held.swap_remove(index);
                continue;
            }
            // First fire after the initial delay, then rearmed per interval.
            if clock.query(held.timer, Some(held.interval)) {
                let _ = actions.try_push(held.action);
            }
            index += 1;
        }
        actions
    }

    /// Drop every hold, e.g. on focus loss.
    pub fn reset(&mut self, clock: &mut Clock) {
        for held in self.held.drain(..) {
            clock.kill(held.timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn handler() -> InputHandler {
        InputHandler::new(Config::default().bindings().unwrap())
            .with_release_timeout_ms(10_000)
    }

    #[test]
    fn test_press_edge_emits_bound_action() {
        let mut clock = Clock::new();
        let mut input = handler();

        assert_eq!(
            input.key_press(&mut clock, KeyCode::Left),
            Some(GameAction::MoveLeft)
        );
        // Repeated press of a held key is not a new edge.
        assert_eq!(input.key_press(&mut clock, KeyCode::Left), None);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut clock = Clock::new();
        let mut input = handler();
        assert_eq!(input.key_press(&mut clock, KeyCode::Char('q')), None);
        clock.advance(5_000);
        assert!(input.poll(&mut clock).is_empty());
    }

    #[test]
    fn test_movement_repeats_after_initial_delay() {
        let mut clock = Clock::new();
        let mut input = handler();
        input.key_press(&mut clock, KeyCode::Left);

        clock.advance(119);
        assert!(input.poll(&mut clock).is_empty());

        clock.advance(120);
        assert_eq!(input.poll(&mut clock).as_slice(), &[GameAction::MoveLeft]);

        // Now on the 20ms repeat interval.
        clock.advance(139);
        assert!(input.poll(&mut clock).is_empty());
        clock.advance(140);
        assert_eq!(input.poll(&mut clock).as_slice(), &[GameAction::MoveLeft]);
    }

    #[test]
    fn test_release_stops_repeats() {
        let mut clock = Clock::new();
        let mut input = handler();
        input.key_press(&mut clock, KeyCode::Right);
        input.key_release(&mut clock, KeyCode::Right);

        clock.advance(1_000);
        assert!(input.poll(&mut clock).is_empty());
    }

    #[test]
    fn test_stale_hold_auto_releases() {
        let mut clock = Clock::new();
        let mut input = InputHandler::new(Config::default().bindings().unwrap())
            .with_release_timeout_ms(150);
        input.key_press(&mut clock, KeyCode::Left);

        // No further press events arrive; the hold goes stale.
        clock.advance(151);
        assert!(input.poll(&mut clock).is_empty());
        clock.advance(400);
        assert!(input.poll(&mut clock).is_empty());
    }

    #[test]
    fn test_repeated_press_keeps_hold_alive() {
        let mut clock = Clock::new();
        let mut input = InputHandler::new(Config::default().bindings().unwrap())
            .with_release_timeout_ms(150);
        input.key_press(&mut clock, KeyCode::Left);

        clock.advance(100);
        input.key_press(&mut clock, KeyCode::Left);
        clock.advance(200);
        // 100ms since last press: still held, and past the initial delay.
        assert_eq!(input.poll(&mut clock).as_slice(), &[GameAction::MoveLeft]);
    }

    #[test]
    fn test_meta_keys_repeat_slowly() {
        let mut clock = Clock::new();
        let mut input = handler();
        assert_eq!(
            input.key_press(&mut clock, KeyCode::Char('p')),
            Some(GameAction::Pause)
        );

        clock.advance(999);
        assert!(input.poll(&mut clock).is_empty());
        clock.advance(1_000);
        assert_eq!(input.poll(&mut clock).as_slice(), &[GameAction::Pause]);
    }

    #[test]
    fn test_two_keys_repeat_independently() {
        let mut clock = Clock::new();
        let mut input = handler();
        input.key_press(&mut clock, KeyCode::Left);
        clock.advance(80);
        input.key_press(&mut clock, KeyCode::Down);

        clock.advance(120);
        // Left passed its 120ms delay; down (pressed at 80) has not.
        assert_eq!(input.poll(&mut clock).as_slice(), &[GameAction::MoveLeft]);

        clock.advance(200);
        let actions = input.poll(&mut clock);
        assert!(actions.contains(&GameAction::MoveLeft));
        assert!(actions.contains(&GameAction::SoftDrop));
    }

    #[test]
    fn test_reset_drops_all_holds() {
        let mut clock = Clock::new();
        let mut input = handler();
        input.key_press(&mut clock, KeyCode::Left);
        input.key_press(&mut clock, KeyCode::Down);

        input.reset(&mut clock);
        clock.advance(1_000);
        assert!(input.poll(&mut clock).is_empty());
    }
}
