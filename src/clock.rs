//! Clock and timer registry driving simulation, input repeat, and animation.
//!
//! One `Clock` owns every `Timer` in the program. The frame loop calls
//! `Clock::advance` exactly once per frame with the current monotonic time;
//! each timer then shifts its two-slot edge signal and fires if its period
//! has elapsed. Components hold `TimerId` handles and poll through the clock,
//! so no timer can fire out of order relative to the frame boundary.
//!
//! Two polling styles share the same primitive:
//! - `query` is level-triggered: true on every poll while the fired flag is
//!   set (a fired one-shot stays latched until reset).
//! - `tick` is edge-triggered: true only on the frame where the fired flag
//!   went false -> true.

/// Handle to a timer registered with a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(usize);

type Callback = Box<dyn FnMut()>;

struct Timer {
    /// Base period in milliseconds.
    period: u64,
    /// Speed scale; effective period is `period * modifier`.
    modifier: f64,
    /// Reference mark of the last (re)arm. Signed: `delay` may push it past
    /// `now` and `force` pulls it below zero.
    mark: i64,
    running: bool,
    periodic: bool,
    /// `[current, previous]` fired state for edge detection.
    signal: [bool; 2],
    callback: Option<Callback>,
}

impl Timer {
    fn new(now: u64, period: u64, periodic: bool) -> Self {
        Self {
            period,
            modifier: 1.0,
            mark: now as i64,
            running: true,
            periodic,
            signal: [false, false],
            callback: None,
        }
    }

    fn scaled_period(&self) -> f64 {
        self.period as f64 * self.modifier
    }

    fn reset(&mut self, now: u64, period: Option<u64>) {
        self.mark = now as i64;
        self.running = true;
        self.signal = [false, false];
        if let Some(period) = period {
            self.period = period;
        }
    }

    fn force(&mut self) {
        self.running = true;
        // The mark must clear the scaled period, not the base one, or a
        // slowed-down timer (modifier > 1) would not fire on the next poll.
        self.mark = -(self.scaled_period().ceil() as i64);
    }

    fn update(&mut self, now: u64) {
        self.signal[1] = self.signal[0];
        if !self.running {
            return;
        }
        self.signal[0] = false;
        if (now as i64 - self.mark) as f64 >= self.scaled_period() {
            self.signal[0] = true;
            self.running = self.periodic;
            self.mark = now as i64;
            if let Some(callback) = self.callback.as_mut() {
                callback();
                if !self.periodic {
                    self.callback = None;
                }
            }
        }
    }

    fn progress(&self, now: u64) -> f64 {
        if !self.running {
            return 1.0;
        }
        (now as i64 - self.mark) as f64 / self.scaled_period()
    }
}

/// Monotonic time source and timer registry.
pub struct Clock {
    now: u64,
    dt: u64,
    timers: Vec<Option<Timer>>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: 0,
            dt: 0,
            timers: Vec::new(),
        }
    }

    /// Current clock reading in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Milliseconds elapsed between the last two `advance` calls.
    pub fn dt(&self) -> u64 {
        self.dt
    }

    /// Register a new timer, armed from the current reading.
    pub fn timer(&mut self, period: u64, periodic: bool) -> TimerId {
        let timer = Timer::new(self.now, period, periodic);
        // Reuse the first dead slot so ids stay dense across kill/respawn.
        for (index, slot) in self.timers.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(timer);
                return TimerId(index);
            }
        }
        self.timers.push(Some(timer));
        TimerId(self.timers.len() - 1)
    }

    /// Detach a timer. Polling a killed id reports false from then on.
    pub fn kill(&mut self, id: TimerId) {
        if let Some(slot) = self.timers.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Advance the clock to `now` and update every timer once.
    pub fn advance(&mut self, now: u64) {
        self.dt = now.saturating_sub(self.now);
        self.now = now;
        for slot in &mut self.timers {
            if let Some(timer) = slot {
                timer.update(now);
            }
        }
    }

    fn get_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Rearm a timer from the current reading, optionally changing its period.
    pub fn reset(&mut self, id: TimerId, period: Option<u64>) {
        let now = self.now;
        if let Some(timer) = self.get_mut(id) {
            timer.reset(now, period);
        }
    }

    /// Mark a timer as already elapsed; it fires on the next `advance`.
    pub fn force(&mut self, id: TimerId) {
        if let Some(timer) = self.get_mut(id) {
            timer.force();
        }
    }

    /// Push the reference mark forward, postponing the next fire by `amount`.
    pub fn delay(&mut self, id: TimerId, amount: u64) {
        if let Some(timer) = self.get_mut(id) {
            timer.mark += amount as i64;
        }
    }

    /// Scale the effective period; drop cadence uses this for the speed curve.
    pub fn set_modifier(&mut self, id: TimerId, modifier: f64) {
        if let Some(timer) = self.get_mut(id) {
            timer.modifier = modifier;
        }
    }

    /// Level-triggered poll: did the timer fire on the current tick?
    ///
    /// With `rearm` given, a fired timer is immediately reset to that period,
    /// which makes externally driven periodic behavior self-sustaining.
    pub fn query(&mut self, id: TimerId, rearm: Option<u64>) -> bool {
        let now = self.now;
        let Some(timer) = self.get_mut(id) else {
            return false;
        };
        let fired = timer.signal[0];
        if fired {
            if let Some(period) = rearm {
                timer.reset(now, Some(period));
            }
        }
        fired
    }

    /// Edge-triggered poll: true only when the fired state just became true.
    pub fn tick(&mut self, id: TimerId, rearm: Option<u64>) -> bool {
        let now = self.now;
        let Some(timer) = self.get_mut(id) else {
            return false;
        };
        let rising = timer.signal[0] && !timer.signal[1];
        if rising {
            if let Some(period) = rearm {
                timer.reset(now, Some(period));
            }
        }
        rising
    }

    /// Fraction of the current period elapsed, 1.0 for a stopped timer.
    pub fn progress(&self, id: TimerId) -> f64 {
        self.get(id).map_or(1.0, |timer| timer.progress(self.now))
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.get(id).is_some_and(|timer| timer.running)
    }

    /// Bind a callback invoked once per fire. For one-shot timers the
    /// callback is cleared after it runs. A timer holds at most one
    /// callback; binding onto an occupied timer is ignored.
    pub fn bind<F: FnMut() + 'static>(&mut self, id: TimerId, callback: F) {
        let now = self.now;
        if let Some(timer) = self.get_mut(id) {
            if timer.callback.is_none() {
                timer.callback = Some(Box::new(callback));
                timer.reset(now, None);
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    #[test]
    fn test_periodic_timer_fires_each_period() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);

        clock.advance(50);
        assert!(!clock.query(id, None));

        clock.advance(100);
        assert!(clock.query(id, None));

        // Rearmed from 100; fires again at 200.
        clock.advance(150);
        assert!(!clock.query(id, None));
        clock.advance(200);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_one_shot_latches_until_reset() {
        let mut clock = Clock::new();
        let id = clock.timer(100, false);

        clock.advance(100);
        assert!(clock.query(id, None));
        assert!(!clock.is_running(id));

        // The fired flag stays latched across further advances.
        clock.advance(300);
        assert!(clock.query(id, None));
        clock.advance(400);
        assert!(clock.query(id, None));

        // Rearmed at t=400 with the original period.
        clock.reset(id, None);
        clock.advance(499);
        assert!(!clock.query(id, None));
        clock.advance(500);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_tick_reports_rising_edge_exactly_once() {
        let mut clock = Clock::new();
        let id = clock.timer(100, false);

        clock.advance(100);
        assert!(clock.tick(id, None));

        // Still latched true, but no longer a rising edge.
        clock.advance(150);
        assert!(clock.query(id, None));
        assert!(!clock.tick(id, None));
    }

    #[test]
    fn test_query_idempotent_between_advances() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);
        clock.advance(100);

        let first = clock.query(id, None);
        let second = clock.query(id, None);
        assert!(first);
        assert_eq!(first, second);
    }

    #[test]
    fn test_query_with_rearm_changes_period() {
        let mut clock = Clock::new();
        let id = clock.timer(100, false);

        clock.advance(100);
        assert!(clock.query(id, Some(50)));

        // Rearmed at t=100 with period 50.
        clock.advance(149);
        assert!(!clock.query(id, None));
        clock.advance(150);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_delay_postpones_next_fire() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);

        clock.delay(id, 50);
        clock.advance(100);
        assert!(!clock.query(id, None));
        clock.advance(150);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_force_fires_on_next_advance() {
        let mut clock = Clock::new();
        let id = clock.timer(10_000, false);

        clock.force(id);
        clock.advance(1);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_force_fires_despite_slowing_modifier() {
        let mut clock = Clock::new();
        let id = clock.timer(10_000, false);
        clock.set_modifier(id, 3.0);

        clock.force(id);
        clock.advance(1);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_modifier_scales_period() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);
        clock.set_modifier(id, 0.5);

        clock.advance(50);
        assert!(clock.query(id, None));
    }

    #[test]
    fn test_one_shot_callback_runs_once_and_clears() {
        let mut clock = Clock::new();
        let id = clock.timer(100, false);

        let count = Rc::new(StdCell::new(0u32));
        let counter = Rc::clone(&count);
        clock.bind(id, move || counter.set(counter.get() + 1));

        clock.advance(100);
        clock.advance(300);
        assert_eq!(count.get(), 1);

        // Callback cleared; rearming fires the timer but runs nothing.
        clock.reset(id, None);
        clock.advance(400);
        assert!(clock.query(id, None));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_periodic_callback_runs_every_fire() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);

        let count = Rc::new(StdCell::new(0u32));
        let counter = Rc::clone(&count);
        clock.bind(id, move || counter.set(counter.get() + 1));

        clock.advance(100);
        clock.advance(200);
        clock.advance(300);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_killed_timer_reports_false() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);
        clock.kill(id);

        clock.advance(200);
        assert!(!clock.query(id, None));
        assert!(!clock.tick(id, None));
        assert_eq!(clock.progress(id), 1.0);
    }

    #[test]
    fn test_progress_fraction() {
        let mut clock = Clock::new();
        let id = clock.timer(100, true);

        clock.advance(25);
        assert!((clock.progress(id) - 0.25).abs() < 1e-9);
    }
}
