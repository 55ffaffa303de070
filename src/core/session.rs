//! Game session: orchestrates timers, input intents, field mutation,
//! scoring, the speed curve, and the pause/game-over lifecycle.
//!
//! The session polls its timers through the shared [`Clock`] once per frame.
//! Pausing simply skips the polls; the timers keep measuring wall time, so
//! resuming never replays a backlog of missed ticks.

use arrayvec::ArrayVec;

use crate::audio::Cue;
use crate::clock::{Clock, TimerId};
use crate::core::bag::PieceBag;
use crate::core::field::{DropOutcome, Field, MoveOutcome};
use crate::types::{
    GameAction, PieceKind, Theme, DROP_GATE_MS, FIELD_COLS, FIELD_ROWS, FLASH_TICK_MS, SCORE,
};

/// Gameplay tuning, loaded from configuration at startup.
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    pub cols: usize,
    pub rows: usize,
    /// Base automatic-drop period in milliseconds (level 1).
    pub period_ms: u64,
    pub starting_level: u32,
    /// Level cap; the speed curve flattens out here.
    pub max_level: u32,
    /// Asymptotic period scale at the level cap.
    pub killer_modifier: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            cols: FIELD_COLS,
            rows: FIELD_ROWS,
            period_ms: 600,
            starting_level: 1,
            max_level: 10,
            killer_modifier: 0.3,
        }
    }
}

/// On-screen toggles, preserved across session resets.
#[derive(Debug, Clone, Copy)]
pub struct Switches {
    pub shadow: bool,
    pub music: bool,
    pub sound: bool,
    pub theme: Theme,
}

impl Default for Switches {
    fn default() -> Self {
        Self {
            shadow: true,
            music: false,
            sound: true,
            theme: Theme::Dark,
        }
    }
}

/// The running game: field, piece queue, timers, counters, lifecycle flags.
pub struct Session {
    rules: Rules,
    field: Field,
    bag: PieceBag,
    next_figure: PieceKind,
    logic_timer: TimerId,
    flash_timer: TimerId,
    /// One-shot gate spacing player-driven soft drops.
    drop_gate: TimerId,
    alive: bool,
    paused: bool,
    game_over: bool,
    paused_by_focus: bool,
    score: u32,
    lines: u32,
    level: u32,
    switches: Switches,
    cues: ArrayVec<Cue, 8>,
}

impl Session {
    pub fn new(clock: &mut Clock, rules: Rules, seed: u32) -> Self {
        let mut bag = PieceBag::new(seed);
        let first = bag.draw();
        let next_figure = bag.draw();

        let logic_timer = clock.timer(rules.period_ms, true);
        let flash_timer = clock.timer(FLASH_TICK_MS, true);
        let drop_gate = clock.timer(DROP_GATE_MS, false);

        let mut session = Self {
            rules,
            field: Field::new(rules.cols, rules.rows, first),
            bag,
            next_figure,
            logic_timer,
            flash_timer,
            drop_gate,
            alive: true,
            paused: false,
            game_over: false,
            paused_by_focus: false,
            score: 0,
            lines: 0,
            level: rules.starting_level.min(rules.max_level),
            switches: Switches::default(),
            cues: ArrayVec::new(),
        };
        clock.set_modifier(logic_timer, session.speed_modifier());
        session
    }

    /// Re-initialize field, queue, counters, and timers. Switches and the
    /// paused flag survive; the bag reseeds from its current state so two
    /// resets never replay the same sequence.
    pub fn reset(&mut self, clock: &mut Clock) {
        self.bag = PieceBag::new(self.bag.seed());
        let first = self.bag.draw();
        self.field = Field::new(self.rules.cols, self.rules.rows, first);
        self.next_figure = self.bag.draw();

        self.score = 0;
        self.lines = 0;
        self.level = self.rules.starting_level.min(self.rules.max_level);
        self.game_over = false;

        clock.set_modifier(self.logic_timer, self.speed_modifier());
        clock.reset(self.logic_timer, Some(self.rules.period_ms));
        clock.reset(self.flash_timer, None);
        clock.reset(self.drop_gate, None);
    }

    /// Period scale for the current level: `(killer^(1/max))^(level-1)`.
    ///
    /// Shrinks geometrically per level and approaches `killer_modifier`
    /// at the level cap.
    fn speed_modifier(&self) -> f64 {
        self.rules
            .killer_modifier
            .powf(1.0 / self.rules.max_level as f64)
            .powi(self.level as i32 - 1)
    }

    /// Push both drop timers forward by half the base period, giving the
    /// player a grace window after a lock before autodrop resumes.
    fn grace(&mut self, clock: &mut Clock) {
        let amount = self.rules.period_ms / 2;
        clock.delay(self.logic_timer, amount);
        clock.delay(self.drop_gate, amount);
    }

    fn cue(&mut self, cue: Cue) {
        let _ = self.cues.try_push(cue);
    }

    /// Queue bookkeeping shared by every lock path.
    fn after_lock(&mut self, clock: &mut Clock) {
        self.next_figure = self.bag.draw();
        self.grace(clock);
        self.cue(Cue::HighBlip);
    }

    /// One gravity step, automatic or player-driven.
    fn gravity_step(&mut self, clock: &mut Clock) {
        self.cue(Cue::LowBlip);
        if self.field.drop_figure(self.next_figure) == DropOutcome::Locked {
            self.after_lock(clock);
        }
    }

    /// Apply a player intent. Gameplay intents are ignored while paused or
    /// after game over; lifecycle and switch intents always work.
    pub fn apply(&mut self, clock: &mut Clock, action: GameAction) {
        match action {
            GameAction::Quit => {
                self.alive = false;
                return;
            }
            GameAction::Pause => {
                // A dead game cannot be paused; Reset is the only way on.
                if !self.game_over {
                    self.paused = !self.paused;
                    self.paused_by_focus = false;
                }
                return;
            }
            GameAction::Reset => {
                if self.game_over || self.paused {
                    self.reset(clock);
                }
                return;
            }
            GameAction::ToggleShadow => {
                self.switches.shadow = !self.switches.shadow;
                return;
            }
            GameAction::ToggleMusic => {
                self.switches.music = !self.switches.music;
                return;
            }
            GameAction::ToggleSound => {
                self.switches.sound = !self.switches.sound;
                return;
            }
            GameAction::ToggleTheme => {
                self.switches.theme = self.switches.theme.flip();
                return;
            }
            _ => {}
        }

        if self.paused || self.game_over {
            return;
        }

        match action {
            GameAction::MoveLeft => {
                if self.field.move_figure((-1, 0)) == MoveOutcome::Moved {
                    self.cue(Cue::Blip);
                }
            }
            GameAction::MoveRight => {
                if self.field.move_figure((1, 0)) == MoveOutcome::Moved {
                    self.cue(Cue::Blip);
                }
            }
            GameAction::RotateCw => {
                if self.field.rotate_figure(-1) == MoveOutcome::Moved {
                    self.cue(Cue::Blip);
                }
            }
            GameAction::RotateCcw => {
                if self.field.rotate_figure(1) == MoveOutcome::Moved {
                    self.cue(Cue::Blip);
                }
            }
            GameAction::SoftDrop => {
                // The one-shot gate spaces repeated soft drops; resetting the
                // logic timer keeps autodrop from stacking onto them.
                if clock.query(self.drop_gate, None) {
                    clock.reset(self.drop_gate, None);
                    clock.reset(self.logic_timer, None);
                    self.gravity_step(clock);
                }
            }
            GameAction::HardDrop => {
                self.field.place_figure(self.next_figure);
                self.after_lock(clock);
            }
            _ => {}
        }
    }

    /// Per-frame logic tick. Call after `Clock::advance`.
    pub fn frame(&mut self, clock: &mut Clock) {
        if self.paused || self.game_over {
            return;
        }

        if clock.query(self.logic_timer, None) {
            self.gravity_step(clock);
        }

        if clock.query(self.flash_timer, None) {
            self.field.promote_flash();
        }

        let report = self.field.sweep_rows();
        if report.newly_filled {
            self.cue(Cue::Clear);
        }
        if report.cleared > 0 {
            // A single lock fills at most 4 rows.
            let cleared = report.cleared.min(4);
            self.lines += cleared as u32;
            self.level = (self.lines / 10 + self.rules.starting_level).min(self.rules.max_level);
            self.score += SCORE[cleared] * self.level;
            clock.set_modifier(self.logic_timer, self.speed_modifier());
        }

        if self.field.top_row_occupied() {
            self.trigger_game_over();
        }
    }

    fn trigger_game_over(&mut self) {
        if !self.game_over {
            self.game_over = true;
            self.cue(Cue::Fail);
        }
    }

    /// Focus loss pauses; focus regain only undoes a focus-induced pause.
    pub fn focus_changed(&mut self, focused: bool) {
        if !focused {
            if !self.paused {
                self.paused = true;
                self.paused_by_focus = true;
            }
        } else if self.paused_by_focus {
            self.paused = false;
            self.paused_by_focus = false;
        }
    }

    /// Drain the cues emitted since the last call.
    pub fn take_cues(&mut self) -> ArrayVec<Cue, 8> {
        std::mem::take(&mut self.cues)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn next_figure(&self) -> PieceKind {
        self.next_figure
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn switches(&self) -> Switches {
        self.switches
    }
}
