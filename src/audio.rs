//! Named audio cues and the mixer boundary.
//!
//! The core never plays sound. Mutating operations return outcomes, the
//! session maps outcomes to `Cue`s, and the frontend drains the cue buffer
//! into a `Mixer` each frame. The mixer is built once at startup and passed
//! where needed; there is no global sound registry.

/// Named audio cues, matching the sound table of the original game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Horizontal move or rotation.
    Blip,
    /// Gravity step.
    LowBlip,
    /// Figure locked into the grid.
    HighBlip,
    /// A row just became fully filled (fires before the flash completes).
    Clear,
    /// Game over.
    Fail,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Blip => "blip",
            Cue::LowBlip => "low blip",
            Cue::HighBlip => "high blip",
            Cue::Clear => "clear",
            Cue::Fail => "fail",
        }
    }
}

/// Playback backend. The crate ships terminal-friendly stubs; a real
/// frontend would wrap an audio device here.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue, volume: f32);

    /// Start looping the background theme.
    fn start_theme(&mut self, _volume: f32) {}

    /// Stop the background theme.
    fn stop_theme(&mut self) {}
}

/// Discards everything. Default backend for tests and headless runs.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&mut self, _cue: Cue, _volume: f32) {}
}

/// Rings the terminal bell for audible cues. The background theme is a
/// no-op; a terminal has nothing to loop.
#[derive(Debug, Default)]
pub struct BellPlayer;

impl CuePlayer for BellPlayer {
    fn play(&mut self, cue: Cue, volume: f32) {
        // Only the loud cues ring; a bell per move would be unbearable.
        if volume > 0.0 && matches!(cue, Cue::Clear | Cue::Fail) {
            use std::io::Write;
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    }
}

/// Routes cues to a backend, honoring the global sound switch and volume.
pub struct Mixer {
    player: Box<dyn CuePlayer>,
    enabled: bool,
    volume: f32,
    theme_on: bool,
}

impl Mixer {
    pub fn new(player: Box<dyn CuePlayer>, volume: f32) -> Self {
        Self {
            player,
            enabled: true,
            volume,
            theme_on: false,
        }
    }

    /// Global sound switch; a disabled mixer drops cues silently.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn play(&mut self, cue: Cue) {
        if self.enabled {
            self.player.play(cue, self.volume);
        }
    }

    /// Idempotent theme control; the frontend calls this every frame with
    /// the desired state.
    pub fn set_theme(&mut self, on: bool) {
        if on == self.theme_on {
            return;
        }
        self.theme_on = on;
        if on {
            self.player.start_theme(self.volume);
        } else {
            self.player.stop_theme();
        }
    }
}
