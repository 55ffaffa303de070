//! Terminal game runner.
//!
//! Frame loop: poll terminal events with a timeout until the next frame
//! boundary, then advance the clock once, feed repeats and the session, and
//! flush a diffed frame. All timing flows through the one `Clock`.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use rustfall::audio::{BellPlayer, Mixer};
use rustfall::clock::Clock;
use rustfall::config::Config;
use rustfall::core::Session;
use rustfall::input::InputHandler;
use rustfall::term::{GameView, TerminalRenderer, Viewport};
use rustfall::types::{GameAction, FPS};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("rustfall.json"));
    let config = Config::load(&path)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: &Config) -> Result<()> {
    let mut clock = Clock::new();
    let mut session = Session::new(&mut clock, config.rules(), wall_seed());
    let mut input = InputHandler::new(config.bindings()?);
    let mut mixer = Mixer::new(Box::new(BellPlayer), config.volume);
    let view = GameView::new(
        config.key_label(GameAction::Pause),
        config.key_label(GameAction::Reset),
    );

    let frame = Duration::from_millis(1_000 / FPS);
    let started = Instant::now();
    let mut last_frame = Instant::now();

    loop {
        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    // Terminal auto-repeat counts as a refresh, not an edge.
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if let Some(action) = input.key_press(&mut clock, key.code) {
                            session.apply(&mut clock, action);
                        }
                    }
                    KeyEventKind::Release => {
                        input.key_release(&mut clock, key.code);
                    }
                },
                Event::FocusLost => {
                    input.reset(&mut clock);
                    session.focus_changed(false);
                }
                Event::FocusGained => {
                    session.focus_changed(true);
                }
                Event::Resize(_, _) => {
                    term.invalidate();
                }
                _ => {}
            }
        }

        if last_frame.elapsed() < frame {
            continue;
        }
        last_frame = Instant::now();

        clock.advance(started.elapsed().as_millis() as u64);
        for action in input.poll(&mut clock) {
            session.apply(&mut clock, action);
        }
        session.frame(&mut clock);

        let switches = session.switches();
        mixer.set_enabled(switches.sound);
        for cue in session.take_cues() {
            mixer.play(cue);
        }
        mixer.set_theme(switches.music && !session.game_over());

        if !session.alive() {
            return Ok(());
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let mut fb = view.render(&session, Viewport::new(w, h));
        term.draw_swap(&mut fb)?;
    }
}

/// Seed the bag from wall time; only the low bits need to vary.
fn wall_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
