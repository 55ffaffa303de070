//! rustfall: a falling-block puzzle game.
//!
//! The crate splits into a deterministic, IO-free core (`clock`, `core`)
//! and thin frontend layers (`input`, `term`, `audio`) wired together by
//! the binary. Everything timing-related flows through one [`clock::Clock`]
//! advanced once per frame, which keeps the whole game replayable from a
//! seed and a key script.

pub mod audio;
pub mod clock;
pub mod config;
pub mod core;
pub mod input;
pub mod term;
pub mod types;
