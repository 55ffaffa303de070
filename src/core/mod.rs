//! Core game logic: pure rules and state, no IO.
//!
//! Everything in here is deterministic and driven entirely through the
//! [`Clock`](crate::clock::Clock); rendering, audio playback, and key
//! handling live elsewhere.

pub mod bag;
pub mod field;
pub mod figure;
pub mod session;

pub use bag::{PieceBag, SimpleRng};
pub use field::{DropOutcome, Field, MoveOutcome, SweepReport};
pub use figure::{orientations, Figure};
pub use session::{Rules, Session, Switches};
