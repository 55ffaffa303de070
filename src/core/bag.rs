//! Bag randomizer for piece selection.
//!
//! The bag holds the identities not yet dealt in the current cycle. Each
//! draw picks uniformly among the remaining identities and removes it; an
//! emptied bag refills to all 7. Every identity therefore appears exactly
//! once per 7-piece window, with no guarantee on cross-bag spacing (the last
//! piece of one bag may repeat as the first of the next).

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Linear congruential generator (Numerical Recipes constants).
///
/// Deterministic for a given seed, which keeps games replayable in tests.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would produce a degenerate sequence.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Random value in `[0, max)`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// The remaining-piece set for the current bag cycle.
#[derive(Debug, Clone)]
pub struct PieceBag {
    remaining: ArrayVec<PieceKind, 7>,
    rng: SimpleRng,
}

impl PieceBag {
    pub fn new(seed: u32) -> Self {
        Self {
            remaining: ArrayVec::from(PieceKind::ALL),
            rng: SimpleRng::new(seed),
        }
    }

    /// Deal the next piece identity.
    pub fn draw(&mut self) -> PieceKind {
        let index = self.rng.next_range(self.remaining.len() as u32) as usize;
        let kind = self.remaining.swap_remove(index);
        if self.remaining.is_empty() {
            self.remaining = ArrayVec::from(PieceKind::ALL);
        }
        kind
    }

    /// Identities not yet dealt in the current cycle.
    pub fn remaining(&self) -> &[PieceKind] {
        &self.remaining
    }

    /// Current RNG state, usable as a seed for a replay.
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}
