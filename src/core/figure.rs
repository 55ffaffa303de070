//! Tetromino shape tables and the falling figure.
//!
//! Each piece identity has a small list of orientation states, every state an
//! ordered list of 4 cell offsets from the figure position. State counts vary
//! (O never rotates, I/S/Z flip between two states, T/L/J cycle four); the
//! rotation index wraps modulo the state count in either direction. This is
//! deliberately not SRS: the field applies a single fixed-magnitude wall kick
//! instead of a kick table.

use crate::types::{PieceKind, SPAWN_POS};

/// Offset of one cell relative to the figure position.
pub type CellOffset = (i32, i32);

/// One orientation state: 4 cell offsets.
pub type Orientation = [CellOffset; 4];

const I_STATES: [Orientation; 2] = [
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const O_STATES: [Orientation; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const T_STATES: [Orientation; 4] = [
    [(0, 0), (1, 0), (2, 0), (1, 1)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (0, 1), (1, 1), (0, 2)],
];

const S_STATES: [Orientation; 2] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

const Z_STATES: [Orientation; 2] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

const J_STATES: [Orientation; 4] = [
    [(0, 0), (1, 0), (2, 0), (2, 1)],
    [(0, 0), (1, 0), (0, 1), (0, 2)],
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_STATES: [Orientation; 4] = [
    [(0, 0), (1, 0), (2, 0), (0, 1)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (0, 1), (0, 2), (1, 2)],
];

/// Orientation states for a piece identity.
pub fn orientations(kind: PieceKind) -> &'static [Orientation] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// The falling tetromino: identity, orientation index, board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    kind: PieceKind,
    orient: usize,
    pos: (i32, i32),
}

impl Figure {
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            orient: 0,
            pos: SPAWN_POS,
        }
    }

    /// Re-deal this figure as `kind` at the spawn position.
    pub fn reset(&mut self, kind: PieceKind) {
        self.kind = kind;
        self.orient = 0;
        self.pos = SPAWN_POS;
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn orient(&self) -> usize {
        self.orient
    }

    pub fn pos(&self) -> (i32, i32) {
        self.pos
    }

    pub fn state_count(&self) -> usize {
        orientations(self.kind).len()
    }

    /// The 4 occupied board cells. Pure: recomputed from identity,
    /// orientation and position on every call.
    pub fn cells(&self) -> [(i32, i32); 4] {
        let state = orientations(self.kind)[self.orient];
        let (px, py) = self.pos;
        [
            (px + state[0].0, py + state[0].1),
            (px + state[1].0, py + state[1].1),
            (px + state[2].0, py + state[2].1),
            (px + state[3].0, py + state[3].1),
        ]
    }

    pub(crate) fn translate(&mut self, dx: i32, dy: i32) {
        self.pos.0 += dx;
        self.pos.1 += dy;
    }

    pub(crate) fn set_row(&mut self, y: i32) {
        self.pos.1 = y;
    }

    /// Advance the orientation index by `direction`, wrapping both ways.
    pub(crate) fn rotate(&mut self, direction: i32) {
        let count = self.state_count() as i32;
        self.orient = (self.orient as i32 + direction).rem_euclid(count) as usize;
    }

    pub(crate) fn set_orient(&mut self, orient: usize) {
        self.orient = orient;
    }
}
