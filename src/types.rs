//! Shared pure types and constants.
//!
//! Everything here is plain data with no dependencies on timing, IO, or
//! rendering. Board coordinates are (x, y) with x growing rightward and
//! y growing downward; (0, 0) is the top-left cell.

/// Default playfield dimensions (columns x rows).
pub const FIELD_COLS: usize = 10;
pub const FIELD_ROWS: usize = 20;

/// Frame rate the runner targets.
pub const FPS: u64 = 60;

/// Points awarded for clearing 1..4 rows at once, multiplied by the level.
pub const SCORE: [u32; 5] = [0, 4, 10, 30, 120];

/// Cadence of the flash-promotion timer (ms).
pub const FLASH_TICK_MS: u64 = 30;

/// Minimum spacing between player-driven soft drops (ms).
pub const DROP_GATE_MS: u64 = 30;

/// Where a freshly dealt figure appears.
pub const SPAWN_POS: (i32, i32) = (5, 0);

/// The seven tetromino identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// One cell of the playfield.
///
/// `Marked` and `Flash` are the two stages of the line-clear blink: a row
/// that fills up is first marked whole, then its cells promote one per
/// flash tick, and a fully promoted row is deleted on the next logic tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Block(PieceKind),
    Marked,
    Flash,
}

impl Cell {
    /// True for anything a falling figure cannot pass through.
    pub fn is_solid(&self) -> bool {
        !matches!(self, Cell::Empty)
    }
}

/// Result of probing the current figure against the grid.
///
/// The wall variants are distinct so rotation can pick a corrective kick
/// direction; floor/ceiling/stack overlap reports `Blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    Blocked,
    LeftWall,
    RightWall,
}

/// Player intents, produced by the input layer once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Pause,
    Reset,
    ToggleShadow,
    ToggleMusic,
    ToggleSound,
    ToggleTheme,
    Quit,
}

impl GameAction {
    pub const ALL: [GameAction; 13] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Pause,
        GameAction::Reset,
        GameAction::ToggleShadow,
        GameAction::ToggleMusic,
        GameAction::ToggleSound,
        GameAction::ToggleTheme,
        GameAction::Quit,
    ];

    /// Action name as it appears in the key-binding table.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "move left",
            GameAction::MoveRight => "move right",
            GameAction::SoftDrop => "move down",
            GameAction::HardDrop => "place",
            GameAction::RotateCw => "rotate cw",
            GameAction::RotateCcw => "rotate ccw",
            GameAction::Pause => "pause",
            GameAction::Reset => "reset",
            GameAction::ToggleShadow => "shadow",
            GameAction::ToggleMusic => "music",
            GameAction::ToggleSound => "sound",
            GameAction::ToggleTheme => "theme",
            GameAction::Quit => "exit",
        }
    }
}

/// UI color theme, flipped by the theme switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn flip(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}
