//! The playfield: grid storage, collision, figure mutation, and the
//! row-clear flash machine.
//!
//! The grid is a flat row-major `Vec<Cell>`; dimensions are fixed at
//! construction. The field owns the falling figure. Every mutating operation
//! validates the tentative state with `collide_figure` and reverts before
//! committing, so the grid is never indexed out of bounds and the figure is
//! never left overlapping anything.
//!
//! Mutations report outcome enums instead of playing sounds themselves; the
//! session maps outcomes to audio cues.

use crate::core::figure::Figure;
use crate::types::{Cell, Collision, PieceKind};

/// Outcome of a horizontal move or a rotation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked,
}

/// Outcome of a gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    /// The figure could not descend and was merged into the grid.
    Locked,
}

/// What one logic-tick row sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Rows deleted this tick (fully flashed rows).
    pub cleared: usize,
    /// A row transitioned into the fully-filled state this tick; the
    /// clear-imminent cue fires before the visual flash completes.
    pub newly_filled: bool,
}

/// The board grid plus the current falling figure.
#[derive(Debug, Clone)]
pub struct Field {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    figure: Figure,
}

impl Field {
    /// Create an empty `cols x rows` field with `first` as the falling figure.
    pub fn new(cols: usize, rows: usize, first: PieceKind) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
            figure: Figure::new(first),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Replace the falling figure with a freshly spawned `kind`.
    pub fn reset_figure(&mut self, kind: PieceKind) {
        self.figure.reset(kind);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.cols as i32 || y < 0 || y >= self.rows as i32 {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.cols..(y + 1) * self.cols]
    }

    fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        let cols = self.cols;
        &mut self.cells[y * cols..(y + 1) * cols]
    }

    /// All grid cells as `(x, y, cell)`, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| ((i % cols) as i32, (i / cols) as i32, cell))
    }

    /// Probe the figure against the grid at a vertical offset of `dy`.
    ///
    /// Wall overflow is only reported when `sides` is true; vertical-only
    /// probes (gravity, `height`) treat out-of-range columns as `Blocked`.
    pub fn collide_figure(&self, sides: bool, dy: i32) -> Collision {
        for (x, y) in self.figure.cells() {
            if sides && x < 0 {
                return Collision::LeftWall;
            }
            if sides && x >= self.cols as i32 {
                return Collision::RightWall;
            }
            let py = y + dy;
            if py < 0 || py >= self.rows as i32 || x < 0 || x >= self.cols as i32 {
                return Collision::Blocked;
            }
            if self.get(x, py).is_some_and(|cell| cell.is_solid()) {
                return Collision::Blocked;
            }
        }
        Collision::None
    }

    /// Tentatively translate the figure; revert on any collision.
    pub fn move_figure(&mut self, vector: (i32, i32)) -> MoveOutcome {
        self.figure.translate(vector.0, vector.1);
        if self.collide_figure(true, 0) != Collision::None {
            self.figure.translate(-vector.0, -vector.1);
            MoveOutcome::Blocked
        } else {
            MoveOutcome::Moved
        }
    }

    /// Rotate by `direction` steps with a single corrective wall kick.
    ///
    /// A figure on the very top row is nudged down one row first so spawn
    /// rotation cannot collide with the ceiling. A squarely blocked rotation
    /// reverts; a wall overflow tries one kick (+2 off the left wall for I,
    /// else +1; -1 off the right wall) and reverts if the kick fails.
    pub fn rotate_figure(&mut self, direction: i32) -> MoveOutcome {
        if self.figure.pos().1 == 0 {
            self.figure.set_row(1);
        }

        let prev = self.figure.orient();
        self.figure.rotate(direction);
        let mut reverted = false;

        if self.collide_figure(true, 0) == Collision::Blocked {
            self.figure.set_orient(prev);
            reverted = true;
        }
        if self.collide_figure(true, 0) == Collision::LeftWall {
            let kick = if self.figure.kind() == PieceKind::I { 2 } else { 1 };
            if self.move_figure((kick, 0)) == MoveOutcome::Blocked {
                self.figure.set_orient(prev);
                reverted = true;
            }
        }
        if self.collide_figure(true, 0) == Collision::RightWall {
            if self.move_figure((-1, 0)) == MoveOutcome::Blocked {
                self.figure.set_orient(prev);
                reverted = true;
            }
        }

        if reverted {
            MoveOutcome::Blocked
        } else {
            MoveOutcome::Moved
        }
    }

    /// One gravity step. On vertical collision the step is undone and the
    /// figure locks in place, respawning as `next`.
    pub fn drop_figure(&mut self, next: PieceKind) -> DropOutcome {
        self.figure.translate(0, 1);
        if self.collide_figure(false, 0) != Collision::None {
            self.figure.translate(0, -1);
            self.merge_figure(next);
            DropOutcome::Locked
        } else {
            DropOutcome::Dropped
        }
    }

    /// Hard drop: translate by the full fall distance, then lock.
    pub fn place_figure(&mut self, next: PieceKind) {
        let distance = self.height(0);
        self.figure.translate(0, distance);
        self.merge_figure(next);
    }

    /// Stamp the figure into the grid and respawn it as `next`.
    ///
    /// The spawn re-applies the same side-wall correction as rotation, since
    /// a fresh figure may overlap a wall on narrow boards.
    pub fn merge_figure(&mut self, next: PieceKind) {
        let kind = self.figure.kind();
        for (x, y) in self.figure.cells() {
            self.set(x, y, Cell::Block(kind));
        }
        self.figure.reset(next);

        if self.collide_figure(true, 0) == Collision::LeftWall {
            let kick = if self.figure.kind() == PieceKind::I { 2 } else { 1 };
            let _ = self.move_figure((kick, 0));
        }
        if self.collide_figure(true, 0) == Collision::RightWall {
            let _ = self.move_figure((-1, 0));
        }
    }

    /// Number of rows the figure can fall unobstructed, probing from `start`.
    pub fn height(&self, start: i32) -> i32 {
        let mut distance = start;
        while self.collide_figure(false, distance) == Collision::None {
            distance += 1;
        }
        distance - 1
    }

    /// Remove `row` and insert an empty row at the top; rows above shift down.
    pub fn del_row(&mut self, row: usize) {
        if row >= self.rows {
            return;
        }
        let cols = self.cols;
        for y in (1..=row).rev() {
            let src = (y - 1) * cols;
            let dst = y * cols;
            self.cells.copy_within(src..src + cols, dst);
        }
        self.row_mut(0).fill(Cell::Empty);
    }

    /// Logic-tick row pass: delete fully flashed rows, then mark rows that
    /// just became full.
    pub fn sweep_rows(&mut self) -> SweepReport {
        let mut report = SweepReport::default();
        for y in 0..self.rows {
            if self.row(y).iter().all(|&cell| cell == Cell::Flash) {
                self.del_row(y);
                report.cleared += 1;
            } else if !self
                .row(y)
                .iter()
                .any(|&cell| cell == Cell::Empty || cell == Cell::Marked)
            {
                self.row_mut(y).fill(Cell::Marked);
                report.newly_filled = true;
            }
        }
        report
    }

    /// Flash-tick pass: promote the first still-marked cell of each row.
    ///
    /// One cell per row per tick, so a full-width row takes `cols` flash
    /// ticks to finish blinking. This matches the intended flash duration;
    /// promoting a whole row at once would shorten it.
    pub fn promote_flash(&mut self) {
        for y in 0..self.rows {
            if let Some(cell) = self
                .row_mut(y)
                .iter_mut()
                .find(|cell| **cell == Cell::Marked)
            {
                *cell = Cell::Flash;
            }
        }
    }

    /// Game-over probe: any locked cell in the top row.
    pub fn top_row_occupied(&self) -> bool {
        self.row(0).iter().any(|cell| cell.is_solid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FIELD_COLS, FIELD_ROWS};

    fn field_with(kind: PieceKind) -> Field {
        Field::new(FIELD_COLS, FIELD_ROWS, kind)
    }

    #[test]
    fn test_collide_clear_on_empty_board() {
        let field = field_with(PieceKind::T);
        assert_eq!(field.collide_figure(true, 0), Collision::None);
    }

    #[test]
    fn test_collide_reports_walls_distinctly() {
        let mut field = field_with(PieceKind::O);
        // O occupies x..x+1; push it past the left wall.
        field.figure.translate(-6, 0);
        assert_eq!(field.collide_figure(true, 0), Collision::LeftWall);

        field.figure.translate(20, 0);
        assert_eq!(field.collide_figure(true, 0), Collision::RightWall);
    }

    #[test]
    fn test_collide_floor_is_blocked() {
        let mut field = field_with(PieceKind::O);
        field.figure.translate(0, FIELD_ROWS as i32 - 1);
        assert_eq!(field.collide_figure(false, 0), Collision::Blocked);
    }

    #[test]
    fn test_vertical_probe_ignores_side_overflow() {
        let mut field = field_with(PieceKind::O);
        field.figure.translate(-6, 0);
        // Without side checks the off-board column still reads Blocked,
        // never a wall code.
        assert_eq!(field.collide_figure(false, 0), Collision::Blocked);
    }

    #[test]
    fn test_collide_with_locked_cell() {
        let mut field = field_with(PieceKind::O);
        field.set(5, 1, Cell::Block(PieceKind::I));
        assert_eq!(field.collide_figure(true, 0), Collision::Blocked);
    }

    #[test]
    fn test_move_commits_or_is_a_no_op() {
        let mut field = field_with(PieceKind::O);
        let before = field.figure.pos();

        assert_eq!(field.move_figure((1, 0)), MoveOutcome::Moved);
        assert_eq!(field.figure.pos(), (before.0 + 1, before.1));

        // Walk into the right wall: position must be unchanged after a block.
        while field.move_figure((1, 0)) == MoveOutcome::Moved {}
        let at_wall = field.figure.pos();
        assert_eq!(field.move_figure((1, 0)), MoveOutcome::Blocked);
        assert_eq!(field.figure.pos(), at_wall);
    }

    #[test]
    fn test_rotate_never_leaves_collision() {
        let mut field = field_with(PieceKind::I);
        for direction in [1, -1, 1, 1] {
            field.rotate_figure(direction);
            assert_eq!(field.collide_figure(true, 0), Collision::None);
        }
    }

    #[test]
    fn test_rotate_nudges_off_top_row() {
        let mut field = field_with(PieceKind::T);
        assert_eq!(field.figure.pos().1, 0);
        field.rotate_figure(1);
        assert!(field.figure.pos().1 >= 1);
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut field = field_with(PieceKind::T);
        field.rotate_figure(1); // stem left, two columns wide
        while field.move_figure((1, 0)) == MoveOutcome::Moved {}

        // The next state is three columns wide and would overflow the right
        // wall; the one-cell kick pulls the figure in and the rotation holds.
        assert_eq!(field.rotate_figure(1), MoveOutcome::Moved);
        assert_eq!(field.collide_figure(true, 0), Collision::None);
        assert_eq!(field.figure.orient(), 2);
    }

    #[test]
    fn test_i_kicks_two_cells_off_left_wall() {
        let mut field = field_with(PieceKind::I);
        field.rotate_figure(1); // vertical
        while field.move_figure((-1, 0)) == MoveOutcome::Moved {}

        assert_eq!(field.rotate_figure(1), MoveOutcome::Moved);
        assert_eq!(field.collide_figure(true, 0), Collision::None);
        assert_eq!(field.figure.orient(), 0);
    }

    #[test]
    fn test_i_rotation_fails_flush_against_right_wall() {
        // The right-wall kick is always one cell, so a vertical I flush
        // against the right wall cannot unfold and the rotation reverts.
        let mut field = field_with(PieceKind::I);
        field.rotate_figure(1);
        while field.move_figure((1, 0)) == MoveOutcome::Moved {}

        assert_eq!(field.rotate_figure(1), MoveOutcome::Blocked);
        assert_eq!(field.figure.orient(), 1);
        assert_eq!(field.collide_figure(true, 0), Collision::None);
    }

    #[test]
    fn test_rotate_reverts_when_squarely_blocked() {
        let mut field = field_with(PieceKind::I);
        field.figure.translate(0, 5);
        // Box the horizontal I in so the vertical state overlaps a block.
        for y in 1..5 {
            field.set(6, y, Cell::Block(PieceKind::O));
            field.set(6, y + 5, Cell::Block(PieceKind::O));
        }
        let orient = field.figure.orient();
        assert_eq!(field.rotate_figure(1), MoveOutcome::Blocked);
        assert_eq!(field.figure.orient(), orient);
        assert_eq!(field.collide_figure(true, 0), Collision::None);
    }

    #[test]
    fn test_drop_descends_then_locks() {
        let mut field = field_with(PieceKind::O);
        let mut steps = 0;
        while field.drop_figure(PieceKind::T) == DropOutcome::Dropped {
            steps += 1;
        }
        // O spawns on rows 0-1 of a 20-row board: 18 clear steps.
        assert_eq!(steps, FIELD_ROWS as i32 - 2);
        // Bottom two rows now hold the locked O cells.
        assert_eq!(field.get(5, 18), Some(Cell::Block(PieceKind::O)));
        assert_eq!(field.get(6, 19), Some(Cell::Block(PieceKind::O)));
        // And the figure respawned as the supplied next identity.
        assert_eq!(field.figure.kind(), PieceKind::T);
    }

    #[test]
    fn test_place_i_lands_on_bottom_row() {
        let mut field = field_with(PieceKind::I);
        field.place_figure(PieceKind::O);
        for x in 5..9 {
            assert_eq!(field.get(x, 19), Some(Cell::Block(PieceKind::I)));
        }
        assert_eq!(field.figure.kind(), PieceKind::O);
    }

    #[test]
    fn test_height_counts_clear_rows() {
        let mut field = field_with(PieceKind::I);
        assert_eq!(field.height(0), 19);

        for x in 0..FIELD_COLS as i32 {
            field.set(x, 19, Cell::Block(PieceKind::J));
        }
        assert_eq!(field.height(0), 18);
    }

    #[test]
    fn test_del_row_shifts_down_and_keeps_dimensions() {
        let mut field = field_with(PieceKind::T);
        field.set(3, 10, Cell::Block(PieceKind::S));
        field.set(4, 12, Cell::Block(PieceKind::Z));

        field.del_row(12);

        // Row 10 content moved to row 11; row 12 is gone.
        assert_eq!(field.get(3, 11), Some(Cell::Block(PieceKind::S)));
        assert_eq!(field.get(4, 12), Some(Cell::Empty));
        assert_eq!(field.iter_cells().count(), FIELD_COLS * FIELD_ROWS);
    }

    #[test]
    fn test_sweep_marks_full_row() {
        let mut field = field_with(PieceKind::T);
        for x in 0..FIELD_COLS as i32 {
            field.set(x, 19, Cell::Block(PieceKind::I));
        }

        let report = field.sweep_rows();
        assert!(report.newly_filled);
        assert_eq!(report.cleared, 0);
        for x in 0..FIELD_COLS as i32 {
            assert_eq!(field.get(x, 19), Some(Cell::Marked));
        }
    }

    #[test]
    fn test_flash_promotes_one_cell_per_row_per_tick() {
        let mut field = field_with(PieceKind::T);
        for x in 0..FIELD_COLS as i32 {
            field.set(x, 19, Cell::Marked);
        }

        field.promote_flash();
        let flashed = field
            .iter_cells()
            .filter(|&(_, y, cell)| y == 19 && cell == Cell::Flash)
            .count();
        assert_eq!(flashed, 1);

        // A full-width row needs as many ticks as it has columns.
        for _ in 1..FIELD_COLS {
            field.promote_flash();
        }
        let report = field.sweep_rows();
        assert_eq!(report.cleared, 1);
        for x in 0..FIELD_COLS as i32 {
            assert_eq!(field.get(x, 19), Some(Cell::Empty));
        }
    }

    #[test]
    fn test_sweep_skips_partially_flashed_rows() {
        let mut field = field_with(PieceKind::T);
        for x in 0..FIELD_COLS as i32 {
            field.set(x, 19, Cell::Marked);
        }
        field.promote_flash();

        let report = field.sweep_rows();
        assert_eq!(report.cleared, 0);
        assert!(!report.newly_filled);
    }

    #[test]
    fn test_top_row_occupied() {
        let mut field = field_with(PieceKind::T);
        assert!(!field.top_row_occupied());
        field.set(0, 0, Cell::Block(PieceKind::L));
        assert!(field.top_row_occupied());
    }

    #[test]
    fn test_merge_corrects_spawn_against_walls() {
        // On a narrow board the spawn column overlaps the right wall; the
        // respawned figure must be kicked back in.
        let mut field = Field::new(6, FIELD_ROWS, PieceKind::O);
        field.figure.translate(-3, 0);
        field.merge_figure(PieceKind::O);
        assert_eq!(field.figure.pos(), (4, 0));
        assert_eq!(field.collide_figure(true, 0), Collision::None);
    }
}
