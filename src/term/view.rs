//! Maps a [`Session`] into a terminal framebuffer.
//!
//! Pure: no IO, unit-testable. Layout is a centered board frame with a side
//! panel for score, next-piece preview, and switch states, plus status
//! overlays for pause and game over.

use crate::core::figure::orientations;
use crate::core::Session;
use crate::term::fb::{Align, Emphasis, FrameBuffer, Glyph, GlyphStyle, Rgb};
use crate::types::{Cell, PieceKind, Theme};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// UI color roles resolved per theme.
struct Palette {
    screen_bg: Rgb,
    board_bg: Rgb,
    border: Rgb,
    grid_dot: Rgb,
    text: Rgb,
    value: Rgb,
    ghost: Rgb,
    marked: Rgb,
    flash: Rgb,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            screen_bg: Rgb::new(0, 0, 0),
            board_bg: Rgb::new(30, 30, 40),
            border: Rgb::new(200, 200, 200),
            grid_dot: Rgb::new(90, 90, 100),
            text: Rgb::new(220, 220, 220),
            value: Rgb::new(200, 200, 200),
            ghost: Rgb::new(140, 140, 140),
            marked: Rgb::new(235, 235, 235),
            flash: Rgb::new(255, 255, 160),
        },
        Theme::Light => Palette {
            screen_bg: Rgb::new(235, 235, 230),
            board_bg: Rgb::new(215, 215, 210),
            border: Rgb::new(60, 60, 60),
            grid_dot: Rgb::new(180, 180, 175),
            text: Rgb::new(40, 40, 40),
            value: Rgb::new(70, 70, 70),
            ghost: Rgb::new(150, 150, 150),
            marked: Rgb::new(90, 90, 90),
            flash: Rgb::new(200, 120, 0),
        },
    }
}

fn piece_color(kind: PieceKind, theme: Theme) -> Rgb {
    let dark = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    match theme {
        Theme::Dark => dark,
        // Darken for the light background.
        Theme::Light => Rgb::new(dark.r / 2, dark.g / 2, dark.b / 2),
    }
}

/// Pure session-to-framebuffer renderer.
pub struct GameView {
    /// Board cell width in terminal columns (2x1 compensates for glyph
    /// aspect ratio).
    cell_w: u16,
    cell_h: u16,
    pause_label: String,
    reset_label: String,
}

impl GameView {
    pub fn new(pause_label: String, reset_label: String) -> Self {
        Self {
            cell_w: 2,
            cell_h: 1,
            pause_label,
            reset_label,
        }
    }

    /// Render the session into a fresh frame sized to `viewport`.
    pub fn render(&self, session: &Session, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        let theme = session.switches().theme;
        let pal = palette(theme);

        fb.clear(Glyph::new(' ', GlyphStyle::plain(pal.text, pal.screen_bg)));

        let field = session.field();
        let board_px_w = field.cols() as u16 * self.cell_w;
        let board_px_h = field.rows() as u16 * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            GlyphStyle::plain(pal.grid_dot, pal.board_bg),
        );
        self.draw_border(
            &mut fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            GlyphStyle::plain(pal.border, pal.screen_bg),
        );

        // Locked grid cells and the flash animation.
        for (x, y, cell) in field.iter_cells() {
            let (ch, fg) = match cell {
                Cell::Empty => ('·', pal.grid_dot),
                Cell::Block(kind) => ('█', piece_color(kind, theme)),
                Cell::Marked => ('█', pal.marked),
                Cell::Flash => ('▒', pal.flash),
            };
            let style = GlyphStyle {
                fg,
                bg: pal.board_bg,
                bold: cell == Cell::Flash,
                dim: cell == Cell::Empty,
            };
            self.fill_cell(&mut fb, start_x, start_y, x as u16, y as u16, ch, style);
        }

        if !session.game_over() {
            self.draw_figure(&mut fb, session, start_x, start_y, &pal, theme);
        }

        self.draw_side_panel(&mut fb, session, viewport, start_x, start_y, frame_w, &pal);

        // Game over wins over pause: a focus loss can still set the paused
        // flag on a dead game, but the player needs the restart hint.
        if session.game_over() {
            self.overlay(
                &mut fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                &format!("GAME OVER ({} restarts)", self.reset_label),
                &pal,
            );
        } else if session.paused() {
            self.overlay(
                &mut fb,
                start_x,
                start_y,
                frame_w,
                frame_h,
                &format!("PAUSED ({} resumes)", self.pause_label),
                &pal,
            );
        }

        fb
    }

    fn draw_figure(
        &self,
        fb: &mut FrameBuffer,
        session: &Session,
        start_x: u16,
        start_y: u16,
        pal: &Palette,
        theme: Theme,
    ) {
        let field = session.field();
        let figure = field.figure();

        // Ghost: project the figure down by its free fall distance.
        if session.switches().shadow {
            let distance = field.height(0);
            if distance > 0 {
                let style = GlyphStyle {
                    fg: pal.ghost,
                    bg: pal.board_bg,
                    bold: false,
                    dim: true,
                };
                for (x, y) in figure.cells() {
                    let gy = y + distance;
                    if x >= 0 && gy >= 0 {
                        self.fill_cell(fb, start_x, start_y, x as u16, gy as u16, '░', style);
                    }
                }
            }
        }

        let style = GlyphStyle {
            fg: piece_color(figure.kind(), theme),
            bg: pal.board_bg,
            bold: true,
            dim: false,
        };
        for (x, y) in figure.cells() {
            if x >= 0 && y >= 0 {
                self.fill_cell(fb, start_x, start_y, x as u16, y as u16, '█', style);
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        session: &Session,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        pal: &Palette,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = GlyphStyle {
            fg: pal.text,
            bg: pal.screen_bg,
            bold: true,
            dim: false,
        };
        let value = GlyphStyle::plain(pal.value, pal.screen_bg);

        let mut y = start_y;
        for (name, amount) in [
            ("SCORE", session.score()),
            ("LEVEL", session.level()),
            ("LINES", session.lines()),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_str(panel_x, y + 1, &amount.to_string(), value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        let next = session.next_figure();
        let style = GlyphStyle {
            fg: piece_color(next, session.switches().theme),
            bg: pal.screen_bg,
            bold: true,
            dim: false,
        };
        for &(dx, dy) in orientations(next)[0].iter() {
            let px = panel_x + (dx as u16) * self.cell_w;
            let py = y + dy as u16;
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
        y = y.saturating_add(5);

        let switches = session.switches();
        for (name, on) in [
            ("shadow", switches.shadow),
            ("music", switches.music),
            ("sound", switches.sound),
        ] {
            let state = if on { "on" } else { "off" };
            fb.put_str(panel_x, y, &format!("{name} {state}"), value);
            y = y.saturating_add(1);
        }
    }

    fn overlay(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
        pal: &Palette,
    ) {
        let mid_x = start_x.saturating_add(frame_w / 2);
        let mid_y = start_y.saturating_add(frame_h / 2);
        fb.write(
            text,
            mid_x,
            mid_y,
            GlyphStyle::plain(pal.text, pal.screen_bg),
            Align::Center,
            Emphasis::Strong,
        );
    }

    fn draw_border(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        style: GlyphStyle,
    ) {
        if w < 2 || h < 2 {
            return;
        }
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: GlyphStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }
}

impl Default for GameView {
    fn default() -> Self {
        Self::new("p".to_string(), "r".to_string())
    }
}
