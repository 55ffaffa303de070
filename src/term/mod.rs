//! Terminal rendering layer.
//!
//! A simple framebuffer pipeline instead of a widget toolkit: the view maps
//! the session into styled character cells, the renderer diffs frames and
//! flushes changed runs to the terminal.

pub mod fb;
pub mod renderer;
pub mod view;

pub use fb::{Align, Emphasis, FrameBuffer, Glyph, GlyphStyle, Rgb};
pub use renderer::TerminalRenderer;
pub use view::{GameView, Viewport};
