//! Screen renderers.
//!
//! The cabinet only knows about the [`Renderer`] trait, so presentation
//! (text, TUI, nothing at all) stays out of the game loop.

use std::io::Write;

use super::{ArcadeError, Screen};

/// Receives the screen after each score update.
pub trait Renderer {
    fn render(&mut self, screen: &Screen) -> Result<(), ArcadeError>;
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _screen: &Screen) -> Result<(), ArcadeError> {
        Ok(())
    }
}

/// Draws frames as text, one glyph per tile.
pub struct TextRenderer<W: Write> {
    out: W,
    clear: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, clear: false }
    }

    /// Clear the terminal before each frame.
    pub fn clear_between_frames(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, screen: &Screen) -> std::io::Result<()> {
        if self.clear {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        for row in screen.rows() {
            let line: String = row.iter().map(|tile| tile.glyph()).collect();
            writeln!(self.out, "{}", line)?;
        }
        writeln!(
            self.out,
            "Score: {} Blocks remaining: {}",
            screen.score(),
            screen.block_count()
        )?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, screen: &Screen) -> Result<(), ArcadeError> {
        self.draw(screen)
            .map_err(|e| ArcadeError::RenderError(e.to_string()))
    }
}
