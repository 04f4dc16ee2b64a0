//! Arcade screen state: a tile grid plus score bookkeeping.

use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use tracing::warn;

use super::ArcadeError;

/// A screen tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Block,
    Paddle,
    Ball,
}

impl Tile {
    /// Create from a tile id emitted by the game.
    pub fn from_id(id: i64) -> Result<Self, ArcadeError> {
        match id {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Wall),
            2 => Ok(Tile::Block),
            3 => Ok(Tile::Paddle),
            4 => Ok(Tile::Ball),
            _ => Err(ArcadeError::UnknownTile(id)),
        }
    }

    /// Character used by text renderers.
    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '|',
            Tile::Block => '=',
            Tile::Paddle => '-',
            Tile::Ball => 'o',
        }
    }
}

/// Tiles are only drawn at coordinates in `0..MAX_EXTENT` on both axes.
pub const MAX_EXTENT: i64 = 1024;

/// The arcade screen.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    tiles: HashMap<(i64, i64), Tile>,
    max_x: Option<i64>,
    max_y: Option<i64>,
    blocks: usize,
    seen_blocks: bool,
    score: i64,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a tile, keeping the live block count in step.
    ///
    /// Coordinates outside `0..MAX_EXTENT` are dropped.
    pub fn set_tile(&mut self, x: i64, y: i64, tile: Tile) {
        let on_screen = |c: i64| (0..MAX_EXTENT).contains(&c);
        if !on_screen(x) || !on_screen(y) {
            warn!(x, y, ?tile, "tile off screen, ignored");
            return;
        }

        self.max_x = Some(self.max_x.map_or(x, |m| m.max(x)));
        self.max_y = Some(self.max_y.map_or(y, |m| m.max(y)));

        let previous = self.tiles.insert((x, y), tile).unwrap_or_default();
        match (previous == Tile::Block, tile == Tile::Block) {
            (false, true) => self.blocks += 1,
            (true, false) => self.blocks -= 1,
            _ => {}
        }
        if tile == Tile::Block {
            self.seen_blocks = true;
        }
    }

    pub fn tile_at(&self, x: i64, y: i64) -> Tile {
        self.tiles.get(&(x, y)).copied().unwrap_or_default()
    }

    /// Number of blocks currently on screen.
    pub fn block_count(&self) -> usize {
        self.blocks
    }

    /// True once any block has been drawn.
    pub fn seen_blocks(&self) -> bool {
        self.seen_blocks
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    /// Width and height of the drawn area, counting from the origin.
    pub fn size(&self) -> (usize, usize) {
        let extent = |max: Option<i64>| max.map_or(0, |m| m as usize + 1);
        (extent(self.max_x), extent(self.max_y))
    }

    /// The screen as a row-major grid.
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        let (width, height) = self.size();
        (0..height as i64)
            .map(|y| (0..width as i64).map(|x| self.tile_at(x, y)).collect())
            .collect()
    }
}
