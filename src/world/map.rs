//! Map data structure
//!
//! The 2D grid of tile tags every generation stage reads and mutates.

use super::position::Position;
use super::tile::TileType;
use thiserror::Error;

/// Errors raised when building a map from text rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

/// A level grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileType>,
    /// Player spawn, once placed
    pub spawn: Option<Position>,
    /// Goal door, once placed
    pub goal: Option<Position>,
}

impl Map {
    /// Create a new map filled with walls. Negative sizes are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            width,
            height,
            tiles: vec![TileType::Wall; (width * height) as usize],
            spawn: None,
            goal: None,
        }
    }

    /// Parse rows of glyphs. `P` and `D` cells also set `spawn`/`goal`
    /// (the last one wins if a row set contains several).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let first = rows.first().ok_or(MapError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut map = Map::new(width as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow { row: y, expected: width, found });
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = TileType::from_glyph(glyph)
                    .ok_or(MapError::UnknownGlyph { glyph, x, y })?;
                let pos = Position::new(x as i32, y as i32);
                map.set(pos, tile);
                match tile {
                    TileType::PlayerSpawn => map.spawn = Some(pos),
                    TileType::Goal => map.goal = Some(pos),
                    _ => {}
                }
            }
        }
        Ok(map)
    }

    /// Render as one string per row
    pub fn to_rows(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(TileType::glyph).collect())
            .collect()
    }

    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn idx_to_pos(&self, idx: usize) -> Position {
        let idx = idx as i32;
        Position::new(idx % self.width, idx / self.width)
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// True for cells off the boundary ring
    #[inline]
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x > 0 && pos.x < self.width - 1 && pos.y > 0 && pos.y < self.height - 1
    }

    pub fn get(&self, pos: Position) -> Option<TileType> {
        if self.in_bounds(pos) {
            Some(self.tiles[self.xy_to_idx(pos.x, pos.y)])
        } else {
            None
        }
    }

    /// Set the tag at `pos`; out-of-bounds writes are ignored
    pub fn set(&mut self, pos: Position, tile: TileType) {
        if self.in_bounds(pos) {
            let idx = self.xy_to_idx(pos.x, pos.y);
            self.tiles[idx] = tile;
        }
    }

    /// Out-of-bounds cells count as walls
    pub fn is_wall(&self, pos: Position) -> bool {
        self.get(pos).map_or(true, |t| t.is_wall())
    }

    /// Out-of-bounds cells block too
    pub fn blocks_slide(&self, pos: Position) -> bool {
        self.get(pos).map_or(true, |t| t.blocks_slide())
    }

    pub fn is_floor(&self, pos: Position) -> bool {
        self.get(pos).map_or(false, |t| t.is_floor())
    }

    /// Number of plain-wall orthogonal neighbours
    pub fn wall_neighbors(&self, pos: Position) -> usize {
        pos.neighbors().filter(|&n| self.is_wall(n)).count()
    }

    /// Every coordinate in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(|idx| self.idx_to_pos(idx))
    }

    /// Interior coordinates in row-major order
    pub fn interior_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&p| self.is_interior(p))
    }

    pub fn floor_positions(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.is_floor(p)).collect()
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Force the boundary ring to wall
    pub fn seal_border(&mut self) {
        for x in 0..self.width {
            self.set(Position::new(x, 0), TileType::Wall);
            self.set(Position::new(x, self.height - 1), TileType::Wall);
        }
        for y in 0..self.height {
            self.set(Position::new(0, y), TileType::Wall);
            self.set(Position::new(self.width - 1, y), TileType::Wall);
        }
    }

    /// Flip left-to-right
    pub fn mirror_horizontal(&mut self) {
        let width = self.width as usize;
        for row in self.tiles.chunks_mut(width) {
            row.reverse();
        }
        let w = self.width;
        let flip = |p: Position| Position::new(w - 1 - p.x, p.y);
        self.spawn = self.spawn.map(flip);
        self.goal = self.goal.map(flip);
    }

    /// Flip top-to-bottom
    pub fn mirror_vertical(&mut self) {
        let width = self.width as usize;
        let rows: Vec<Vec<TileType>> = self.tiles.chunks(width).rev().map(<[_]>::to_vec).collect();
        self.tiles = rows.concat();
        let h = self.height;
        let flip = |p: Position| Position::new(p.x, h - 1 - p.y);
        self.spawn = self.spawn.map(flip);
        self.goal = self.goal.map(flip);
    }
}
