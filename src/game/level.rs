//! Level loading
//!
//! Turns generated (or hand-authored) rows into the list of entities the
//! game has to spawn plus the static collision grid. The rows are scanned
//! once; nothing here calls back into the generator.

use std::collections::HashSet;

use thiserror::Error;

use crate::world::{Direction, Position};

/// Problems found while reading level rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level has no player spawn")]
    MissingPlayer,
    #[error("level has no goal door")]
    MissingDoor,
    #[error("level has a second {what} at ({}, {})", .at.x, .at.y)]
    Duplicate { what: &'static str, at: Position },
    #[error("unknown glyph {glyph:?} at ({}, {})", .at.x, .at.y)]
    UnknownGlyph { glyph: char, at: Position },
}

/// Something the game must instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Player,
    Door,
    Coin,
    Ghost,
    Cocoon,
    /// Floor trap; `None` aims at the player when triggered
    Trap { facing: Option<Direction> },
    /// Spike embedded in a wall
    WallTrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub kind: SpawnKind,
    pub pos: Position,
}

/// Everything the game needs to build a level
#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    pub width: i32,
    pub height: i32,
    pub walls: Vec<Position>,
    /// Cells that stop movement: walls, cocoons and traps. For generated
    /// rows this is exactly the set of `TileType::blocks_slide` cells.
    pub obstacles: HashSet<Position>,
    /// Entities in row-major order
    pub spawns: Vec<Spawn>,
    pub player: Position,
    pub door: Position,
}

impl LevelLayout {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let mut layout = LevelLayout {
            height: rows.len() as i32,
            ..Default::default()
        };
        let mut player = None;
        let mut door = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            layout.width = layout.width.max(row.chars().count() as i32);
            for (x, glyph) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let kind = match glyph {
                    '.' => continue,
                    'W' => {
                        layout.walls.push(pos);
                        layout.obstacles.insert(pos);
                        continue;
                    }
                    'P' => {
                        claim(&mut player, pos, "player spawn")?;
                        SpawnKind::Player
                    }
                    'D' => {
                        claim(&mut door, pos, "goal door")?;
                        SpawnKind::Door
                    }
                    'C' => SpawnKind::Coin,
                    'G' => SpawnKind::Ghost,
                    'O' => SpawnKind::Cocoon,
                    '^' => SpawnKind::Trap { facing: None },
                    'v' => SpawnKind::Trap { facing: Some(Direction::Down) },
                    '<' => SpawnKind::Trap { facing: Some(Direction::Left) },
                    '>' => SpawnKind::Trap { facing: Some(Direction::Right) },
                    '#' => SpawnKind::WallTrap,
                    _ => return Err(LevelError::UnknownGlyph { glyph, at: pos }),
                };
                if kind.is_obstacle() {
                    layout.obstacles.insert(pos);
                }
                layout.spawns.push(Spawn { kind, pos });
            }
        }

        layout.player = player.ok_or(LevelError::MissingPlayer)?;
        layout.door = door.ok_or(LevelError::MissingDoor)?;
        Ok(layout)
    }

    pub fn count(&self, kind: SpawnKind) -> usize {
        self.spawns.iter().filter(|s| s.kind == kind).count()
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }
}

impl SpawnKind {
    pub fn is_obstacle(&self) -> bool {
        matches!(self, SpawnKind::Cocoon | SpawnKind::Trap { .. } | SpawnKind::WallTrap)
    }
}

fn claim(slot: &mut Option<Position>, pos: Position, what: &'static str) -> Result<(), LevelError> {
    if slot.is_some() {
        return Err(LevelError::Duplicate { what, at: pos });
    }
    *slot = Some(pos);
    Ok(())
}
