//! Tile definitions
//!
//! The closed set of cell tags a generated level is made of, and the
//! single-character codec the level loader reads.

use serde::{Deserialize, Serialize};

/// Types of tiles in a generated level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Wall,
    Floor,
    PlayerSpawn,
    Goal,
    Coin,
    FloorSpike,
    WallSpike,
    Cocoon,
}

impl TileType {
    /// Every tag, in glyph-table order
    pub const ALL: [TileType; 8] = [
        TileType::Wall,
        TileType::Floor,
        TileType::PlayerSpawn,
        TileType::Goal,
        TileType::Coin,
        TileType::FloorSpike,
        TileType::WallSpike,
        TileType::Cocoon,
    ];

    pub fn is_wall(&self) -> bool {
        matches!(self, TileType::Wall)
    }

    /// Cells a slide stops in front of: both wall kinds, floor spikes and
    /// cocoons. Coins, the spawn and the goal are passed over.
    pub fn blocks_slide(&self) -> bool {
        matches!(
            self,
            TileType::Wall | TileType::WallSpike | TileType::FloorSpike | TileType::Cocoon
        )
    }

    pub fn is_floor(&self) -> bool {
        matches!(self, TileType::Floor)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Wall => 'W',
            TileType::Floor => '.',
            TileType::PlayerSpawn => 'P',
            TileType::Goal => 'D',
            TileType::Coin => 'C',
            TileType::FloorSpike => '^',
            TileType::WallSpike => '#',
            TileType::Cocoon => 'O',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<TileType> {
        TileType::ALL.into_iter().find(|t| t.glyph() == glyph)
    }

    /// Terminal foreground color (RGB)
    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            TileType::Wall => (130, 110, 90),
            TileType::Floor => (60, 60, 60),
            TileType::PlayerSpawn => (0, 255, 255),
            TileType::Goal => (100, 255, 100),
            TileType::Coin => (255, 215, 0),
            TileType::FloorSpike => (200, 50, 50),
            TileType::WallSpike => (255, 80, 80),
            TileType::Cocoon => (180, 50, 180),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_unique() {
        for tile in TileType::ALL {
            assert_eq!(TileType::from_glyph(tile.glyph()), Some(tile));
        }
        assert_eq!(TileType::from_glyph('G'), None);
    }

    #[test]
    fn test_wall_kinds() {
        assert!(TileType::Wall.is_wall());
        assert!(!TileType::WallSpike.is_wall());
        assert!(TileType::WallSpike.blocks_slide());
        assert!(TileType::Cocoon.blocks_slide());
        assert!(TileType::FloorSpike.blocks_slide());
        assert!(!TileType::Coin.blocks_slide());
        assert!(!TileType::Goal.blocks_slide());
    }
}
