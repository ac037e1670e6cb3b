//! World module
//!
//! Contains the grid, tiles, sliding movement, slide-graph search and
//! procedural generation.

pub mod map;
pub mod tile;
pub mod position;
pub mod slide;
pub mod reach;
pub mod generation;

pub use map::{Map, MapError};
pub use tile::TileType;
pub use position::{Direction, Position};
pub use slide::{slide, slide_stop, Slide};
pub use reach::{reach, solve, Reachability, Solution};
