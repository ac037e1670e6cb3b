//! Sliding movement
//!
//! A single move carries an actor across the grid until the next cell blocks
//! it (walls, spikes, cocoons) or is off the map. Every "adjacency" used by
//! the generator is built on this transition rather than on single steps.

use super::map::Map;
use super::position::{Direction, Position};

/// Result of one slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Cell the slide ends on
    pub stop: Position,
    /// Cells passed through, start excluded, stop included
    pub path: Vec<Position>,
    /// Cell that halted the slide; `None` when the grid edge did
    pub impact: Option<Position>,
}

/// Slide from `from` in `dir`, recording the path and impact wall
pub fn slide(map: &Map, from: Position, dir: Direction) -> Slide {
    let mut current = from;
    let mut path = Vec::new();

    let impact = loop {
        let next = current.step(dir);
        if !map.in_bounds(next) {
            break None;
        }
        if map.blocks_slide(next) {
            break Some(next);
        }
        current = next;
        path.push(current);
    };

    Slide { stop: current, path, impact }
}

/// Stop cell only, for searches that don't need the path
pub fn slide_stop(map: &Map, from: Position, dir: Direction) -> Position {
    let mut current = from;
    loop {
        let next = current.step(dir);
        if map.blocks_slide(next) {
            return current;
        }
        current = next;
    }
}
