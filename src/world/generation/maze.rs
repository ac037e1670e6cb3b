//! Maze carving
//!
//! Randomized depth-first carve over the odd-coordinate lattice, followed by
//! optional widening and braiding passes that loosen the perfect maze.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::{Direction, Map, Position, TileType};

/// Carve a spanning-tree maze from `origin`.
///
/// Lattice cells sit two steps apart; carving into a neighbour also opens
/// the wall cell between them. Uses an explicit stack, with each cell's
/// directions shuffled once when it is first opened.
pub fn carve(map: &mut Map, rng: &mut StdRng, origin: Position) {
    let mut stack: Vec<(Position, [Direction; 4], usize)> = Vec::new();
    map.set(origin, TileType::Floor);
    stack.push((origin, shuffled_directions(rng), 0));

    while let Some((cell, dirs, next)) = stack.last_mut() {
        let Some(&dir) = dirs.get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;

        let cell = *cell;
        let target = cell.offset(dir, 2);
        if map.is_interior(target) && map.is_wall(target) {
            map.set(cell.step(dir), TileType::Floor);
            map.set(target, TileType::Floor);
            stack.push((target, shuffled_directions(rng), 0));
        }
    }
}

fn shuffled_directions(rng: &mut StdRng) -> [Direction; 4] {
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    dirs
}

/// Open interior walls that touch a corridor, each with probability `chance`.
///
/// Scans row by row against the live grid, so a freshly opened cell can
/// expose the wall after it. Produces a mix of one- and two-wide corridors.
pub fn widen(map: &mut Map, rng: &mut StdRng, chance: f64) {
    if chance <= 0.0 {
        return;
    }
    for y in 1..map.height - 1 {
        for x in 1..map.width - 1 {
            let pos = Position::new(x, y);
            if !map.is_wall(pos) {
                continue;
            }
            let touches_floor = pos.neighbors().any(|n| map.is_floor(n));
            if touches_floor && rng.gen_bool(chance) {
                map.set(pos, TileType::Floor);
            }
        }
    }
}

/// Floor cells walled in on exactly three sides
pub fn dead_ends(map: &Map) -> Vec<Position> {
    map.interior_positions()
        .filter(|&p| map.is_floor(p) && map.wall_neighbors(p) == 3)
        .collect()
}

/// Remove a `fraction` of dead ends by knocking out one adjacent wall each.
///
/// The border ring is never opened. Returns the number of dead ends removed.
pub fn braid(map: &mut Map, rng: &mut StdRng, fraction: f64) -> usize {
    let mut ends = dead_ends(map);
    ends.shuffle(rng);
    let take = (ends.len() as f64 * fraction) as usize;

    let mut opened = 0;
    for pos in ends.into_iter().take(take) {
        let walls: Vec<Position> = pos
            .neighbors()
            .filter(|&n| map.is_interior(n) && map.is_wall(n))
            .collect();
        if let Some(&wall) = walls.choose(rng) {
            map.set(wall, TileType::Floor);
            opened += 1;
        }
    }
    opened
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Flood fill over non-wall cells
    fn connected_from(map: &Map, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            for n in pos.neighbors() {
                if map.in_bounds(n) && !map.is_wall(n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen
    }

    fn carved(seed: u64, width: i32, height: i32) -> Map {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut map = Map::new(width, height);
        carve(&mut map, &mut rng, Position::new(1, 1));
        map
    }

    #[test]
    fn test_carve_opens_every_lattice_cell() {
        let map = carved(7, 21, 15);
        for y in (1..15).step_by(2) {
            for x in (1..21).step_by(2) {
                assert!(map.is_floor(Position::new(x, y)), "({}, {}) not carved", x, y);
            }
        }
        // Even-even cells are pillars and stay walls
        assert!(map.is_wall(Position::new(2, 2)));
    }

    #[test]
    fn test_carve_is_a_spanning_tree() {
        let map = carved(11, 25, 25);
        let floors = map.floor_positions();
        // A tree over n lattice cells has n - 1 connecting corridors
        let lattice = 12 * 12;
        assert_eq!(floors.len(), lattice + lattice - 1);
        assert_eq!(connected_from(&map, Position::new(1, 1)).len(), floors.len());
    }

    #[test]
    fn test_carve_keeps_border() {
        let map = carved(3, 11, 9);
        for pos in map.positions().filter(|&p| !map.is_interior(p)) {
            assert!(map.is_wall(pos));
        }
    }

    #[test]
    fn test_carve_is_deterministic_per_seed() {
        assert_eq!(carved(42, 31, 31), carved(42, 31, 31));
    }

    #[test]
    fn test_widen_keeps_connectivity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut map = carved(5, 31, 31);
        let before = map.floor_positions().len();
        widen(&mut map, &mut rng, 0.4);
        let floors = map.floor_positions();
        assert!(floors.len() > before);
        assert_eq!(connected_from(&map, Position::new(1, 1)).len(), floors.len());
    }

    #[test]
    fn test_widen_zero_chance_is_noop() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut map = carved(5, 15, 15);
        let before = map.clone();
        widen(&mut map, &mut rng, 0.0);
        assert_eq!(map, before);
    }

    #[test]
    fn test_full_braid_removes_dead_ends() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut map = carved(9, 21, 21);
        let ends = dead_ends(&map).len();
        assert!(ends > 0);

        let opened = braid(&mut map, &mut rng, 1.0);
        assert!(opened > 0 && opened <= ends);
        assert!(dead_ends(&map).len() < ends);
        for pos in map.positions().filter(|&p| !map.is_interior(p)) {
            assert!(map.is_wall(pos));
        }
    }
}
