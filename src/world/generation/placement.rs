//! Item placement
//!
//! Coins, floor spikes and cocoons are placed as straight runs by rejection
//! sampling. Wall spikes are grown along exposed wall faces. Every placer is
//! best effort: running out of attempts quietly places fewer items.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::{Direction, Map, Position, TileType};

/// How a category relates to the protected route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRule {
    /// No restriction beyond free floor
    Anywhere,
    /// Must not touch the zone
    AvoidZone,
    /// Must not touch the zone, but at least one cell must border it
    BesideZone,
}

/// One category's placement request
#[derive(Debug, Clone, Copy)]
pub struct GroupRequest {
    pub tile: TileType,
    pub groups: u32,
    pub len: (u32, u32),
    pub rule: PlacementRule,
    pub max_attempts: u32,
}

/// Cells that may not be covered: spawn, goal and the protected zone
pub struct Protected<'a> {
    pub spawn: Position,
    pub goal: Position,
    pub zone: &'a HashSet<Position>,
}

impl Protected<'_> {
    fn is_endpoint(&self, pos: Position) -> bool {
        pos == self.spawn || pos == self.goal
    }
}

/// Place up to `request.groups` runs and return how many were placed
pub fn place_groups(
    map: &mut Map,
    rng: &mut StdRng,
    request: &GroupRequest,
    protected: &Protected,
) -> u32 {
    let (min_len, max_len) = request.len;
    let mut placed = 0;
    let mut attempts = 0;

    while placed < request.groups && attempts < request.max_attempts {
        attempts += 1;
        let x = rng.gen_range(1..=map.width - 2);
        let y = rng.gen_range(1..=map.height - 2);
        let anchor = Position::new(x, y);
        if !map.is_floor(anchor) {
            continue;
        }
        let dir = *Direction::ALL.choose(rng).unwrap_or(&Direction::Right);
        let length = rng.gen_range(min_len..=max_len);

        if let Some(cells) = candidate_group(map, anchor, dir, length, request.rule, protected) {
            for pos in cells {
                map.set(pos, request.tile);
            }
            placed += 1;
        }
    }

    if placed < request.groups {
        log::debug!(
            "Placed {}/{} {:?} groups after {} attempts",
            placed, request.groups, request.tile, attempts
        );
    }
    placed
}

/// Walk `length` cells from `anchor`; `None` if any cell is unusable
fn candidate_group(
    map: &Map,
    anchor: Position,
    dir: Direction,
    length: u32,
    rule: PlacementRule,
    protected: &Protected,
) -> Option<Vec<Position>> {
    let mut cells = Vec::with_capacity(length as usize);
    let mut borders_zone = false;

    for i in 0..length as i32 {
        let pos = anchor.offset(dir, i);
        if !map.is_floor(pos) || protected.is_endpoint(pos) {
            return None;
        }
        if rule != PlacementRule::Anywhere && protected.zone.contains(&pos) {
            return None;
        }
        if rule == PlacementRule::BesideZone {
            borders_zone |= pos.neighbors().any(|n| protected.zone.contains(&n));
        }
        cells.push(pos);
    }

    if rule == PlacementRule::BesideZone && !borders_zone {
        return None;
    }
    Some(cells)
}

/// A cell a player could stand in or pass through
fn is_open(map: &Map, pos: Position) -> bool {
    map.get(pos).map_or(false, |t| !matches!(t, TileType::Wall | TileType::WallSpike))
}

/// Direction from a wall towards its first open neighbour
fn opening(map: &Map, wall: Position) -> Option<Direction> {
    Direction::ALL.into_iter().find(|&d| is_open(map, wall.step(d)))
}

/// Convert exposed walls into wall spikes, never touching `impacts`.
///
/// Each placement grows a run of up to `len` cells sideways along the wall
/// face, stopping as soon as a cell is no longer wall or no longer faces the
/// corridor. Returns the number of runs placed.
pub fn place_wall_spikes(
    map: &mut Map,
    rng: &mut StdRng,
    count: u32,
    len: (u32, u32),
    impacts: &HashSet<Position>,
) -> u32 {
    let mut candidates: Vec<(Position, Direction)> = map
        .interior_positions()
        .filter(|p| map.is_wall(*p) && !impacts.contains(p))
        .filter_map(|p| opening(map, p).map(|d| (p, d)))
        .collect();
    candidates.shuffle(rng);

    let mut placed = 0;
    for (start, facing) in candidates {
        if placed >= count {
            break;
        }
        if !map.is_wall(start) {
            // Already taken by an earlier run
            continue;
        }
        let Some(&along) = facing.perpendicular().choose(rng) else {
            continue;
        };
        let length = rng.gen_range(len.0..=len.1) as i32;

        for i in 0..length {
            let pos = start.offset(along, i);
            let exposed = is_open(map, pos.step(facing));
            if !map.is_interior(pos) || !map.is_wall(pos) || impacts.contains(&pos) || !exposed {
                break;
            }
            map.set(pos, TileType::WallSpike);
        }
        placed += 1;
    }
    placed
}
