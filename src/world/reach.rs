//! Reachability under sliding movement
//!
//! Breadth-first searches where each edge is one slide. Distances are in
//! slide counts, so a long corridor costs the same as a one-cell hop.

use std::collections::{HashMap, HashSet, VecDeque};

use super::map::Map;
use super::position::{Direction, Position};
use super::slide::{slide, slide_stop};

/// Slide counts from a start cell to every reachable stop cell
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    pub start: Position,
    pub steps: HashMap<Position, u32>,
}

impl Reachability {
    pub fn get(&self, pos: Position) -> Option<u32> {
        self.steps.get(&pos).copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.steps.contains_key(&pos)
    }

    /// Largest slide count of any reachable cell
    pub fn max_steps(&self) -> u32 {
        self.steps.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.steps.iter().map(|(&p, &s)| (p, s))
    }
}

/// Compute slide counts from `start` to every stop cell it can reach
pub fn reach(map: &Map, start: Position) -> Reachability {
    let mut steps = HashMap::new();
    let mut queue = VecDeque::new();
    steps.insert(start, 0);
    queue.push_back((start, 0));

    while let Some((current, count)) = queue.pop_front() {
        for dir in Direction::ALL {
            let stop = slide_stop(map, current, dir);
            if !steps.contains_key(&stop) {
                steps.insert(stop, count + 1);
                queue.push_back((stop, count + 1));
            }
        }
    }

    Reachability { start, steps }
}

/// One shortest slide route from spawn to goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    /// Floor cells passed through while sliding
    pub trace: HashSet<Position>,
    /// Cells the route comes to rest on
    pub stops: HashSet<Position>,
    /// Walls hit to brake along the route
    pub impacts: HashSet<Position>,
    /// Directions of each slide, in order
    pub moves: Vec<Direction>,
}

impl Solution {
    /// Cells hazards may never occupy: trace, stops and both endpoints
    pub fn safe_zone(&self, spawn: Position, goal: Position) -> HashSet<Position> {
        let mut zone: HashSet<Position> = self.trace.union(&self.stops).copied().collect();
        zone.insert(spawn);
        zone.insert(goal);
        zone
    }

    /// Number of slides on the route
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Find a shortest slide route from `spawn` to `goal`.
///
/// Returns `None` if `goal` is not a reachable stop cell.
pub fn solve(map: &Map, spawn: Position, goal: Position) -> Option<Solution> {
    // stop cell -> (previous stop, direction taken)
    let mut parents: HashMap<Position, Option<(Position, Direction)>> = HashMap::new();
    let mut queue = VecDeque::new();
    parents.insert(spawn, None);
    queue.push_back(spawn);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return Some(trace_back(map, &parents, goal));
        }
        for dir in Direction::ALL {
            let stop = slide_stop(map, current, dir);
            if !parents.contains_key(&stop) {
                parents.insert(stop, Some((current, dir)));
                queue.push_back(stop);
            }
        }
    }

    None
}

/// Replay the parent chain forward, collecting the cells and walls it touches
fn trace_back(
    map: &Map,
    parents: &HashMap<Position, Option<(Position, Direction)>>,
    goal: Position,
) -> Solution {
    let mut edges = Vec::new();
    let mut current = goal;
    while let Some(&Some((prev, dir))) = parents.get(&current) {
        edges.push((prev, dir));
        current = prev;
    }
    edges.reverse();

    let mut solution = Solution::default();
    for (from, dir) in edges {
        let step = slide(map, from, dir);
        solution.trace.extend(step.path.iter().copied());
        solution.stops.insert(step.stop);
        if let Some(wall) = step.impact {
            solution.impacts.insert(wall);
        }
        solution.moves.push(dir);
    }
    solution
}
