//! Spawn and goal placement

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::{Map, Position, Reachability};

/// Random draws tried in the preferred area before widening the search
const SPAWN_DRAWS: u32 = 200;

/// Goal scoring weights and filters
#[derive(Debug, Clone, Copy)]
pub struct GoalRules {
    pub min_slide_steps: u32,
    pub step_weight: u32,
    pub distance_weight: u32,
    pub top_k: usize,
}

/// A goal candidate that cleared the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalChoice {
    pub pos: Position,
    pub slide_steps: u32,
    pub score: u64,
}

/// Choose a floor cell for the player, preferring the top-left third.
///
/// Falls back to any floor cell, then to the first floor cell in row order.
pub fn pick_spawn(map: &Map, rng: &mut StdRng) -> Option<Position> {
    let limit_x = (map.width / 3).max(1);
    let limit_y = (map.height / 3).max(1);
    for _ in 0..SPAWN_DRAWS {
        let pos = Position::new(rng.gen_range(1..=limit_x), rng.gen_range(1..=limit_y));
        if map.is_floor(pos) {
            return Some(pos);
        }
    }

    let floors = map.floor_positions();
    floors
        .iter()
        .filter(|p| p.x <= limit_x && p.y <= limit_y)
        .copied()
        .collect::<Vec<_>>()
        .choose(rng)
        .copied()
        .or_else(|| floors.choose(rng).copied())
}

/// Score every reachable cell and pick one of the best.
///
/// Returns `None` when no cell other than the spawn reaches the threshold.
pub fn pick_goal(
    reach: &Reachability,
    rules: &GoalRules,
    rng: &mut StdRng,
) -> Option<GoalChoice> {
    let mut candidates = scored_candidates(reach, rules);
    if candidates.is_empty() {
        return None;
    }
    // Highest score first; ties broken by position so the order is stable
    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.pos.cmp(&b.pos)));
    candidates.truncate(rules.top_k.max(1));
    candidates.choose(rng).copied()
}

fn scored_candidates(reach: &Reachability, rules: &GoalRules) -> Vec<GoalChoice> {
    reach
        .iter()
        .filter(|&(pos, steps)| pos != reach.start && steps >= rules.min_slide_steps)
        .map(|(pos, steps)| {
            let distance = pos.distance(&reach.start) as u64;
            GoalChoice {
                pos,
                slide_steps: steps,
                score: steps as u64 * rules.step_weight as u64
                    + distance * rules.distance_weight as u64,
            }
        })
        .collect()
}
