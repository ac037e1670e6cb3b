//! Procedural level generation
//!
//! Builds a base layout (carved maze or template), places the spawn and a
//! far-enough goal, extracts the intended route and then fills the level with
//! items that never block or poison that route.

pub mod maze;
pub mod templates;
pub mod goal;
pub mod placement;

use rand::rngs::StdRng;
use thiserror::Error;

use crate::data::config::{ConfigError, GeneratorConfig, GroupSpec, Strategy};
use crate::world::map::MapError;
use crate::world::{reach, solve, Map, Position, Solution, TileType};
use goal::GoalRules;
use placement::{GroupRequest, PlacementRule, Protected};

/// Top-left lattice cell every carve starts from
const CARVE_ORIGIN: Position = Position { x: 1, y: 1 };

/// Item fills tried per layout before the layout is rejected
const POPULATE_TRIES: u32 = 5;

/// Generation failures
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("bad template: {0}")]
    Template(#[from] MapError),
    #[error("layout has no floor cell for the player")]
    NoFloor,
    /// No cell clears the slide threshold; the layout should be regenerated
    #[error("no goal at least {required} slides away (best was {best})")]
    GoalUnreachable { required: u32, best: u32 },
    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// How the level was obtained when the configured settings kept failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    None,
    /// Switched from carving to a template
    Template,
    /// Lowered the slide threshold to what the layouts could reach
    Relaxed { requested: u32, used: u32 },
}

/// Groups actually placed per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementCounts {
    pub coins: u32,
    pub floor_spikes: u32,
    pub wall_spikes: u32,
    pub cocoons: u32,
}

/// A finished level and how it was made
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub map: Map,
    pub spawn: Position,
    pub goal: Position,
    /// Slides needed to reach the goal
    pub goal_steps: u32,
    /// Intended route, kept clear of hazards. Items add stop cells, so a
    /// shorter route may exist on the finished map.
    pub solution: Solution,
    pub placed: PlacementCounts,
    /// Layouts tried, including the successful one
    pub attempts: u32,
    pub fallback: Fallback,
}

impl GeneratedLevel {
    /// Row strings for the level loader
    pub fn rows(&self) -> Vec<String> {
        self.map.to_rows()
    }
}

/// Generate a level, retrying and falling back until one succeeds.
///
/// Retries the configured strategy up to `max_attempts` times, then tries
/// templates, then lowers the slide threshold to the best seen.
pub fn generate_level(
    rng: &mut StdRng,
    config: &GeneratorConfig,
) -> Result<GeneratedLevel, GenerationError> {
    config.validate()?;
    let min = config.min_slide_steps;
    let mut attempts = 0;

    let best = match retry(rng, config, config.strategy, min, &mut attempts)? {
        Ok(level) => return Ok(finish(level, attempts, Fallback::None)),
        Err(best) => best,
    };

    if config.strategy != Strategy::Template {
        log::warn!("No goal {} slides away after {} carves, trying templates", min, attempts);
        if let Ok(level) = retry(rng, config, Strategy::Template, min, &mut attempts)? {
            return Ok(finish(level, attempts, Fallback::Template));
        }
    }

    let relaxed = best.max(1);
    if relaxed < min {
        log::warn!("Relaxing slide threshold from {} to {}", min, relaxed);
        if let Ok(level) = retry(rng, config, config.strategy, relaxed, &mut attempts)? {
            let fallback = Fallback::Relaxed { requested: min, used: relaxed };
            return Ok(finish(level, attempts, fallback));
        }
    }

    Err(GenerationError::Exhausted { attempts })
}

fn finish(mut level: GeneratedLevel, attempts: u32, fallback: Fallback) -> GeneratedLevel {
    level.attempts = attempts;
    level.fallback = fallback;
    log::info!(
        "Map generated in {} attempts ({}x{}, goal {} slides away)",
        attempts, level.map.width, level.map.height, level.goal_steps
    );
    level
}

/// Up to `max_attempts` layouts; `Ok(Err(best))` if none had a goal
fn retry(
    rng: &mut StdRng,
    config: &GeneratorConfig,
    strategy: Strategy,
    min_slide_steps: u32,
    attempts: &mut u32,
) -> Result<Result<GeneratedLevel, u32>, GenerationError> {
    let mut best = 0;
    for _ in 0..config.max_attempts {
        *attempts += 1;
        match generate_once(rng, config, strategy, min_slide_steps) {
            Ok(level) => return Ok(Ok(level)),
            Err(GenerationError::GoalUnreachable { best: seen, .. }) => {
                log::debug!("Attempt {} rejected: best goal only {} slides away", attempts, seen);
                best = best.max(seen);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Err(best))
}

/// Run the pipeline once on a fresh layout
pub fn generate_once(
    rng: &mut StdRng,
    config: &GeneratorConfig,
    strategy: Strategy,
    min_slide_steps: u32,
) -> Result<GeneratedLevel, GenerationError> {
    let mut map = base_layout(rng, config, strategy)?;

    let spawn = goal::pick_spawn(&map, rng).ok_or(GenerationError::NoFloor)?;
    map.set(spawn, TileType::PlayerSpawn);
    map.spawn = Some(spawn);

    let reachable = reach(&map, spawn);
    let rules = GoalRules {
        min_slide_steps,
        step_weight: config.step_weight,
        distance_weight: config.distance_weight,
        top_k: config.goal_top_k,
    };
    let unreachable = || GenerationError::GoalUnreachable {
        required: min_slide_steps,
        best: reachable.max_steps(),
    };
    let choice = goal::pick_goal(&reachable, &rules, rng).ok_or_else(unreachable)?;
    map.set(choice.pos, TileType::Goal);
    map.goal = Some(choice.pos);

    let solution = solve(&map, spawn, choice.pos).ok_or_else(unreachable)?;

    // Spikes and cocoons stop slides, so a fill can open a shortcut to the goal
    let mut best = 0;
    for _ in 0..POPULATE_TRIES {
        let mut filled = map.clone();
        let placed = populate(&mut filled, rng, config, &solution, spawn, choice.pos);
        let steps = reach(&filled, spawn).get(choice.pos).unwrap_or(0);
        if steps >= min_slide_steps {
            return Ok(GeneratedLevel {
                map: filled,
                spawn,
                goal: choice.pos,
                goal_steps: steps,
                solution,
                placed,
                attempts: 1,
                fallback: Fallback::None,
            });
        }
        log::debug!(
            "Item fill left the goal {} slides away (layout had {})",
            steps, choice.slide_steps
        );
        best = best.max(steps);
    }

    Err(GenerationError::GoalUnreachable { required: min_slide_steps, best })
}

fn base_layout(
    rng: &mut StdRng,
    config: &GeneratorConfig,
    strategy: Strategy,
) -> Result<Map, GenerationError> {
    match strategy {
        Strategy::Carve => {
            let (width, height) = config.dimensions();
            let mut map = Map::new(width, height);
            maze::carve(&mut map, rng, CARVE_ORIGIN);
            maze::widen(&mut map, rng, config.widen_chance);
            maze::braid(&mut map, rng, config.braid_chance);
            Ok(map)
        }
        Strategy::Template => {
            let (template, map) = templates::random_template(rng, config.template_mirror)?;
            log::debug!("Using template {:?}", template.name);
            Ok(map)
        }
    }
}

/// Place coins, floor spikes, wall spikes and cocoons, in that order
fn populate(
    map: &mut Map,
    rng: &mut StdRng,
    config: &GeneratorConfig,
    solution: &Solution,
    spawn: Position,
    goal: Position,
) -> PlacementCounts {
    let zone = solution.safe_zone(spawn, goal);
    let protected = Protected { spawn, goal, zone: &zone };
    let request = |tile, spec: GroupSpec, rule| GroupRequest {
        tile,
        groups: spec.groups,
        len: spec.len,
        rule,
        max_attempts: config.placement_attempts,
    };

    let coins = placement::place_groups(
        map,
        rng,
        &request(TileType::Coin, config.coins, PlacementRule::Anywhere),
        &protected,
    );
    let floor_spikes = placement::place_groups(
        map,
        rng,
        &request(TileType::FloorSpike, config.floor_spikes, PlacementRule::AvoidZone),
        &protected,
    );
    let wall_spikes = placement::place_wall_spikes(
        map,
        rng,
        config.wall_spikes.groups,
        config.wall_spikes.len,
        &solution.impacts,
    );
    let cocoons = placement::place_groups(
        map,
        rng,
        &request(TileType::Cocoon, config.cocoons, PlacementRule::BesideZone),
        &protected,
    );

    PlacementCounts { coins, floor_spikes, wall_spikes, cocoons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Direction;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generate(seed: u64, config: &GeneratorConfig) -> GeneratedLevel {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_level(&mut rng, config).unwrap()
    }

    /// Anything but the two wall kinds; hazards can be walked onto
    fn walkable(map: &Map, pos: Position) -> bool {
        map.get(pos).map_or(false, |t| !matches!(t, TileType::Wall | TileType::WallSpike))
    }

    /// Single-step flood fill over everything a player or ghost can stand on
    fn walkable_from(map: &Map, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            for n in pos.neighbors() {
                if walkable(map, n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen
    }

    #[test]
    fn test_levels_are_connected() {
        let config = GeneratorConfig::default();
        for seed in 0..10 {
            let level = generate(seed, &config);
            let open = level.map.positions().filter(|&p| walkable(&level.map, p)).count();
            assert_eq!(walkable_from(&level.map, level.spawn).len(), open, "seed {}", seed);
        }
    }

    #[test]
    fn test_exactly_one_spawn_and_goal() {
        let config = GeneratorConfig::default();
        for seed in 0..10 {
            let level = generate(seed, &config);
            assert_eq!(level.map.count(TileType::PlayerSpawn), 1);
            assert_eq!(level.map.count(TileType::Goal), 1);
            assert_eq!(level.map.get(level.spawn), Some(TileType::PlayerSpawn));
            assert_eq!(level.map.get(level.goal), Some(TileType::Goal));
            assert_eq!(level.map.spawn, Some(level.spawn));
            assert_eq!(level.map.goal, Some(level.goal));
        }
    }

    #[test]
    fn test_border_is_wall() {
        let level = generate(3, &GeneratorConfig::default());
        let map = &level.map;
        for pos in map.positions().filter(|&p| !map.is_interior(p)) {
            assert_eq!(map.get(pos), Some(TileType::Wall));
        }
    }

    #[test]
    fn test_goal_is_far_enough_in_final_map() {
        let config = GeneratorConfig::default();
        for seed in 0..10 {
            let level = generate(seed, &config);
            assert_eq!(level.fallback, Fallback::None);
            let steps = reach(&level.map, level.spawn).get(level.goal).unwrap();
            assert_eq!(steps, level.goal_steps);
            assert!(steps >= config.min_slide_steps);
        }
    }

    #[test]
    fn test_route_is_never_hazardous() {
        let config = GeneratorConfig::default();
        for seed in 0..10 {
            let level = generate(seed, &config);
            let map = &level.map;
            for pos in level.solution.trace.iter().chain(&level.solution.stops) {
                let tile = map.get(*pos).unwrap();
                assert!(
                    !matches!(tile, TileType::FloorSpike | TileType::Cocoon),
                    "{:?} on route at {:?}",
                    tile,
                    pos
                );
            }
            for pos in &level.solution.impacts {
                assert_eq!(map.get(*pos), Some(TileType::Wall));
            }
        }
    }

    #[test]
    fn test_solution_still_replays() {
        let level = generate(17, &GeneratorConfig::default());
        let mut pos = level.spawn;
        for dir in &level.solution.moves {
            pos = crate::world::slide_stop(&level.map, pos, *dir);
        }
        assert_eq!(pos, level.goal);
    }

    #[test]
    fn test_items_are_placed() {
        let level = generate(5, &GeneratorConfig::default());
        assert!(level.placed.coins > 0);
        assert!(level.placed.floor_spikes > 0);
        assert!(level.placed.wall_spikes > 0);
        assert!(level.map.count(TileType::Coin) > 0);
        assert!(level.map.count(TileType::WallSpike) > 0);
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = GeneratorConfig::default();
        assert_eq!(generate(99, &config).rows(), generate(99, &config).rows());
    }

    #[test]
    fn test_even_dimensions_are_rounded() {
        let config = GeneratorConfig {
            width: 20,
            height: 16,
            min_slide_steps: 4,
            ..Default::default()
        };
        let level = generate(1, &config);
        assert_eq!((level.map.width, level.map.height), (21, 17));
        assert!(level.rows().iter().all(|r| r.len() == 21));
    }

    #[test]
    fn test_template_strategy() {
        let config = GeneratorConfig {
            strategy: Strategy::Template,
            min_slide_steps: 4,
            ..Default::default()
        };
        for seed in 0..5 {
            let level = generate(seed, &config);
            let (width, height) = (level.map.width, level.map.height);
            assert!(templates::TEMPLATES
                .iter()
                .any(|t| t.rows[0].len() as i32 == width && t.rows.len() as i32 == height));
            assert!(level.goal_steps >= 4);
        }
    }

    #[test]
    fn test_unreachable_threshold_terminates() {
        let config = GeneratorConfig {
            width: 5,
            height: 5,
            min_slide_steps: 100,
            max_attempts: 10,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        match generate_level(&mut rng, &config) {
            Ok(level) => {
                assert!(matches!(level.fallback, Fallback::Relaxed { requested: 100, .. }));
                assert!(level.attempts <= 30);
                assert_eq!((level.map.width, level.map.height), (5, 5));
            }
            Err(GenerationError::Exhausted { attempts }) => assert_eq!(attempts, 30),
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_single_attempt_reports_unreachable_goal() {
        let config = GeneratorConfig { width: 5, height: 5, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_once(&mut rng, &config, Strategy::Carve, 100).unwrap_err();
        assert!(matches!(err, GenerationError::GoalUnreachable { required: 100, .. }));
    }

    #[test]
    fn test_rejects_degenerate_config() {
        let config = GeneratorConfig { width: 2, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_level(&mut rng, &config),
            Err(GenerationError::Config(ConfigError::DegenerateDimensions { .. }))
        ));
    }

    #[test]
    fn test_placement_starvation_is_silent() {
        // Far more groups than a small maze can hold
        let config = GeneratorConfig {
            width: 9,
            height: 9,
            min_slide_steps: 2,
            coins: GroupSpec::new(500, 1, 1),
            floor_spikes: GroupSpec::new(500, 2, 3),
            placement_attempts: 200,
            ..Default::default()
        };
        let level = generate(4, &config);
        assert!(level.placed.coins < 500);
        assert_eq!(level.map.count(TileType::PlayerSpawn), 1);
    }

    #[test]
    fn test_slides_from_every_cell_stay_inside() {
        let level = generate(8, &GeneratorConfig::default());
        let map = &level.map;
        for pos in map.positions().filter(|&p| !map.blocks_slide(p)) {
            for dir in Direction::ALL {
                let stop = crate::world::slide_stop(map, pos, dir);
                assert!(map.is_interior(stop));
            }
        }
    }
}
