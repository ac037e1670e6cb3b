//! Session state
//!
//! Owns the generator settings and the random stream across levels, so a
//! seeded run replays the same sequence of levels.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::GeneratorConfig;
use crate::world::generation::{generate_level, GeneratedLevel, GenerationError};

use super::level::{LevelError, LevelLayout};

pub struct Session {
    config: GeneratorConfig,
    rng: StdRng,
    /// Zero-based level index
    level: u32,
    current: GeneratedLevel,
}

impl Session {
    /// Start a session and generate the first level
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> Result<Self, GenerationError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let current = generate_level(&mut rng, &config)?;
        log::info!("Session started (seed {:?})", seed);
        Ok(Self { config, rng, level: 0, current })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current(&self) -> &GeneratedLevel {
        &self.current
    }

    /// Entity list for the current level
    pub fn layout(&self) -> Result<LevelLayout, LevelError> {
        LevelLayout::from_rows(&self.current.rows())
    }

    /// Replace the current level with a fresh one at the same index
    pub fn restart(&mut self) -> Result<&GeneratedLevel, GenerationError> {
        log::info!("Restarting level {}", self.level + 1);
        self.current = generate_level(&mut self.rng, &self.config)?;
        Ok(&self.current)
    }

    /// Advance to the next level
    pub fn next_level(&mut self) -> Result<&GeneratedLevel, GenerationError> {
        let level = generate_level(&mut self.rng, &self.config)?;
        self.level += 1;
        self.current = level;
        log::info!("Entering level {}", self.level + 1);
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig { width: 15, height: 15, min_slide_steps: 4, ..Default::default() }
    }

    #[test]
    fn test_next_level_advances() {
        let mut session = Session::new(small_config(), Some(7)).unwrap();
        assert_eq!(session.level(), 0);
        session.next_level().unwrap();
        session.next_level().unwrap();
        assert_eq!(session.level(), 2);
        assert!(session.layout().is_ok());
    }

    #[test]
    fn test_restart_keeps_index() {
        let mut session = Session::new(small_config(), Some(7)).unwrap();
        session.restart().unwrap();
        assert_eq!(session.level(), 0);
        assert_eq!(session.current().map.width, 15);
    }

    #[test]
    fn test_seeded_sessions_replay() {
        let mut a = Session::new(small_config(), Some(42)).unwrap();
        let mut b = Session::new(small_config(), Some(42)).unwrap();
        assert_eq!(a.current().rows(), b.current().rows());
        let next_a = a.next_level().unwrap().rows();
        let next_b = b.next_level().unwrap().rows();
        assert_eq!(next_a, next_b);
    }

    #[test]
    fn test_bad_config_fails_to_start() {
        let config = GeneratorConfig { max_attempts: 0, ..Default::default() };
        assert!(Session::new(config, Some(1)).is_err());
    }
}
