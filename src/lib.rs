//! Slidecrawl - sliding-puzzle dungeon generator
//!
//! Every move slides until something stops it. Levels are carved or picked
//! from templates, checked for a goal far enough away in slides, then filled
//! with coins and hazards that leave the intended route clear.

pub mod data;
pub mod game;
pub mod world;

// Re-export commonly used types
pub use data::GeneratorConfig;
pub use game::{LevelLayout, Session};
pub use world::generation::{generate_level, GeneratedLevel, GenerationError};
pub use world::map::Map;
