//! Game module - level loading and session state

pub mod level;
mod session;

pub use level::{LevelError, LevelLayout, Spawn, SpawnKind};
pub use session::Session;
