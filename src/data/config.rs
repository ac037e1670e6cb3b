//! Generator configuration
//!
//! Loaded from a RON file, with fallback to hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest odd side length that still carves a maze
pub const MIN_DIMENSION: i32 = 5;

/// Configuration errors, all caught before generation starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small (minimum {min}x{min})", min = MIN_DIMENSION)]
    DegenerateDimensions { width: i32, height: i32 },
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidChance { name: &'static str, value: f64 },
    #[error("{name} length range ({min}, {max}) is invalid")]
    InvalidRange { name: &'static str, min: u32, max: u32 },
    #[error("{name} must be at least 1")]
    Zero { name: &'static str },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Which base layout the pipeline starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Randomized depth-first carve at the configured size
    #[default]
    Carve,
    /// Hand-authored template, optionally mirrored
    Template,
}

/// Count and length range for one category of item group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Number of groups to attempt
    pub groups: u32,
    /// Inclusive (min, max) cells per group
    pub len: (u32, u32),
}

impl GroupSpec {
    pub const fn new(groups: u32, min: u32, max: u32) -> Self {
        Self { groups, len: (min, max) }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let (min, max) = self.len;
        if min == 0 || min > max {
            return Err(ConfigError::InvalidRange { name, min, max });
        }
        Ok(())
    }
}

/// All tunables for one level generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Target width; even values are bumped to the next odd one
    pub width: i32,
    /// Target height; even values are bumped to the next odd one
    pub height: i32,
    pub strategy: Strategy,
    /// Mirror templates randomly along each axis
    pub template_mirror: bool,

    /// Fraction of dead ends opened up
    pub braid_chance: f64,
    /// Per-wall chance of widening a corridor
    pub widen_chance: f64,

    /// Minimum slides from spawn to goal
    pub min_slide_steps: u32,
    /// Goal score weight per slide
    pub step_weight: u32,
    /// Goal score weight per cell of Manhattan distance
    pub distance_weight: u32,
    /// Goal is drawn uniformly from this many best-scoring cells
    pub goal_top_k: usize,
    /// Full-pipeline retries before falling back
    pub max_attempts: u32,
    /// Rejection-sampling attempts per item category
    pub placement_attempts: u32,

    pub coins: GroupSpec,
    pub floor_spikes: GroupSpec,
    pub wall_spikes: GroupSpec,
    pub cocoons: GroupSpec,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 31,
            height: 31,
            strategy: Strategy::Carve,
            template_mirror: true,
            braid_chance: 0.05,
            widen_chance: 0.4,
            min_slide_steps: 10,
            step_weight: 100,
            distance_weight: 1,
            goal_top_k: 3,
            max_attempts: 200,
            placement_attempts: 3000,
            coins: GroupSpec::new(10, 3, 5),
            floor_spikes: GroupSpec::new(12, 1, 3),
            wall_spikes: GroupSpec::new(10, 1, 1),
            cocoons: GroupSpec::new(4, 2, 3),
        }
    }
}

/// Round up to the nearest odd value
fn odd(n: i32) -> i32 {
    if n % 2 == 0 { n + 1 } else { n }
}

impl GeneratorConfig {
    /// Odd-adjusted (width, height)
    pub fn dimensions(&self) -> (i32, i32) {
        (odd(self.width), odd(self.height))
    }

    /// Reject configurations that cannot generate a level
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.dimensions();
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(ConfigError::DegenerateDimensions { width, height });
        }

        let chances = [("braid_chance", self.braid_chance), ("widen_chance", self.widen_chance)];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { name, value });
            }
        }

        if self.goal_top_k == 0 {
            return Err(ConfigError::Zero { name: "goal_top_k" });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Zero { name: "max_attempts" });
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::Zero { name: "placement_attempts" });
        }

        self.coins.validate("coins")?;
        self.floor_spikes.validate("floor_spikes")?;
        self.wall_spikes.validate("wall_spikes")?;
        self.cocoons.validate("cocoons")?;
        Ok(())
    }

    /// Parse and validate a RON config string
    pub fn from_ron(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content, path)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{}. Using default generator config.", e);
            Self::default()
        })
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Write this config as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_ron()?;
        let io_err = |source: std::io::Error| ConfigError::Io { path: path.to_path_buf(), source };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)
    }
}

/// Default location of `generator.ron`
pub fn default_config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "slidecrawl", "Slidecrawl") {
        proj_dirs.config_dir().join("generator.ron")
    } else {
        PathBuf::from("./generator.ron")
    }
}
