//! Stage configuration loaded from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_stage_system_generation::{GenerationTuning, DEFAULT_BRANCH_COUNT, STRAIGHTNESS};
use maze_stage_system_layout::{Course, LayoutTuning, DEFAULT_MOVING_WALL_CHANCE};
use serde::Deserialize;

const DEFAULT_WIDTH: u32 = 20;
const DEFAULT_HEIGHT: u32 = 15;

/// Settings that drive a single stage generation run.
///
/// Every key is optional in the file; missing keys keep their defaults and
/// command-line flags are applied on top.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StageConfig {
    /// Number of interior columns.
    pub(crate) width: u32,
    /// Number of interior rows.
    pub(crate) height: u32,
    /// Branch attempts made after the guaranteed corridor.
    pub(crate) branch_count: u32,
    /// Probability that a carving walk keeps its heading.
    pub(crate) straightness: f64,
    /// Seed for the maze RNG; drawn from entropy when absent.
    pub(crate) seed: Option<u64>,
    /// Probability that an inner wall also spawns a moving wall.
    pub(crate) moving_wall_chance: f64,
    /// Places the start marker at `(1, 1)` instead of the far corner.
    pub(crate) reverse: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            branch_count: DEFAULT_BRANCH_COUNT,
            straightness: STRAIGHTNESS,
            seed: None,
            moving_wall_chance: DEFAULT_MOVING_WALL_CHANCE,
            reverse: false,
        }
    }
}

impl StageConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read stage config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid stage config at {}", path.display()))
    }

    /// Parses configuration from TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse stage config toml contents")
    }

    /// Generation tuning derived from the configured values.
    pub(crate) fn generation_tuning(&self) -> Result<GenerationTuning> {
        GenerationTuning::new(self.straightness, self.branch_count)
            .context("invalid generation settings")
    }

    /// Layout tuning derived from the configured values.
    pub(crate) fn layout_tuning(&self) -> Result<LayoutTuning> {
        LayoutTuning::new(self.moving_wall_chance).context("invalid layout settings")
    }

    /// Course requested for the stage.
    pub(crate) fn course(&self) -> Course {
        if self.reverse {
            Course::Reverse
        } else {
            Course::Forward
        }
    }
}
