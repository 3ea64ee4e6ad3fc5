#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a maze stage and prints it as text.

mod config;
mod verify;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use maze_stage_core::Grid;
use maze_stage_system_generation::MazeGenerator;
use maze_stage_system_layout::StageLayout;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::StageConfig;

/// Text rendering used for the generated grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    /// Interior only, one symbol per cell state.
    Debug,
    /// Like `debug`, with the sentinel ring included.
    Bordered,
    /// Roads as `#`, everything else as `.`.
    Plain,
}

#[derive(Debug, Parser)]
#[command(name = "maze-stage", version, about = "Generates maze stages and prints them as text")]
struct Cli {
    /// TOML file providing stage settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of interior columns.
    #[arg(long)]
    width: Option<u32>,
    /// Number of interior rows.
    #[arg(long)]
    height: Option<u32>,
    /// Branch attempts made after the guaranteed corridor.
    #[arg(long = "branches")]
    branch_count: Option<u32>,
    /// Probability that a carving walk keeps its heading.
    #[arg(long)]
    straightness: Option<f64>,
    /// Seed for reproducible mazes.
    #[arg(long)]
    seed: Option<u64>,
    /// Probability that an inner wall also spawns a moving wall.
    #[arg(long)]
    moving_wall_chance: Option<f64>,
    /// Start at (1, 1) and finish in the far corner.
    #[arg(long)]
    reverse: bool,
    /// Output format for the grid.
    #[arg(long, value_enum, default_value_t = DumpFormat::Debug)]
    format: DumpFormat,
    /// Print the planned entity placements after the grid.
    #[arg(long)]
    layout: bool,
    /// Check the maze invariants and fail if any is violated.
    #[arg(long)]
    verify: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut StageConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(branch_count) = self.branch_count {
            config.branch_count = branch_count;
        }
        if let Some(straightness) = self.straightness {
            config.straightness = straightness;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(chance) = self.moving_wall_chance {
            config.moving_wall_chance = chance;
        }
        config.reverse |= self.reverse;
    }
}

/// Entry point for the Maze Stage command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => StageConfig::load(path)?,
        None => StageConfig::default(),
    };
    cli.apply(&mut config);

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("generating {}x{} stage with seed {seed}", config.width, config.height);

    let generator = MazeGenerator::new(config.generation_tuning()?);
    let layout_tuning = config.layout_tuning()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (grid, report) = generator
        .generate_with_report(config.width, config.height, &mut rng)
        .context("failed to generate maze")?;
    info!(
        "carved {} branches ({} skipped), {} road cells",
        report.branches_carved, report.branches_skipped, report.road_cells
    );

    print!("{}", render(&grid, cli.format));

    if cli.layout {
        let layout = StageLayout::plan(&grid, &layout_tuning, config.course(), &mut rng);
        println!("start {}", layout.start());
        println!("goal {}", layout.goal());
        println!("walls {}", layout.walls().len());
        println!("moving walls {}", layout.moving_walls().len());
    }

    if cli.verify {
        verify::verify(&grid).context("maze failed verification")?;
        info!("maze verified");
    }

    Ok(())
}

fn render(grid: &Grid, format: DumpFormat) -> String {
    match format {
        DumpFormat::Debug => grid.debug_dump(),
        DumpFormat::Bordered => grid.debug_dump_with_border(),
        DumpFormat::Plain => grid.plain_dump(),
    }
}
