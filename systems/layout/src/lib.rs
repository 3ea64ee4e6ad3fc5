#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stage layout system that turns a generated maze into entity placements.
//!
//! The stage loader walks every interior cell of a finished [`Grid`] once.
//! Walls become static wall placements; walls away from the outer ring may
//! additionally spawn a moving wall that drifts back and forth over the
//! neighbouring cell. The start and goal markers occupy opposite corners of
//! the guaranteed corridor and swap sides whenever the course is reversed.

use maze_stage_core::{CellCoord, CellState, Direction, Grid};
use rand::Rng;
use thiserror::Error;

/// Probability that an inner wall also spawns a moving wall.
pub const DEFAULT_MOVING_WALL_CHANCE: f64 = 0.5;

/// Errors raised when layout tuning values fall outside their valid range.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LayoutError {
    /// The moving wall chance is a probability and must lie within `0.0..=1.0`.
    #[error("moving wall chance {0} must lie within 0.0..=1.0")]
    InvalidChance(f64),
}

/// Tuning knobs for stage layout planning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutTuning {
    moving_wall_chance: f64,
}

impl LayoutTuning {
    /// Creates a tuning surface, validating the moving wall probability.
    pub fn new(moving_wall_chance: f64) -> Result<Self, LayoutError> {
        if !(0.0..=1.0).contains(&moving_wall_chance) {
            return Err(LayoutError::InvalidChance(moving_wall_chance));
        }

        Ok(Self { moving_wall_chance })
    }

    /// Probability that an inner wall also spawns a moving wall.
    #[must_use]
    pub const fn moving_wall_chance(&self) -> f64 {
        self.moving_wall_chance
    }
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            moving_wall_chance: DEFAULT_MOVING_WALL_CHANCE,
        }
    }
}

/// Orientation of the stage between the two corridor corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Course {
    /// Start at the far corner `(width, height)`, finish at `(1, 1)`.
    #[default]
    Forward,
    /// Start at `(1, 1)`, finish at the far corner.
    Reverse,
}

impl Course {
    /// Course used for the stage following a cleared one.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Starting point of a moving wall's back-and-forth cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The wall starts on its home cell.
    Rest,
    /// The wall starts fully displaced onto the neighbouring cell.
    Extended,
}

/// Static wall occupying a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallPlacement {
    /// Cell covered by the wall.
    pub cell: CellCoord,
}

/// Wall that oscillates between its home cell and one neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MovingWallPlacement {
    /// Home cell of the wall.
    pub cell: CellCoord,
    /// Direction the wall drifts toward.
    pub drift: Direction,
    /// Where in the cycle the wall starts.
    pub phase: Phase,
}

/// Entity placements derived from one generated maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageLayout {
    walls: Vec<WallPlacement>,
    moving_walls: Vec<MovingWallPlacement>,
    start: CellCoord,
    goal: CellCoord,
    course: Course,
}

impl StageLayout {
    /// Plans wall, moving wall, start and goal placements for `grid`.
    ///
    /// Cells are visited column by column. Every wall rolls for a moving
    /// companion, but only walls that do not touch the outer ring keep it.
    pub fn plan<R>(grid: &Grid, tuning: &LayoutTuning, course: Course, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut walls = Vec::new();
        let mut moving_walls = Vec::new();

        for cell in grid.interior_cells() {
            if grid.cell(cell) != CellState::Wall {
                continue;
            }
            walls.push(WallPlacement { cell });

            if rng.gen_bool(tuning.moving_wall_chance) && is_inner(grid, cell) {
                let drift = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                let phase = if rng.gen_bool(0.5) {
                    Phase::Rest
                } else {
                    Phase::Extended
                };
                moving_walls.push(MovingWallPlacement { cell, drift, phase });
            }
        }

        let (start, goal) = match course {
            Course::Forward => (grid.goal(), grid.start()),
            Course::Reverse => (grid.start(), grid.goal()),
        };

        Self {
            walls,
            moving_walls,
            start,
            goal,
            course,
        }
    }

    /// Static walls in placement order.
    #[must_use]
    pub fn walls(&self) -> &[WallPlacement] {
        &self.walls
    }

    /// Moving walls in placement order.
    #[must_use]
    pub fn moving_walls(&self) -> &[MovingWallPlacement] {
        &self.moving_walls
    }

    /// Cell holding the start marker.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell holding the goal marker.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Course the layout was planned for.
    #[must_use]
    pub const fn course(&self) -> Course {
        self.course
    }
}

fn is_inner(grid: &Grid, cell: CellCoord) -> bool {
    1 < cell.x() && cell.x() < grid.width() && 1 < cell.y() && cell.y() < grid.height()
}
