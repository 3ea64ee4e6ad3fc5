#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation system.
//!
//! Generation runs in four passes over a freshly allocated [`Grid`]:
//!
//! 1. [`MazeGenerator::assure_reachability`] carves one monotonic corridor
//!    from the start cell `(1, 1)` to the goal cell `(width, height)`.
//! 2. [`MazeGenerator::create_branch`] is invoked once per requested branch
//!    and carves a random corridor out of an existing road.
//! 3. [`fill_corners_around`] runs after every single cell becomes a road and
//!    walls off any undefined cell pinched between two perpendicular roads.
//! 4. [`fill_blank`] turns every remaining undefined cell into a wall.
//!
//! All randomness is drawn from the caller-provided [`Rng`], so a seeded
//! generator reproduces the same maze.

use log::{debug, trace};
use maze_stage_core::{CellCoord, CellState, Direction, Grid, GridError};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

/// Probability that a carving walk keeps its current heading.
pub const STRAIGHTNESS: f64 = 0.75;

/// Number of branches carved per stage by default.
pub const DEFAULT_BRANCH_COUNT: u32 = 40;

/// Neighbour offsets inspected by the corner-fill rule, in scan order.
const CORNER_SCAN: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Errors raised when tuning values fall outside their valid range.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum TuningError {
    /// Straightness is a probability and must lie within `0.0..=1.0`.
    #[error("straightness {0} must lie within 0.0..=1.0")]
    InvalidStraightness(f64),
}

/// Outcome of a branch attempt that could not carve anything.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BranchError {
    /// No road cell borders undefined territory; the maze is saturated.
    #[error("no road cell borders undefined territory")]
    NoCandidate,
}

/// Tuning knobs controlling the shape and density of generated mazes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationTuning {
    straightness: f64,
    branch_count: u32,
}

impl GenerationTuning {
    /// Creates a tuning surface, validating the straightness probability.
    pub fn new(straightness: f64, branch_count: u32) -> Result<Self, TuningError> {
        if !(0.0..=1.0).contains(&straightness) {
            return Err(TuningError::InvalidStraightness(straightness));
        }

        Ok(Self {
            straightness,
            branch_count,
        })
    }

    /// Probability that a carving walk continues straight.
    #[must_use]
    pub const fn straightness(&self) -> f64 {
        self.straightness
    }

    /// Number of branch attempts made after the guaranteed corridor.
    #[must_use]
    pub const fn branch_count(&self) -> u32 {
        self.branch_count
    }
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            straightness: STRAIGHTNESS,
            branch_count: DEFAULT_BRANCH_COUNT,
        }
    }
}

/// Road cell bordering undefined territory, paired with the direction to dig.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchCandidate {
    /// Existing road cell the branch grows out of.
    pub origin: CellCoord,
    /// Direction from the origin into the undefined cell.
    pub direction: Direction,
}

/// Summary of a completed generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Branches that carved at least one cell.
    pub branches_carved: u32,
    /// Branch attempts dropped because the maze was saturated.
    pub branches_skipped: u32,
    /// Road cells in the finished grid.
    pub road_cells: usize,
}

/// Maze generator parameterised by a [`GenerationTuning`].
#[derive(Clone, Debug, Default)]
pub struct MazeGenerator {
    tuning: GenerationTuning,
}

impl MazeGenerator {
    /// Creates a generator with the provided tuning.
    #[must_use]
    pub const fn new(tuning: GenerationTuning) -> Self {
        Self { tuning }
    }

    /// Tuning applied by this generator.
    #[must_use]
    pub const fn tuning(&self) -> &GenerationTuning {
        &self.tuning
    }

    /// Generates a complete maze with a `width` x `height` interior.
    pub fn generate<R>(&self, width: u32, height: u32, rng: &mut R) -> Result<Grid, GridError>
    where
        R: Rng + ?Sized,
    {
        self.generate_with_report(width, height, rng)
            .map(|(grid, _)| grid)
    }

    /// Generates a complete maze and reports how the branch pass went.
    pub fn generate_with_report<R>(
        &self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> Result<(Grid, GenerationReport), GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::new(width, height)?;
        let mut report = GenerationReport::default();

        self.assure_reachability(&mut grid, rng);

        for attempt in 0..self.tuning.branch_count {
            match self.create_branch(&mut grid, rng) {
                Ok(carved) => {
                    trace!("branch {attempt} carved {carved} cells");
                    report.branches_carved += 1;
                }
                Err(BranchError::NoCandidate) => {
                    // A saturated grid stays saturated, so the remaining
                    // attempts cannot carve anything either.
                    report.branches_skipped = self.tuning.branch_count - attempt;
                    debug!(
                        "maze saturated after {attempt} branches; skipping {} attempts",
                        report.branches_skipped
                    );
                    break;
                }
            }
        }

        fill_blank(&mut grid);
        report.road_cells = grid.count(CellState::Road);
        debug!(
            "generated {width}x{height} maze with {} road cells",
            report.road_cells
        );

        Ok((grid, report))
    }

    /// Carves the guaranteed corridor from the start cell to the goal cell.
    ///
    /// The walk only ever moves toward increasing columns or rows, keeps its
    /// preferred axis with probability `straightness`, and is forced along
    /// the remaining axis once it reaches the far edge of the other.
    pub fn assure_reachability<R>(&self, grid: &mut Grid, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let goal = grid.goal();
        let mut prefer_rows = rng.gen_bool(0.5);
        let mut position = grid.start();
        grid.set_cell(position, CellState::Road);

        while position != goal {
            position = if position.x() == goal.x() {
                position.step(Direction::South)
            } else if position.y() == goal.y() {
                position.step(Direction::East)
            } else {
                let next = if prefer_rows {
                    position.step(Direction::South)
                } else {
                    position.step(Direction::East)
                };
                if rng.gen_bool(1.0 - self.tuning.straightness) {
                    prefer_rows = !prefer_rows;
                }
                next
            };

            grid.set_cell(position, CellState::Road);
            fill_corners_around(grid, position);
        }
    }

    /// Carves one additional corridor out of a random road cell.
    ///
    /// Returns the number of cells turned into roads. The walk stops as soon
    /// as it reaches a cell that is no longer undefined.
    pub fn create_branch<R>(&self, grid: &mut Grid, rng: &mut R) -> Result<usize, BranchError>
    where
        R: Rng + ?Sized,
    {
        let candidates = branch_candidates(grid);
        let start = *candidates.choose(rng).ok_or(BranchError::NoCandidate)?;

        let mut direction = start.direction;
        let mut position = start.origin.step(direction);
        let mut carved = 0;

        while grid.cell(position) == CellState::Undefined {
            grid.set_cell(position, CellState::Road);
            fill_corners_around(grid, position);
            carved += 1;

            if rng.gen_bool(1.0 - self.tuning.straightness) {
                direction = random_direction(rng);
            }
            position = position.step(direction);
        }

        trace!(
            "branch from {} heading {:?} carved {carved} cells",
            start.origin,
            start.direction
        );
        Ok(carved)
    }
}

/// Generates a maze using the default straightness and `branch_count` branches.
pub fn generate<R>(
    width: u32,
    height: u32,
    branch_count: u32,
    rng: &mut R,
) -> Result<Grid, GridError>
where
    R: Rng + ?Sized,
{
    let tuning = GenerationTuning {
        straightness: STRAIGHTNESS,
        branch_count,
    };
    MazeGenerator::new(tuning).generate(width, height, rng)
}

/// Walls off every undefined neighbour of `cell` that sits in the corner of an L of roads.
pub fn fill_corners_around(grid: &mut Grid, cell: CellCoord) {
    for (dx, dy) in CORNER_SCAN {
        let neighbor = cell.offset(dx, dy);
        if is_corner(grid, neighbor) {
            grid.set_cell(neighbor, CellState::Wall);
        }
    }
}

/// Reports whether `cell` is undefined and has a road above or below it as
/// well as a road to its left or right.
///
/// Border cells are never corners, so their own neighbours are never read.
#[must_use]
pub fn is_corner(grid: &Grid, cell: CellCoord) -> bool {
    if grid.cell(cell) != CellState::Undefined {
        return false;
    }

    let road = |direction| grid.cell(cell.step(direction)).is_road();
    let vertical = road(Direction::North) || road(Direction::South);
    let horizontal = road(Direction::East) || road(Direction::West);
    vertical && horizontal
}

/// Enumerates every road cell that borders an undefined cell, per direction.
///
/// Candidates are listed column by column, then row by row, then in
/// [`Direction::ALL`] order.
#[must_use]
pub fn branch_candidates(grid: &Grid) -> Vec<BranchCandidate> {
    grid.interior_cells()
        .filter(|&origin| grid.cell(origin).is_road())
        .flat_map(|origin| {
            Direction::ALL
                .into_iter()
                .map(move |direction| BranchCandidate { origin, direction })
        })
        .filter(|candidate| {
            grid.cell(candidate.origin.step(candidate.direction)) == CellState::Undefined
        })
        .collect()
}

/// Turns every undefined interior cell into a wall.
pub fn fill_blank(grid: &mut Grid) {
    let blanks: Vec<CellCoord> = grid
        .interior_cells()
        .filter(|&cell| grid.cell(cell) == CellState::Undefined)
        .collect();
    for cell in blanks {
        grid.set_cell(cell, CellState::Wall);
    }
}

fn random_direction<R>(rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    if rng.gen_bool(0.5) {
        if rng.gen_bool(0.5) {
            Direction::East
        } else {
            Direction::West
        }
    } else if rng.gen_bool(0.5) {
        Direction::South
    } else {
        Direction::North
    }
}
