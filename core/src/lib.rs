#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Stage workspace.
//!
//! This crate defines the grid data model that connects the generator system,
//! the stage layout system, and the adapters. The generator writes
//! [`CellState`] values into a [`Grid`] while it carves corridors; once
//! generation returns the grid is treated as read-only and queried cell by
//! cell to place stage entities.
//!
//! The grid surrounds its interior with a one-cell sentinel ring of
//! [`CellState::OutOfBoard`] cells, so every neighbour lookup performed from
//! an interior cell stays inside the backing storage.

use std::fmt;

use thiserror::Error;

mod navigation;

pub use navigation::RoadDistances;

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Sentinel border cell. Never overwritten.
    OutOfBoard,
    /// Interior cell that has not been classified yet.
    Undefined,
    /// Walkable corridor cell.
    Road,
    /// Impassable cell.
    Wall,
}

impl CellState {
    /// Character used for the cell in debug dumps.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::OutOfBoard => '?',
            Self::Undefined => '.',
            Self::Road => '#',
            Self::Wall => '*',
        }
    }

    /// Reports whether the cell is part of a corridor.
    #[must_use]
    pub const fn is_road(self) -> bool {
        matches!(self, Self::Road)
    }
}

/// Orthogonal directions used when walking the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction, in the order used when scanning for branch candidates.
    pub const ALL: [Direction; 4] = [Self::East, Self::South, Self::West, Self::North];

    /// Column and row delta applied by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Reports whether the direction moves along the column axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates include the sentinel ring, so the interior spans
/// `1..=width` columns and `1..=height` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Coordinate displaced by the provided column and row deltas.
    ///
    /// Wraps on underflow; the resulting coordinate then lies outside every
    /// grid and [`Grid::get`] rejects it.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add_signed(dx),
            y: self.y.wrapping_add_signed(dy),
        }
    }

    /// Neighbouring coordinate one step away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Errors raised while allocating a grid.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The requested interior is empty or too large to address.
    #[error("invalid maze dimensions {width}x{height}")]
    InvalidDimension {
        /// Requested number of interior columns.
        width: u32,
        /// Requested number of interior rows.
        height: u32,
    },
}

/// Dense cell classification over a rectangular interior with a sentinel ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    stride: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Allocates a grid whose interior spans `width` x `height` cells.
    ///
    /// Border cells start as [`CellState::OutOfBoard`], interior cells as
    /// [`CellState::Undefined`].
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimension { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }

        let stride = usize::try_from(width)
            .ok()
            .and_then(|width| width.checked_add(2))
            .ok_or(invalid)?;
        let rows = usize::try_from(height)
            .ok()
            .and_then(|height| height.checked_add(2))
            .ok_or(invalid)?;
        let count = stride.checked_mul(rows).ok_or(invalid)?;
        // The sentinel ring must stay addressable through `u32` coordinates.
        if width.checked_add(1).is_none() || height.checked_add(1).is_none() {
            return Err(invalid);
        }

        let mut grid = Self {
            width,
            height,
            stride,
            cells: vec![CellState::Undefined; count],
        };

        for x in 0..=width + 1 {
            grid.write(x, 0, CellState::OutOfBoard);
            grid.write(x, height + 1, CellState::OutOfBoard);
        }
        for y in 0..=height + 1 {
            grid.write(0, y, CellState::OutOfBoard);
            grid.write(width + 1, y, CellState::OutOfBoard);
        }

        Ok(grid)
    }

    /// Number of interior columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of interior rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell where the guaranteed corridor begins.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Cell where the guaranteed corridor ends.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        CellCoord::new(self.width, self.height)
    }

    /// Returns the state stored at the provided coordinate.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside `[0, width+1] x [0, height+1]`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> CellState {
        self.cells[self.index(x, y)]
    }

    /// Returns the state stored at the provided cell.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> CellState {
        self.get(cell.x(), cell.y())
    }

    /// Overwrites the state stored at an interior coordinate.
    ///
    /// The sentinel ring is never a valid target.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside the backing storage.
    pub fn set(&mut self, x: u32, y: u32, state: CellState) {
        debug_assert!(
            self.is_interior(x, y),
            "attempted to overwrite border cell ({x}, {y})"
        );
        self.write(x, y, state);
    }

    /// Overwrites the state stored at an interior cell.
    pub fn set_cell(&mut self, cell: CellCoord, state: CellState) {
        self.set(cell.x(), cell.y(), state);
    }

    /// Reports whether the coordinate lies inside the playable interior.
    #[must_use]
    pub const fn is_interior(&self, x: u32, y: u32) -> bool {
        x >= 1 && x <= self.width && y >= 1 && y <= self.height
    }

    /// Iterates over interior coordinates, column by column.
    pub fn interior_cells(&self) -> impl Iterator<Item = CellCoord> {
        let height = self.height;
        (1..=self.width).flat_map(move |x| (1..=height).map(move |y| CellCoord::new(x, y)))
    }

    /// Number of interior cells currently holding `state`.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.interior_cells()
            .filter(|&cell| self.cell(cell) == state)
            .count()
    }

    /// Road cells that cannot be reached from `source` through orthogonal road steps.
    #[must_use]
    pub fn unreachable_roads(&self, source: CellCoord) -> Vec<CellCoord> {
        let distances = RoadDistances::from_source(self, source);
        self.interior_cells()
            .filter(|&cell| self.cell(cell).is_road() && !distances.reaches(cell))
            .collect()
    }

    /// Renders the interior one row per line using [`CellState::symbol`].
    #[must_use]
    pub fn debug_dump(&self) -> String {
        self.render(1..=self.width, 1..=self.height, CellState::symbol)
    }

    /// Renders the whole storage, sentinel ring included.
    #[must_use]
    pub fn debug_dump_with_border(&self) -> String {
        self.render(0..=self.width + 1, 0..=self.height + 1, CellState::symbol)
    }

    /// Renders the interior showing only corridors: `#` for roads, `.` otherwise.
    #[must_use]
    pub fn plain_dump(&self) -> String {
        self.render(1..=self.width, 1..=self.height, |state| {
            if state.is_road() {
                '#'
            } else {
                '.'
            }
        })
    }

    fn render(
        &self,
        columns: std::ops::RangeInclusive<u32>,
        rows: std::ops::RangeInclusive<u32>,
        symbol: impl Fn(CellState) -> char,
    ) -> String {
        let mut out = String::new();
        for y in rows {
            for x in columns.clone() {
                out.push(symbol(self.get(x, y)));
            }
            out.push('\n');
        }
        out
    }

    fn write(&mut self, x: u32, y: u32, state: CellState) {
        let index = self.index(x, y);
        self.cells[index] = state;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x <= self.width + 1 && y <= self.height + 1,
            "cell ({x}, {y}) lies outside a {}x{} grid",
            self.width,
            self.height
        );
        y as usize * self.stride + x as usize
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_dump())
    }
}
