//! Breadth-first road distance field used to confirm corridor connectivity.

use std::collections::VecDeque;

use crate::{CellCoord, Direction, Grid};

/// Dense step-distance grid seeded from a single road cell.
///
/// The field mirrors the grid storage, sentinel ring included, and stores the
/// breadth-first search results over orthogonally adjacent road cells.
/// Cells that are not roads, or roads that are cut off from the source, keep
/// the `u32::MAX` marker.
#[derive(Clone, Debug)]
pub struct RoadDistances {
    stride: usize,
    distances: Vec<u32>,
    reached: usize,
}

impl RoadDistances {
    /// Runs the breadth-first search from `source` over the grid's roads.
    ///
    /// A source that is not a road yields an empty field.
    #[must_use]
    pub fn from_source(grid: &Grid, source: CellCoord) -> Self {
        let stride = grid.width() as usize + 2;
        let rows = grid.height() as usize + 2;
        let mut field = Self {
            stride,
            distances: vec![u32::MAX; stride * rows],
            reached: 0,
        };

        if !grid.is_interior(source.x(), source.y()) || !grid.cell(source).is_road() {
            return field;
        }

        let mut queue = VecDeque::new();
        let source_index = field.index(source);
        field.distances[source_index] = 0;
        field.reached = 1;
        queue.push_back(source);

        while let Some(cell) = queue.pop_front() {
            let next_distance = field.distances[field.index(cell)] + 1;

            for direction in Direction::ALL {
                // The sentinel ring is never a road, so stepping off an
                // interior cell always stays inside the storage.
                let neighbor = cell.step(direction);
                if !grid.cell(neighbor).is_road() {
                    continue;
                }

                let index = field.index(neighbor);
                if field.distances[index] != u32::MAX {
                    continue;
                }

                field.distances[index] = next_distance;
                field.reached += 1;
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Step distance from the source to `cell`, if the cell was reached.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        let x = cell.x() as usize;
        if x >= self.stride {
            return None;
        }
        let index = (cell.y() as usize).checked_mul(self.stride)?.checked_add(x)?;
        self.distances
            .get(index)
            .copied()
            .filter(|&distance| distance != u32::MAX)
    }

    /// Reports whether the search reached `cell`.
    #[must_use]
    pub fn reaches(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }

    /// Number of road cells reached, the source included.
    #[must_use]
    pub const fn reached_count(&self) -> usize {
        self.reached
    }

    fn index(&self, cell: CellCoord) -> usize {
        cell.y() as usize * self.stride + cell.x() as usize
    }
}
