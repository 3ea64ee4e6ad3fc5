//! Post-generation structural checks behind the `--verify` flag.

use anyhow::{bail, Result};
use maze_stage_core::{CellState, Grid};

/// Confirms that a finished grid satisfies the maze invariants.
///
/// Checks the sentinel ring, the absence of undefined cells, that start and
/// goal are roads, that every road is reachable from the start, and that no
/// 2x2 block is made entirely of roads.
pub(crate) fn verify(grid: &Grid) -> Result<()> {
    let (width, height) = (grid.width(), grid.height());

    for x in 0..=width + 1 {
        for y in [0, height + 1] {
            if grid.get(x, y) != CellState::OutOfBoard {
                bail!("border cell ({x}, {y}) was overwritten");
            }
        }
    }
    for y in 0..=height + 1 {
        for x in [0, width + 1] {
            if grid.get(x, y) != CellState::OutOfBoard {
                bail!("border cell ({x}, {y}) was overwritten");
            }
        }
    }

    let undefined = grid.count(CellState::Undefined);
    if undefined > 0 {
        bail!("{undefined} interior cells are still undefined");
    }

    for (label, cell) in [("start", grid.start()), ("goal", grid.goal())] {
        if !grid.cell(cell).is_road() {
            bail!("{label} cell {cell} is not a road");
        }
    }

    let unreachable = grid.unreachable_roads(grid.start());
    if let Some(first) = unreachable.first() {
        bail!(
            "{} road cells are unreachable from the start, first at {first}",
            unreachable.len()
        );
    }

    for x in 1..width {
        for y in 1..height {
            let square = [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)];
            if square.iter().all(|&(x, y)| grid.get(x, y).is_road()) {
                bail!("roads form a 2x2 block at ({x}, {y})");
            }
        }
    }

    Ok(())
}
