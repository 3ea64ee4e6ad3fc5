use maze_stage_core::{CellCoord, CellState, Direction, Grid, GridError, RoadDistances};
use maze_stage_system_generation::{
    branch_candidates, fill_blank, generate, is_corner, BranchError, GenerationTuning,
    MazeGenerator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SIZES: [(u32, u32); 6] = [(1, 1), (1, 6), (6, 1), (5, 5), (20, 15), (33, 9)];

fn assert_border_intact(grid: &Grid) {
    for x in 0..=grid.width() + 1 {
        assert_eq!(grid.get(x, 0), CellState::OutOfBoard);
        assert_eq!(grid.get(x, grid.height() + 1), CellState::OutOfBoard);
    }
    for y in 0..=grid.height() + 1 {
        assert_eq!(grid.get(0, y), CellState::OutOfBoard);
        assert_eq!(grid.get(grid.width() + 1, y), CellState::OutOfBoard);
    }
}

fn assert_no_pending_corners(grid: &Grid, context: &str) {
    for cell in grid.interior_cells() {
        assert!(
            !is_corner(grid, cell),
            "{context}: undefined cell {cell} is pinched between roads\n{}",
            grid.debug_dump()
        );
    }
}

fn assert_no_road_squares(grid: &Grid) {
    for x in 1..grid.width() {
        for y in 1..grid.height() {
            let square = [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)];
            assert!(
                !square.iter().all(|&(x, y)| grid.get(x, y).is_road()),
                "2x2 road block at ({x}, {y})\n{}",
                grid.debug_dump()
            );
        }
    }
}

#[test]
fn generated_grids_keep_border_and_leave_nothing_undefined() {
    for seed in 0..16 {
        for (width, height) in SIZES {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(width, height, 40, &mut rng).expect("valid dimensions");

            assert_eq!(grid.width(), width);
            assert_eq!(grid.height(), height);
            assert_border_intact(&grid);
            assert_eq!(
                grid.count(CellState::Undefined),
                0,
                "seed {seed} left undefined cells\n{}",
                grid.debug_dump()
            );
        }
    }
}

#[test]
fn every_road_is_reachable_from_the_start() {
    for seed in 0..16 {
        for (width, height) in SIZES {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = generate(width, height, 40, &mut rng).expect("valid dimensions");

            assert_eq!(grid.cell(grid.start()), CellState::Road);
            assert_eq!(grid.cell(grid.goal()), CellState::Road);

            let distances = RoadDistances::from_source(&grid, grid.start());
            assert!(distances.reaches(grid.goal()), "goal unreachable for seed {seed}");
            assert_eq!(distances.reached_count(), grid.count(CellState::Road));
            assert!(grid.unreachable_roads(grid.start()).is_empty());
        }
    }
}

#[test]
fn corner_rule_holds_throughout_generation() {
    let generator = MazeGenerator::default();

    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(18, 12).expect("grid");

        generator.assure_reachability(&mut grid, &mut rng);
        assert_no_pending_corners(&grid, "after reachability");

        for branch in 0..40 {
            if generator.create_branch(&mut grid, &mut rng).is_err() {
                break;
            }
            assert_no_pending_corners(&grid, &format!("after branch {branch}"));
        }

        fill_blank(&mut grid);
        assert_no_road_squares(&grid);
    }
}

#[test]
fn branches_never_overwrite_walls() {
    let generator = MazeGenerator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut grid = Grid::new(16, 16).expect("grid");
    generator.assure_reachability(&mut grid, &mut rng);

    for _ in 0..40 {
        let walls: Vec<CellCoord> = grid
            .interior_cells()
            .filter(|&cell| grid.cell(cell) == CellState::Wall)
            .collect();
        if generator.create_branch(&mut grid, &mut rng).is_err() {
            break;
        }
        for cell in walls {
            assert_eq!(grid.cell(cell), CellState::Wall, "wall at {cell} was carved");
        }
    }
}

#[test]
fn reachability_corridor_is_monotonic() {
    let generator = MazeGenerator::default();

    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(12, 9).expect("grid");
        generator.assure_reachability(&mut grid, &mut rng);

        let roads: Vec<CellCoord> = grid
            .interior_cells()
            .filter(|&cell| grid.cell(cell).is_road())
            .collect();
        assert_eq!(roads.len(), 12 + 9 - 1, "corridor length for seed {seed}");

        let mut cell = grid.start();
        while cell != grid.goal() {
            let east = cell.step(Direction::East);
            let south = cell.step(Direction::South);
            let east_road = grid.cell(east).is_road();
            let south_road = grid.cell(south).is_road();
            assert!(
                east_road ^ south_road,
                "corridor forks or stalls at {cell} for seed {seed}"
            );
            cell = if east_road { east } else { south };
        }
    }
}

#[test]
fn fill_blank_twice_matches_once() {
    let generator = MazeGenerator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut grid = Grid::new(10, 10).expect("grid");
    generator.assure_reachability(&mut grid, &mut rng);
    let _ = generator.create_branch(&mut grid, &mut rng);

    fill_blank(&mut grid);
    let once = grid.clone();
    fill_blank(&mut grid);

    assert_eq!(grid, once);
}

#[test]
fn same_seed_produces_same_grid() {
    let first = generate(24, 16, 40, &mut ChaCha8Rng::seed_from_u64(0xfeed)).expect("grid");
    let second = generate(24, 16, 40, &mut ChaCha8Rng::seed_from_u64(0xfeed)).expect("grid");

    assert_eq!(first, second);
    assert_eq!(first.debug_dump(), second.debug_dump());
}

#[test]
fn zero_branches_leaves_only_the_corridor() {
    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generate(5, 5, 0, &mut rng).expect("grid");

        assert_eq!(grid.count(CellState::Road), 9);
        assert_eq!(grid.count(CellState::Wall), 25 - 9);
        assert!(RoadDistances::from_source(&grid, grid.start()).reaches(grid.goal()));
    }
}

#[test]
fn single_cell_maze_is_one_road() {
    let generator = MazeGenerator::new(GenerationTuning::new(0.75, 40).expect("tuning"));
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let (grid, report) = generator
        .generate_with_report(1, 1, &mut rng)
        .expect("grid");

    assert_eq!(grid.debug_dump_with_border(), "???\n?#?\n???\n");
    assert_eq!(report.branches_carved, 0);
    assert_eq!(report.branches_skipped, 40);
    assert_eq!(report.road_cells, 1);
}

#[test]
fn saturated_grid_signals_no_candidate_repeatedly() {
    let generator = MazeGenerator::default();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut grid = Grid::new(7, 7).expect("grid");
    generator.assure_reachability(&mut grid, &mut rng);

    while generator.create_branch(&mut grid, &mut rng).is_ok() {}

    assert!(branch_candidates(&grid).is_empty());
    let snapshot = grid.clone();
    for _ in 0..3 {
        assert_eq!(
            generator.create_branch(&mut grid, &mut rng),
            Err(BranchError::NoCandidate)
        );
    }
    assert_eq!(grid, snapshot);
}

#[test]
fn report_accounts_for_every_attempt() {
    let generator = MazeGenerator::new(GenerationTuning::new(0.75, 200).expect("tuning"));
    let mut rng = ChaCha8Rng::seed_from_u64(77);

    let (grid, report) = generator
        .generate_with_report(6, 4, &mut rng)
        .expect("grid");

    assert_eq!(report.branches_carved + report.branches_skipped, 200);
    assert!(report.branches_skipped > 0, "a 6x4 maze saturates long before 200 branches");
    assert_eq!(report.road_cells, grid.count(CellState::Road));
}

#[test]
fn invalid_dimensions_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    assert_eq!(
        generate(0, 5, 40, &mut rng),
        Err(GridError::InvalidDimension {
            width: 0,
            height: 5
        })
    );
    assert!(generate(5, 0, 40, &mut rng).is_err());
}
