use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::grid::{Cell, Grid};

/// Random draws before falling back to scanning the free cells.
const MAX_DRAWS: usize = 64;

/// Picks a uniformly random cell outside `excluded`, or `None` when every
/// cell is excluded.
pub fn place(excluded: &HashSet<Cell>, grid: &Grid, rng: &mut impl Rng) -> Option<Cell> {
    if excluded.len() < grid.area() {
        for _ in 0..MAX_DRAWS {
            let cell = Cell {
                x: rng.gen_range(0..grid.size()),
                y: rng.gen_range(0..grid.size()),
            };
            if !excluded.contains(&cell) {
                return Some(cell);
            }
        }
    }

    // Crowded board: choose among what is left.
    grid.cells()
        .filter(|cell| !excluded.contains(cell))
        .choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RNG_SEED: u64 = 0x5eed_5eed;

    #[test]
    fn test_never_on_excluded_cells() {
        let grid = Grid::default();
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let excluded: HashSet<Cell> = (0..20).map(|x| Cell::new(x, 10)).collect();

        for _ in 0..500 {
            let cell = place(&excluded, &grid, &mut rng).expect("board has room");
            assert!(grid.contains(cell));
            assert!(!excluded.contains(&cell));
        }
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let grid = Grid::new(5);
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let hole = Cell::new(3, 4);
        let excluded: HashSet<Cell> = grid.cells().filter(|&c| c != hole).collect();

        assert_eq!(place(&excluded, &grid, &mut rng), Some(hole));
    }

    #[test]
    fn test_full_board_yields_none() {
        let grid = Grid::new(4);
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let excluded: HashSet<Cell> = grid.cells().collect();

        assert_eq!(place(&excluded, &grid, &mut rng), None);
    }

    #[test]
    fn test_reaches_every_free_cell() {
        let grid = Grid::new(4);
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let excluded: HashSet<Cell> = [Cell::new(0, 0), Cell::new(1, 1)].into_iter().collect();

        let seen: HashSet<Cell> = (0..2000)
            .filter_map(|_| place(&excluded, &grid, &mut rng))
            .collect();
        assert_eq!(seen.len(), grid.area() - excluded.len());
    }
}
