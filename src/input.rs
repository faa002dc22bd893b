//! Single-slot mailbox between key events and ticks.
//!
//! Key presses can arrive any number of times between two ticks; only the
//! most recent legal one survives, and it is committed at the start of the
//! next tick.

use log::debug;

use crate::grid::{Direction, Grid};
use crate::snake::Snek;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputBuffer {
    pending: Option<Direction>,
}

/// True when moving the head by `dir` would land on the neck.
pub fn reverses_into_neck(dir: Direction, snek: &Snek, grid: &Grid) -> bool {
    match snek.neck() {
        Some(neck) => grid.wrap_cell(snek.head().offset(dir.into())) == neck,
        None => false,
    }
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `candidate`, replacing any earlier unconsumed value. A move
    /// back into the neck is rejected and leaves the slot untouched.
    pub fn submit(&mut self, candidate: Direction, snek: &Snek, grid: &Grid) -> bool {
        if reverses_into_neck(candidate, snek, grid) {
            debug!("Rejected {:?}: reverses into neck", candidate);
            return false;
        }
        self.pending = Some(candidate);
        true
    }

    /// Empties the slot. Returns the buffered direction if it is still legal
    /// for `snek`; an illegal one is dropped.
    pub fn consume(&mut self, snek: &Snek, grid: &Grid) -> Option<Direction> {
        let candidate = self.pending.take()?;
        if reverses_into_neck(candidate, snek, grid) {
            debug!("Dropped stale {:?}: reverses into neck", candidate);
            None
        } else {
            Some(candidate)
        }
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn horizontal() -> Snek {
        Snek::new([Cell::new(8, 10), Cell::new(7, 10), Cell::new(6, 10)])
    }

    #[test]
    fn test_reverse_is_rejected() {
        let grid = Grid::default();
        let snek = horizontal();
        let mut input = InputBuffer::new();

        assert!(!input.submit(Direction::Left, &snek, &grid));
        assert_eq!(input.pending(), None);
    }

    #[test]
    fn test_reverse_never_changes_buffered_value() {
        let grid = Grid::default();
        // Heads pointing every way, each with the neck behind it.
        let snakes = [
            Snek::new([Cell::new(5, 5), Cell::new(5, 6), Cell::new(5, 7)]),
            Snek::new([Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)]),
            Snek::new([Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)]),
            Snek::new([Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]),
            Snek::new([Cell::new(0, 5), Cell::new(19, 5)]),
            Snek::new([Cell::new(3, 19), Cell::new(3, 0)]),
        ];

        for snek in &snakes {
            for dir in Direction::ALL {
                if !reverses_into_neck(dir, snek, &grid) {
                    continue;
                }
                for before in [None, Some(Direction::Up), Some(Direction::Right)] {
                    let mut input = InputBuffer { pending: before };
                    assert!(!input.submit(dir, snek, &grid));
                    assert_eq!(input.pending(), before);
                }
            }
        }
    }

    #[test]
    fn test_reverse_detected_across_wrap() {
        let grid = Grid::default();
        // Just crossed the left edge moving left.
        let snek = Snek::new([Cell::new(19, 4), Cell::new(0, 4), Cell::new(1, 4)]);
        assert!(reverses_into_neck(Direction::Right, &snek, &grid));
        assert!(!reverses_into_neck(Direction::Left, &snek, &grid));
    }

    #[test]
    fn test_single_segment_can_reverse() {
        let grid = Grid::default();
        let snek = Snek::new([Cell::new(3, 3)]);
        let mut input = InputBuffer::new();

        for dir in Direction::ALL {
            assert!(input.submit(dir, &snek, &grid));
            assert_eq!(input.pending(), Some(dir));
        }
    }

    #[test]
    fn test_latest_submission_wins() {
        let grid = Grid::default();
        let snek = horizontal();
        let mut input = InputBuffer::new();

        assert!(input.submit(Direction::Up, &snek, &grid));
        assert!(input.submit(Direction::Down, &snek, &grid));
        assert_eq!(input.pending(), Some(Direction::Down));

        assert_eq!(input.consume(&snek, &grid), Some(Direction::Down));
        assert_eq!(input.pending(), None);
        assert_eq!(input.consume(&snek, &grid), None);
    }

    #[test]
    fn test_stale_value_dropped_on_consume() {
        let grid = Grid::default();
        let mut input = InputBuffer::new();
        let moving_right = horizontal();
        assert!(input.submit(Direction::Down, &moving_right, &grid));

        // The snake has since turned and now has its neck below the head.
        let moving_up = Snek::new([Cell::new(8, 9), Cell::new(8, 10), Cell::new(7, 10)]);
        assert_eq!(input.consume(&moving_up, &grid), None);
        assert_eq!(input.pending(), None);
    }

    #[test]
    fn test_clear() {
        let grid = Grid::default();
        let mut input = InputBuffer::new();
        input.submit(Direction::Up, &horizontal(), &grid);
        input.clear();
        assert_eq!(input.pending(), None);
    }
}
