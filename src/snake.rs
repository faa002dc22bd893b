use std::collections::VecDeque;

use crate::grid::Cell;

/// Snake body, head at the front and tail at the back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snek {
    body: VecDeque<Cell>,
}

impl Snek {
    /// Builds a snake from head-first cells. Panics on an empty body.
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!body.is_empty(), "snake needs at least one segment");
        Snek { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Second segment, if any.
    pub fn neck(&self) -> Option<Cell> {
        self.body.get(1).copied()
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Whether `cell` is any segment, tail included.
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    /// Pushes a new head; the tail stays when `grow` is set.
    pub fn slither(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }
}
