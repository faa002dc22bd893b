use serde::Deserialize;

/// Side length of the square board.
pub const GRID_SIZE: i32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub x: i32,
    pub y: i32,
}

impl From<Direction> for Delta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Delta { x: 0, y: -1 },
            Direction::Down => Delta { x: 0, y: 1 },
            Direction::Left => Delta { x: -1, y: 0 },
            Direction::Right => Delta { x: 1, y: 0 },
        }
    }
}

/// A board coordinate: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Unwrapped neighbour; may land off the board.
    pub fn offset(&self, delta: Delta) -> Cell {
        Cell {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Grid { size: GRID_SIZE }
    }
}

impl Grid {
    pub fn new(size: i32) -> Self {
        assert!(size > 0, "grid size must be positive");
        Grid { size }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn area(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    /// Floored modulo into `[0, size)`, so `wrap(-1) == size - 1`.
    pub fn wrap(&self, v: i32) -> i32 {
        v.rem_euclid(self.size)
    }

    pub fn wrap_cell(&self, cell: Cell) -> Cell {
        Cell {
            x: self.wrap(cell.x),
            y: self.wrap(cell.y),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.size).contains(&cell.x) && (0..self.size).contains(&cell.y)
    }

    /// The cell one step from `cell`. Without wrapping, stepping off the
    /// board yields `None`.
    pub fn step(&self, cell: Cell, dir: Direction, wrap_edges: bool) -> Option<Cell> {
        let next = cell.offset(dir.into());
        if wrap_edges {
            Some(self.wrap_cell(next))
        } else if self.contains(next) {
            Some(next)
        } else {
            None
        }
    }

    /// Whether `a` and `b` are one step apart, optionally across an edge.
    pub fn adjacent(&self, a: Cell, b: Cell, wrap_edges: bool) -> bool {
        Direction::ALL
            .iter()
            .any(|&dir| self.step(a, dir, wrap_edges) == Some(b))
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell { x, y }))
    }
}
