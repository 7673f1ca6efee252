//! Board storage: an N×N grid of cells, index arithmetic, gravity and refill.

use crate::rng::TokenSource;

/// Single cell: empty, an ordinary token of some kind, or a detonator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Token(u8), // kind index 0..kinds
    Detonator,
}

impl Cell {
    /// Kind of an ordinary token. Empty cells and detonators have none.
    #[inline]
    pub fn kind(self) -> Option<u8> {
        match self {
            Self::Token(k) => Some(k),
            _ => None,
        }
    }

    #[inline]
    pub fn is_detonator(self) -> bool {
        self == Self::Detonator
    }
}

/// Square playfield. Cells are stored row-major: index = row * size + col, row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// All-empty grid of `size` × `size`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a grid from rows of cells. Returns None unless the rows form a square.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    #[inline]
    pub fn in_bounds(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(self.index(row, col)).copied()
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.size && col < self.size {
            let i = self.index(row, col);
            self.cells[i] = cell;
        }
    }

    #[inline]
    pub fn at(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    #[inline]
    pub fn set_at(&mut self, index: usize, cell: Cell) {
        if let Some(c) = self.cells.get_mut(index) {
            *c = cell;
        }
    }

    /// Exchange two cells wholesale. Out-of-bounds indices are ignored.
    pub fn swap(&mut self, a: usize, b: usize) {
        if self.in_bounds(a) && self.in_bounds(b) {
            self.cells.swap(a, b);
        }
    }

    /// Up, down, left and right neighbours that lie on the board.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        if !self.in_bounds(index) {
            return Vec::new();
        }
        let (row, col) = self.coords(index);
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push(index - self.size);
        }
        if row + 1 < self.size {
            out.push(index + self.size);
        }
        if col > 0 {
            out.push(index - 1);
        }
        if col + 1 < self.size {
            out.push(index + 1);
        }
        out
    }

    /// Manhattan distance 1 in (row, col) space.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        let (ra, ca) = self.coords(a);
        let (rb, cb) = self.coords(b);
        ra.abs_diff(rb) + ca.abs_diff(cb) == 1
    }

    /// Every index of row `row`.
    pub fn row_indices(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).map(move |c| self.index(row, c))
    }

    /// Every index of column `col`.
    pub fn col_indices(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).map(move |r| self.index(r, col))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(**c)).count()
    }

    /// Slide tokens down into empty cells, column by column, keeping their order.
    /// Detonators never move and tokens above one stack on it.
    /// Returns true if anything moved.
    pub fn apply_gravity(&mut self) -> bool {
        let mut moved = false;
        for col in 0..self.size {
            // Lowest empty row still waiting for a token in the current segment.
            let mut hole: Option<usize> = None;
            for row in (0..self.size).rev() {
                let i = self.index(row, col);
                match self.cells[i] {
                    Cell::Detonator => hole = None,
                    Cell::Empty => {
                        if hole.is_none() {
                            hole = Some(row);
                        }
                    }
                    token @ Cell::Token(_) => {
                        if let Some(h) = hole {
                            let target = self.index(h, col);
                            self.cells[target] = token;
                            self.cells[i] = Cell::Empty;
                            // h > row, so the slot above h is empty or is `row` itself.
                            hole = Some(h - 1);
                            moved = true;
                        }
                    }
                }
            }
        }
        moved
    }

    /// Fill every empty cell from `tokens`. Returns how many were filled.
    pub fn refill(&mut self, tokens: &mut dyn TokenSource) -> usize {
        let mut filled = 0;
        for cell in &mut self.cells {
            if *cell == Cell::Empty {
                *cell = Cell::Token(tokens.next_kind());
                filled += 1;
            }
        }
        filled
    }
}
