//! Grid storage and per-region cell bookkeeping.
//!
//! `Grid` owns the authoritative label of every cell. `RegionCells` mirrors
//! it as one cell list per region and is updated on every committed move,
//! so phases never rescan the grid to learn region areas.

use serde::{Deserialize, Serialize};

use crate::constants::regions;

/// A grid coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Row-major ordering key (row first, then column).
#[inline]
fn row_major(cell: &Cell) -> (usize, usize) {
    (cell.y, cell.x)
}

/// Fixed-size label grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    labels: Vec<u8>,
}

impl Grid {
    /// A grid with every cell unassigned.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            labels: vec![regions::UNASSIGNED; width * height],
        }
    }

    /// Build from rows of labels. Returns `None` for ragged or empty input.
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            labels: rows.concat(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.labels.len()
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Label at `cell`. Out-of-range cells read as unassigned.
    pub fn get(&self, cell: Cell) -> u8 {
        if cell.x >= self.width || cell.y >= self.height {
            return regions::UNASSIGNED;
        }
        self.labels[cell.y * self.width + cell.x]
    }

    pub fn set(&mut self, cell: Cell, label: u8) {
        debug_assert!(cell.x < self.width && cell.y < self.height);
        let idx = cell.y * self.width + cell.x;
        self.labels[idx] = label;
    }

    /// In-bounds 4-neighbours in the order +x, -x, +y, -y.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let (x, y) = (cell.x as i64, cell.y as i64);
        [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
            .into_iter()
            .filter(move |&(nx, ny)| self.in_bounds(nx, ny))
            .map(|(nx, ny)| Cell::new(nx as usize, ny as usize))
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Cells bearing `label`, row-major.
    pub fn cells_of(&self, label: u8) -> Vec<Cell> {
        self.cells().filter(|&c| self.get(c) == label).collect()
    }

    pub fn count_of(&self, label: u8) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Labels as rows, for display and export.
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.labels
            .chunks(self.width.max(1))
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Per-region cell lists kept in step with a `Grid`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionCells {
    lists: [Vec<Cell>; regions::COUNT],
}

impl RegionCells {
    /// Extract region lists from the grid (row-major within each list).
    /// Unassigned cells are not listed.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut lists: [Vec<Cell>; regions::COUNT] = Default::default();
        for cell in grid.cells() {
            let label = grid.get(cell);
            if regions::is_region(label) {
                lists[regions::index(label)].push(cell);
            }
        }
        Self { lists }
    }

    /// Cells of the region with `label`; empty for a non-region label.
    pub fn cells(&self, label: u8) -> &[Cell] {
        match regions::try_index(label) {
            Some(i) => &self.lists[i],
            None => &[],
        }
    }

    pub fn area(&self, label: u8) -> usize {
        self.cells(label).len()
    }

    /// Areas indexed by 0-based region id.
    pub fn areas(&self) -> [usize; regions::COUNT] {
        let mut areas = [0; regions::COUNT];
        for (area, list) in areas.iter_mut().zip(&self.lists) {
            *area = list.len();
        }
        areas
    }

    /// Largest area minus smallest area.
    pub fn spread(&self) -> usize {
        let areas = self.areas();
        let max = areas.iter().copied().max().unwrap_or(0);
        let min = areas.iter().copied().min().unwrap_or(0);
        max - min
    }

    /// Reassign `cell` from `from` to `to` in both the grid and the lists.
    /// The caller has already validated the move; both labels must be
    /// region labels.
    pub fn move_cell(&mut self, grid: &mut Grid, cell: Cell, from: u8, to: u8) {
        grid.set(cell, to);
        let source = &mut self.lists[regions::index(from)];
        if let Some(pos) = source.iter().position(|&c| c == cell) {
            source.remove(pos);
        }
        self.lists[regions::index(to)].push(cell);
    }

    /// Restore row-major order in every list.
    pub fn normalize(&mut self) {
        for list in &mut self.lists {
            list.sort_by_key(row_major);
        }
    }

    /// Consume into the per-region lists.
    pub fn into_lists(self) -> [Vec<Cell>; regions::COUNT] {
        self.lists
    }
}
