//! Quadrant initialiser — the rectangular starting partition.
//!
//! The grid is cut once vertically and once horizontally near its centre.
//! Each cut is nudged by a seeded offset in {-1, 0, 1} and then clamped so
//! all four quadrants stay non-empty on small grids.

use serde::{Deserialize, Serialize};

use crate::constants::regions;
use crate::grid::{Cell, Grid};
use crate::rng::LevelRng;

/// Where the initial cross was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantSplit {
    /// First column of the right-hand quadrants.
    pub mid_x: usize,
    /// First row of the bottom quadrants.
    pub mid_y: usize,
}

/// Pick the split point. Draws the x offset, then the y offset.
pub fn choose_split(rng: &mut LevelRng, width: usize, height: usize) -> QuadrantSplit {
    let offset_x = rng.jitter();
    let offset_y = rng.jitter();

    let mid_x = clamp_axis((width / 2) as i64 + offset_x, 3, width as i64 - 3);
    let mid_y = clamp_axis((height / 2) as i64 + offset_y, 2, height as i64 - 2);
    QuadrantSplit { mid_x, mid_y }
}

/// `max(lo)` then `min(hi)`, so `hi` wins when the range is inverted.
fn clamp_axis(value: i64, lo: i64, hi: i64) -> usize {
    value.max(lo).min(hi).max(0) as usize
}

/// Label every cell by quadrant. No cell is left unassigned.
pub fn label_quadrants(width: usize, height: usize, split: QuadrantSplit) -> Grid {
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let label = match (y < split.mid_y, x < split.mid_x) {
                (true, true) => regions::TOP_LEFT,
                (true, false) => regions::TOP_RIGHT,
                (false, true) => regions::BOTTOM_LEFT,
                (false, false) => regions::BOTTOM_RIGHT,
            };
            grid.set(Cell::new(x, y), label);
        }
    }
    grid
}

/// Choose a split and label the grid.
pub fn initialize_quadrants(
    rng: &mut LevelRng,
    width: usize,
    height: usize,
) -> (Grid, QuadrantSplit) {
    let split = choose_split(rng, width, height);
    log::debug!(
        "Quadrant split at ({}, {}) on {}x{}",
        split.mid_x,
        split.mid_y,
        width,
        height
    );
    (label_quadrants(width, height, split), split)
}
