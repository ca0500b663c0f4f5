//! Boundary morphing — erode the rectangular quadrants into organic shapes.
//!
//! Each attempt picks a random region, a random cell on its boundary and a
//! random neighbouring region to hand that cell to. The move is committed
//! only when the losing region stays connected. Area floor and ceiling keep
//! regions near a quarter of the grid while the boundaries wander.

use serde::{Deserialize, Serialize};

use crate::connectivity::can_reassign;
use crate::constants::{regions, tuning};
use crate::grid::{Cell, Grid, RegionCells};
use crate::rng::LevelRng;

/// Morph pass parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphParams {
    pub max_attempts: u32,
    /// How far, in cells, an area may stray from `total / 4`.
    pub area_tolerance: f64,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            max_attempts: tuning::MORPH_ATTEMPTS,
            area_tolerance: tuning::MORPH_TOLERANCE,
        }
    }
}

impl MorphParams {
    /// The wider pass the balancer uses to shake loose a stuck layout.
    pub fn rescue() -> Self {
        Self {
            max_attempts: tuning::RESCUE_ATTEMPTS,
            area_tolerance: tuning::RESCUE_TOLERANCE,
        }
    }
}

/// Outcome of one morph pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphStats {
    pub attempts: u32,
    pub successes: u32,
}

/// A region cell touching at least one other region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryCell {
    pub cell: Cell,
    /// Distinct neighbouring labels, in +x, -x, +y, -y discovery order.
    pub adjacent: Vec<u8>,
}

/// Area bounds for a morph pass: `(floor, ceiling)`.
///
/// A source region at or below the floor gives nothing away; a target at or
/// above the ceiling receives nothing.
pub fn area_bounds(total_cells: usize, tolerance: f64, area_floor: usize) -> (usize, usize) {
    let target = total_cells as f64 / regions::COUNT as f64;
    let floor = ((target - tolerance).floor().max(0.0) as usize).max(area_floor);
    let ceiling = (target + tolerance).ceil().max(0.0) as usize;
    (floor, ceiling)
}

/// Boundary cells of `label`, row-major.
pub fn boundary_cells(grid: &Grid, label: u8) -> Vec<BoundaryCell> {
    let mut boundary = Vec::new();
    for cell in grid.cells() {
        if grid.get(cell) != label {
            continue;
        }
        let mut adjacent = Vec::with_capacity(regions::COUNT);
        for neighbor in grid.neighbors(cell) {
            let other = grid.get(neighbor);
            if other != label && !adjacent.contains(&other) {
                adjacent.push(other);
            }
        }
        if !adjacent.is_empty() {
            boundary.push(BoundaryCell { cell, adjacent });
        }
    }
    boundary
}

/// Run up to `params.max_attempts` connectivity-preserving reassignments.
pub fn morph_boundaries(
    grid: &mut Grid,
    cells: &mut RegionCells,
    rng: &mut LevelRng,
    params: &MorphParams,
    area_floor: usize,
) -> MorphStats {
    let (min_area, max_area) = area_bounds(grid.cell_count(), params.area_tolerance, area_floor);
    let mut stats = MorphStats::default();

    while stats.attempts < params.max_attempts {
        stats.attempts += 1;

        let from = regions::label(rng.below(regions::COUNT));
        if cells.area(from) <= min_area {
            continue;
        }

        let boundary = boundary_cells(grid, from);
        if boundary.is_empty() {
            continue;
        }
        let candidate = &boundary[rng.below(boundary.len())];

        let targets: Vec<u8> = candidate
            .adjacent
            .iter()
            .copied()
            .filter(|&l| regions::is_region(l) && l != from)
            .filter(|&l| cells.area(l) < max_area)
            .collect();
        if targets.is_empty() {
            continue;
        }
        let to = targets[rng.below(targets.len())];

        if can_reassign(grid, candidate.cell, from) {
            cells.move_cell(grid, candidate.cell, from, to);
            stats.successes += 1;
        }
    }

    log::debug!(
        "Boundary morph: {} attempts, {} cells moved (areas {:?})",
        stats.attempts,
        stats.successes,
        cells.areas()
    );
    stats
}
