//! Area balancer: pull the largest and smallest regions together.
//!
//! Each iteration hands one cell from the current largest region to the
//! current smallest, choosing among their shared boundary in seeded random
//! order and skipping any cell whose loss would split the larger region.
//! When transfers keep failing, a wider morph pass perturbs the layout and
//! balancing resumes. The loop is bounded; hitting the bound is a soft
//! failure and the best layout so far is kept.

use serde::{Deserialize, Serialize};

use crate::connectivity::can_reassign;
use crate::constants::{regions, tuning};
use crate::grid::{Cell, Grid, RegionCells};
use crate::morph::{morph_boundaries, MorphParams};
use crate::rng::LevelRng;

/// Balancer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceParams {
    pub max_iterations: u32,
    /// Accepted difference between the largest and smallest area.
    pub max_spread: usize,
    /// Consecutive failed transfers tolerated before a rescue morph.
    pub stall_limit: u32,
    pub rescue: MorphParams,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            max_iterations: tuning::BALANCE_ITERATIONS,
            max_spread: tuning::BALANCE_SPREAD,
            stall_limit: tuning::STALL_LIMIT,
            rescue: MorphParams::rescue(),
        }
    }
}

/// How balancing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOutcome {
    /// Iterations consumed, including the one that observed convergence.
    pub iterations: u32,
    pub transfers: u32,
    pub rescues: u32,
    /// Spread within `max_spread` when the loop ended.
    pub converged: bool,
    /// Final areas by 0-based region id.
    pub areas: [usize; regions::COUNT],
}

impl BalanceOutcome {
    pub fn spread(&self) -> usize {
        let max = self.areas.iter().copied().max().unwrap_or(0);
        let min = self.areas.iter().copied().min().unwrap_or(0);
        max - min
    }
}

/// First index holding the largest and first index holding the smallest area.
fn extremes(areas: &[usize; regions::COUNT]) -> (usize, usize) {
    let mut largest = 0;
    let mut smallest = 0;
    for (i, &area) in areas.iter().enumerate() {
        if area > areas[largest] {
            largest = i;
        }
        if area < areas[smallest] {
            smallest = i;
        }
    }
    (largest, smallest)
}

/// Move one cell from `from` to `to`, if any shared-boundary cell can go
/// without disconnecting `from`. Returns whether a cell moved.
pub fn transfer_cell_safe(
    grid: &mut Grid,
    cells: &mut RegionCells,
    rng: &mut LevelRng,
    from: u8,
    to: u8,
) -> bool {
    let mut candidates: Vec<Cell> = cells
        .cells(from)
        .iter()
        .copied()
        .filter(|&c| grid.neighbors(c).any(|n| grid.get(n) == to))
        .collect();
    if candidates.is_empty() {
        return false;
    }

    rng.shuffle(&mut candidates);

    match candidates.into_iter().find(|&c| can_reassign(grid, c, from)) {
        Some(cell) => {
            cells.move_cell(grid, cell, from, to);
            true
        }
        None => false,
    }
}

/// Balance region areas until the spread is within `params.max_spread` or
/// the iteration budget runs out.
pub fn balance_areas(
    grid: &mut Grid,
    cells: &mut RegionCells,
    rng: &mut LevelRng,
    params: &BalanceParams,
    area_floor: usize,
) -> BalanceOutcome {
    let mut failure_streak = 0u32;
    let mut iterations = 0u32;
    let mut transfers = 0u32;
    let mut rescues = 0u32;

    while iterations < params.max_iterations {
        iterations += 1;

        let areas = cells.areas();
        let (largest, smallest) = extremes(&areas);
        if areas[largest] - areas[smallest] <= params.max_spread {
            break;
        }

        let from = regions::label(largest);
        let to = regions::label(smallest);
        if transfer_cell_safe(grid, cells, rng, from, to) {
            transfers += 1;
            failure_streak = 0;
            continue;
        }

        failure_streak += 1;
        if failure_streak > params.stall_limit {
            log::debug!(
                "Balancer stalled moving region {} -> {} (areas {:?}), running rescue morph",
                from,
                to,
                areas
            );
            morph_boundaries(grid, cells, rng, &params.rescue, area_floor);
            rescues += 1;
            failure_streak = 0;
        }
    }

    let outcome = BalanceOutcome {
        iterations,
        transfers,
        rescues,
        converged: cells.spread() <= params.max_spread,
        areas: cells.areas(),
    };

    if outcome.converged {
        log::debug!(
            "Areas balanced after {} iterations: {:?} (spread {})",
            outcome.iterations,
            outcome.areas,
            outcome.spread()
        );
    } else {
        log::warn!(
            "Area balancing exhausted {} iterations: {:?} (spread {} > {}), keeping best effort",
            params.max_iterations,
            outcome.areas,
            outcome.spread(),
            params.max_spread
        );
    }
    outcome
}
