//! Game constants — grid defaults, region labels, colours, tuning knobs.
//!
//! Plain constants with no runtime dependency. Both the generator and the
//! native simtest harness read these.

/// Default grid width in cells.
pub const GRID_WIDTH: usize = 11;
/// Default grid height in cells (11×7 = 77 cells, ~19 per region).
pub const GRID_HEIGHT: usize = 7;
/// Edge length of one cell in render units.
pub const CELL_SIZE: f64 = 60.0;

/// Fewest columns for which the `[3, W-3]` split clamp is non-empty.
pub const MIN_GRID_WIDTH: usize = 6;
/// Fewest rows for which the `[2, H-2]` split clamp is non-empty.
pub const MIN_GRID_HEIGHT: usize = 4;

/// Number of levels in the campaign.
pub const LEVEL_COUNT: u32 = 30;

pub mod regions {
    /// Regions per level.
    pub const COUNT: usize = 4;

    /// Grid label for a cell not yet owned by any region.
    pub const UNASSIGNED: u8 = 0;
    pub const TOP_LEFT: u8 = 1;
    pub const TOP_RIGHT: u8 = 2;
    pub const BOTTOM_LEFT: u8 = 3;
    pub const BOTTOM_RIGHT: u8 = 4;

    pub const LABELS: [u8; COUNT] = [TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT];

    /// Display colours, indexed by 0-based region id.
    pub const COLORS: [&str; COUNT] = ["#95a5a6", "#e74c3c", "#3498db", "#f39c12"];

    /// 0-based index for a label in 1..=4.
    ///
    /// The label must satisfy [`is_region`]; use [`try_index`] for labels
    /// read from untrusted data.
    #[inline]
    pub const fn index(label: u8) -> usize {
        debug_assert!(is_region(label), "not a region label");
        label.wrapping_sub(1) as usize
    }

    /// 0-based index, or `None` for `UNASSIGNED` and out-of-range labels.
    #[inline]
    pub const fn try_index(label: u8) -> Option<usize> {
        if is_region(label) {
            Some((label - 1) as usize)
        } else {
            None
        }
    }

    /// Label for a 0-based index.
    #[inline]
    pub const fn label(index: usize) -> u8 {
        index as u8 + 1
    }

    /// True for the four region labels, false for `UNASSIGNED` and anything else.
    #[inline]
    pub const fn is_region(label: u8) -> bool {
        label >= TOP_LEFT && label <= BOTTOM_RIGHT
    }
}

pub mod tuning {
    /// Boundary-morph attempts after quadrant initialisation.
    pub const MORPH_ATTEMPTS: u32 = 600;
    /// Allowed deviation from the target area during morphing.
    pub const MORPH_TOLERANCE: f64 = 4.0;

    /// Rescue morph fired when the balancer stalls.
    pub const RESCUE_ATTEMPTS: u32 = 200;
    pub const RESCUE_TOLERANCE: f64 = 6.0;

    pub const BALANCE_ITERATIONS: u32 = 600;
    /// Largest accepted difference between the biggest and smallest region.
    pub const BALANCE_SPREAD: usize = 2;
    /// Consecutive failed transfers tolerated before a rescue morph.
    pub const STALL_LIMIT: u32 = 30;

    /// No region is eroded below this many cells.
    pub const AREA_FLOOR: usize = 5;
}
