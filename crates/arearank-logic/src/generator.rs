//! Level partition generator, the entry point for building a layout.
//!
//! `generate_partition` turns a seed and a `GenerationConfig` into four
//! ranked regions that tile the grid:
//!
//! 1. Quadrant initialiser (seeded cross split)
//! 2. Boundary morph (organic boundaries, connectivity kept)
//! 3. Area balancer (spread pulled within tolerance)
//! 4. Finalisation (regions ranked by area, re-validated)
//!
//! ```
//! use arearank_logic::generator::{generate_partition, GenerationConfig};
//!
//! let partition = generate_partition(1, &GenerationConfig::default()).unwrap();
//! assert_eq!(partition.regions.len(), 4);
//! assert_eq!(partition.areas().iter().sum::<usize>(), 77);
//! ```

use serde::{Deserialize, Serialize};

use crate::balance::{balance_areas, BalanceOutcome, BalanceParams};
use crate::constants::{self, regions, tuning};
use crate::grid::{Cell, Grid, RegionCells};
use crate::morph::{morph_boundaries, MorphParams, MorphStats};
use crate::quadrants::{initialize_quadrants, QuadrantSplit};
use crate::rng::LevelRng;
use crate::validation::{check_connectivity, check_tiling, ValidationError};

/// Everything that shapes a generated partition apart from the seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    /// Render units per cell, for path derivation.
    pub cell_size: f64,
    /// Minimum region area the morph passes respect.
    pub area_floor: usize,
    pub morph: MorphParams,
    pub balance: BalanceParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: constants::GRID_WIDTH,
            height: constants::GRID_HEIGHT,
            cell_size: constants::CELL_SIZE,
            area_floor: tuning::AREA_FLOOR,
            morph: MorphParams::default(),
            balance: BalanceParams::default(),
        }
    }
}

impl GenerationConfig {
    /// Default tuning on a `width × height` grid.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Fewer columns than the quadrant clamps need.
    GridTooNarrow(usize),
    /// Fewer rows than the quadrant clamps need.
    GridTooShort(usize),
    /// Morph tolerance negative or not finite.
    InvalidMorphTolerance(f64),
    /// Rescue morph tolerance negative or not finite.
    InvalidRescueTolerance(f64),
    /// Cell size not a positive finite number.
    InvalidCellSize(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::GridTooNarrow(w) => write!(
                f,
                "grid width {} is below the minimum of {}",
                w,
                constants::MIN_GRID_WIDTH
            ),
            ConfigError::GridTooShort(h) => write!(
                f,
                "grid height {} is below the minimum of {}",
                h,
                constants::MIN_GRID_HEIGHT
            ),
            ConfigError::InvalidMorphTolerance(t) => write!(f, "invalid morph tolerance {}", t),
            ConfigError::InvalidRescueTolerance(t) => {
                write!(f, "invalid rescue morph tolerance {}", t)
            }
            ConfigError::InvalidCellSize(s) => write!(f, "invalid cell size {}", s),
        }
    }
}

/// Validate a generation config, returning all errors found.
pub fn validate_config(config: &GenerationConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.width < constants::MIN_GRID_WIDTH {
        errors.push(ConfigError::GridTooNarrow(config.width));
    }
    if config.height < constants::MIN_GRID_HEIGHT {
        errors.push(ConfigError::GridTooShort(config.height));
    }

    let bad_tolerance = |t: f64| !t.is_finite() || t < 0.0;
    if bad_tolerance(config.morph.area_tolerance) {
        errors.push(ConfigError::InvalidMorphTolerance(config.morph.area_tolerance));
    }
    if bad_tolerance(config.balance.rescue.area_tolerance) {
        errors.push(ConfigError::InvalidRescueTolerance(
            config.balance.rescue.area_tolerance,
        ));
    }
    if !config.cell_size.is_finite() || config.cell_size <= 0.0 {
        errors.push(ConfigError::InvalidCellSize(config.cell_size));
    }

    errors
}

/// Errors surfaced by `generate_partition`.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The config was rejected before generation started.
    InvalidConfig(Vec<ConfigError>),
    /// A finished partition failed a tiling or connectivity check. This is a
    /// generator defect, never an expected outcome.
    InvariantViolation { seed: u64, problems: Vec<ValidationError> },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidConfig(errors) => {
                write!(f, "invalid generation config: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
            GenerationError::InvariantViolation { seed, problems } => {
                write!(
                    f,
                    "seed {} broke {} partition invariant(s)",
                    seed,
                    problems.len()
                )?;
                if let Some(first) = problems.first() {
                    write!(f, ", first: {}", first)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// One finished region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// 0-based id, stable across ranking (`label - 1`).
    pub id: usize,
    /// Grid label, 1..=4.
    pub label: u8,
    pub color: String,
    /// Cells in row-major order.
    pub cells: Vec<Cell>,
    pub area: usize,
    /// 1 = smallest … 4 = largest.
    pub rank: u8,
}

/// A generated level layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub grid: Grid,
    /// Sorted by rank, smallest first.
    pub regions: Vec<Region>,
    pub split: QuadrantSplit,
    pub morph: MorphStats,
    pub balance: BalanceOutcome,
}

impl Partition {
    /// Areas in rank order.
    pub fn areas(&self) -> Vec<usize> {
        self.regions.iter().map(|r| r.area).collect()
    }

    pub fn spread(&self) -> usize {
        let max = self.regions.iter().map(|r| r.area).max().unwrap_or(0);
        let min = self.regions.iter().map(|r| r.area).min().unwrap_or(0);
        max - min
    }

    pub fn region(&self, id: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// The rank-4 region.
    pub fn largest(&self) -> Option<&Region> {
        self.regions.iter().find(|r| r.rank as usize == regions::COUNT)
    }
}

/// Sort regions by area, smallest first, and number them 1..=n.
/// Equal areas keep their incoming order.
pub fn rank_regions(mut list: Vec<Region>) -> Vec<Region> {
    list.sort_by_key(|r| r.area);
    for (i, region) in list.iter_mut().enumerate() {
        region.rank = (i + 1) as u8;
    }
    list
}

fn build_regions(cells: RegionCells) -> Vec<Region> {
    cells
        .into_lists()
        .into_iter()
        .enumerate()
        .map(|(id, cells)| Region {
            id,
            label: regions::label(id),
            color: regions::COLORS[id].to_string(),
            area: cells.len(),
            cells,
            rank: 0,
        })
        .collect()
}

/// Generate the four-region partition for `seed`.
pub fn generate_partition(
    seed: u64,
    config: &GenerationConfig,
) -> Result<Partition, GenerationError> {
    let errors = validate_config(config);
    if !errors.is_empty() {
        return Err(GenerationError::InvalidConfig(errors));
    }

    let mut rng = LevelRng::new(seed);

    let (mut grid, split) = initialize_quadrants(&mut rng, config.width, config.height);
    let mut cells = RegionCells::from_grid(&grid);

    let morph = morph_boundaries(
        &mut grid,
        &mut cells,
        &mut rng,
        &config.morph,
        config.area_floor,
    );
    cells.normalize();

    let balance = balance_areas(
        &mut grid,
        &mut cells,
        &mut rng,
        &config.balance,
        config.area_floor,
    );
    cells.normalize();

    let partition = Partition {
        seed,
        width: config.width,
        height: config.height,
        grid,
        regions: rank_regions(build_regions(cells)),
        split,
        morph,
        balance,
    };

    let mut problems = check_tiling(&partition);
    problems.extend(check_connectivity(&partition));
    if !problems.is_empty() {
        for p in &problems {
            log::error!("Seed {}: {}", seed, p);
        }
        return Err(GenerationError::InvariantViolation { seed, problems });
    }

    log::info!(
        "Generated seed {} on {}x{}: areas {:?} (morph {}/{} moved, {} balance iterations, {} rescues)",
        seed,
        config.width,
        config.height,
        partition.areas(),
        morph.successes,
        morph.attempts,
        partition.balance.iterations,
        partition.balance.rescues
    );
    Ok(partition)
}
