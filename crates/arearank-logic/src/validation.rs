//! Invariant checks for generated partitions.
//!
//! Pure functions over a finished `Partition`, each returning the problems
//! it found. Errors mean the generator broke an invariant it is supposed to
//! guarantee; warnings flag the soft non-convergence the balancer is
//! allowed to end in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::connectivity::cells_connected;
use crate::constants::regions;
use crate::generator::{GenerationConfig, Partition};
use crate::grid::Cell;

/// A partition validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Validation severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl ValidationError {
    fn error(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message,
        }
    }

    fn warning(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{} {}] {}", level, self.category, self.message)
    }
}

/// Only error-severity entries.
pub fn errors_only(problems: &[ValidationError]) -> Vec<&ValidationError> {
    problems
        .iter()
        .filter(|p| p.severity == Severity::Error)
        .collect()
}

// ── A. Tiling ──────────────────────────────────────────────────────────

/// Every grid cell appears in exactly one region, under the region's label.
pub fn check_tiling(partition: &Partition) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let (width, height) = (partition.width, partition.height);
    let mut seen: HashSet<Cell> = HashSet::with_capacity(width * height);

    if partition.regions.len() != regions::COUNT {
        errors.push(ValidationError::error(
            "tiling",
            format!(
                "expected {} regions, found {}",
                regions::COUNT,
                partition.regions.len()
            ),
        ));
    }

    for region in &partition.regions {
        if region.area != region.cells.len() {
            errors.push(ValidationError::error(
                "tiling",
                format!(
                    "Region #{} reports area {} but lists {} cells",
                    region.id,
                    region.area,
                    region.cells.len()
                ),
            ));
        }
        for &cell in &region.cells {
            if cell.x >= width || cell.y >= height {
                errors.push(ValidationError::error(
                    "tiling",
                    format!(
                        "Region #{} lists ({},{}) outside the {}x{} grid",
                        region.id, cell.x, cell.y, width, height
                    ),
                ));
                continue;
            }
            if !seen.insert(cell) {
                errors.push(ValidationError::error(
                    "tiling",
                    format!("Cell ({},{}) is claimed by more than one region", cell.x, cell.y),
                ));
            }
            let label = partition.grid.get(cell);
            if label != region.label {
                errors.push(ValidationError::error(
                    "tiling",
                    format!(
                        "Region #{} lists ({},{}) but the grid labels it {}",
                        region.id, cell.x, cell.y, label
                    ),
                ));
            }
        }
    }

    let missing = width * height - seen.len().min(width * height);
    if missing > 0 {
        errors.push(ValidationError::error(
            "tiling",
            format!("{} cells belong to no region", missing),
        ));
    }
    errors
}

// ── B. Connectivity ────────────────────────────────────────────────────

/// Every region is a single 4-connected component.
pub fn check_connectivity(partition: &Partition) -> Vec<ValidationError> {
    partition
        .regions
        .iter()
        .filter(|r| !cells_connected(&r.cells))
        .map(|r| {
            ValidationError::error(
                "connectivity",
                format!("Region #{} ({} cells) is not connected", r.id, r.area),
            )
        })
        .collect()
}

// ── C. Areas ───────────────────────────────────────────────────────────

/// No region below the floor, on grids big enough to afford it.
pub fn check_area_floor(partition: &Partition, area_floor: usize) -> Vec<ValidationError> {
    let quarter = partition.width * partition.height / regions::COUNT;
    if quarter < area_floor {
        return Vec::new();
    }
    partition
        .regions
        .iter()
        .filter(|r| r.area < area_floor)
        .map(|r| {
            ValidationError::error(
                "area_floor",
                format!("Region #{} has {} cells, floor is {}", r.id, r.area, area_floor),
            )
        })
        .collect()
}

/// Area spread within the balancer's target. Soft: a warning, not an error.
pub fn check_balance(partition: &Partition, max_spread: usize) -> Vec<ValidationError> {
    let spread = partition.spread();
    if spread <= max_spread {
        return Vec::new();
    }
    vec![ValidationError::warning(
        "balance",
        format!(
            "Area spread {} exceeds {} (areas {:?})",
            spread,
            max_spread,
            partition.areas()
        ),
    )]
}

// ── D. Ranks ───────────────────────────────────────────────────────────

/// Ranks are 1..=4 exactly once each and never decrease in area.
pub fn check_ranks(partition: &Partition) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut ranks: Vec<u8> = partition.regions.iter().map(|r| r.rank).collect();
    ranks.sort_unstable();
    let expected: Vec<u8> = (1..=regions::COUNT as u8).collect();
    if ranks != expected {
        errors.push(ValidationError::error(
            "ranks",
            format!("ranks {:?} are not a permutation of {:?}", ranks, expected),
        ));
    }

    let mut by_rank: Vec<_> = partition.regions.iter().collect();
    by_rank.sort_by_key(|r| r.rank);
    for pair in by_rank.windows(2) {
        if pair[0].area > pair[1].area {
            errors.push(ValidationError::error(
                "ranks",
                format!(
                    "Region #{} (rank {}, {} cells) outranks region #{} (rank {}, {} cells)",
                    pair[1].id, pair[1].rank, pair[1].area, pair[0].id, pair[0].rank, pair[0].area
                ),
            ));
        }
    }
    errors
}

/// Run every check.
pub fn validate_partition(partition: &Partition, config: &GenerationConfig) -> Vec<ValidationError> {
    let mut problems = check_tiling(partition);
    problems.extend(check_connectivity(partition));
    problems.extend(check_area_floor(partition, config.area_floor));
    problems.extend(check_ranks(partition));
    problems.extend(check_balance(partition, config.balance.max_spread));
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_partition;

    fn partition() -> Partition {
        generate_partition(1, &GenerationConfig::default()).unwrap()
    }

    #[test]
    fn generated_partition_is_clean() {
        let p = partition();
        let problems = validate_partition(&p, &GenerationConfig::default());
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn overlap_is_detected() {
        let mut p = partition();
        let stolen = p.regions[0].cells[0];
        p.regions[1].cells.push(stolen);
        p.regions[1].area += 1;
        let errors = check_tiling(&p);
        assert!(errors.iter().any(|e| e.message.contains("more than one region")));
    }

    #[test]
    fn gap_is_detected() {
        let mut p = partition();
        p.regions[2].cells.pop();
        p.regions[2].area -= 1;
        let errors = check_tiling(&p);
        assert!(errors.iter().any(|e| e.message.contains("belong to no region")));
    }

    #[test]
    fn area_mismatch_is_detected() {
        let mut p = partition();
        p.regions[0].area += 3;
        assert!(!check_tiling(&p).is_empty());
    }

    #[test]
    fn disconnected_region_is_detected() {
        let mut p = partition();
        p.regions[0].cells = vec![Cell::new(0, 0), Cell::new(5, 5)];
        p.regions[0].area = 2;
        let errors = check_connectivity(&p);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "connectivity");
    }

    #[test]
    fn imbalance_is_only_a_warning() {
        let mut p = partition();
        p.regions[0].area = 1;
        p.regions[3].area = 40;
        let problems = check_balance(&p, 2);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].severity, Severity::Warning);
        assert!(errors_only(&problems).is_empty());
    }

    #[test]
    fn area_floor_skipped_on_tiny_grids() {
        let mut p = partition();
        p.regions[0].area = 2;
        assert_eq!(check_area_floor(&p, 5).len(), 1);
        p.width = 4;
        p.height = 4;
        assert!(check_area_floor(&p, 5).is_empty());
    }

    #[test]
    fn rank_inversion_is_detected() {
        let mut p = partition();
        p.regions[0].rank = 4;
        p.regions[3].rank = 1;
        // 77 cells never split evenly, so rank 1 is strictly smaller than rank 4
        let errors = check_ranks(&p);
        assert!(errors.iter().any(|e| e.message.contains("outranks")));
    }

    #[test]
    fn duplicate_rank_is_detected() {
        let mut p = partition();
        p.regions[1].rank = p.regions[0].rank;
        let errors = check_ranks(&p);
        assert!(errors.iter().any(|e| e.message.contains("permutation")));
    }

    #[test]
    fn display_format() {
        let e = ValidationError::warning("balance", "too wide".into());
        assert_eq!(e.to_string(), "[warning balance] too wide");
    }
}
