//! Level catalogue — 30 seeded levels and the scored question per level.
//!
//! Level *n* is the partition generated from seed *n*. Out-of-range level
//! numbers fall back to level 1, and play wraps from the last level back
//! to the first.

use serde::{Deserialize, Serialize};

use crate::constants::{regions, LEVEL_COUNT};
use crate::generator::{generate_partition, GenerationConfig, GenerationError, Partition};
use crate::path::{cells_to_path, centroid, outline_path, perimeter};

/// A playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub partition: Partition,
}

/// Render-ready view of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionView {
    pub id: usize,
    pub color: String,
    pub area: usize,
    pub rank: u8,
    pub placing: String,
    /// Merged outline as SVG path data.
    pub path: String,
    /// One square subpath per cell, for nonzero-fill renderers.
    pub cell_path: String,
    /// Outline length in cell edges.
    pub perimeter: usize,
    /// Marker / rank label anchor in render units.
    pub anchor: Option<(f64, f64)>,
}

/// Clamp a level number into the catalogue; unknown levels play level 1.
pub fn normalize_level(level: u32) -> u32 {
    if (1..=LEVEL_COUNT).contains(&level) {
        level
    } else {
        1
    }
}

/// Seed used for a level.
pub fn level_seed(level: u32) -> u64 {
    normalize_level(level) as u64
}

/// Level after `level`, wrapping to 1 after the last.
pub fn next_level(level: u32) -> u32 {
    let level = normalize_level(level);
    if level >= LEVEL_COUNT {
        1
    } else {
        level + 1
    }
}

/// Player-facing placing for a rank: the largest region (rank 4) is "1st".
pub fn placing_label(rank: u8) -> Option<&'static str> {
    match rank {
        4 => Some("1st"),
        3 => Some("2nd"),
        2 => Some("3rd"),
        1 => Some("4th"),
        _ => None,
    }
}

/// Generate one level.
pub fn generate_level(level: u32, config: &GenerationConfig) -> Result<Level, GenerationError> {
    let number = normalize_level(level);
    let partition = generate_partition(level_seed(number), config)?;
    Ok(Level { number, partition })
}

/// Generate every level in order.
pub fn generate_campaign(config: &GenerationConfig) -> Result<Vec<Level>, GenerationError> {
    (1..=LEVEL_COUNT)
        .map(|n| generate_level(n, config))
        .collect()
}

impl Level {
    /// Did the player pick the largest region?
    pub fn is_largest(&self, region_id: usize) -> bool {
        self.partition
            .region(region_id)
            .is_some_and(|r| r.rank as usize == regions::COUNT)
    }

    /// Region views in rank order.
    pub fn region_views(&self, cell_size: f64) -> Vec<RegionView> {
        self.partition
            .regions
            .iter()
            .map(|r| RegionView {
                id: r.id,
                color: r.color.clone(),
                area: r.area,
                rank: r.rank,
                placing: placing_label(r.rank).unwrap_or("?").to_string(),
                path: outline_path(&r.cells, cell_size),
                cell_path: cells_to_path(&r.cells, cell_size),
                perimeter: perimeter(&r.cells),
                anchor: centroid(&r.cells, cell_size),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_numbers_wrap() {
        assert_eq!(next_level(1), 2);
        assert_eq!(next_level(29), 30);
        assert_eq!(next_level(30), 1);
        assert_eq!(next_level(0), 2);
    }

    #[test]
    fn out_of_range_levels_play_level_one() {
        assert_eq!(normalize_level(0), 1);
        assert_eq!(normalize_level(31), 1);
        assert_eq!(level_seed(17), 17);
        assert_eq!(level_seed(99), 1);
    }

    #[test]
    fn placings_run_largest_first() {
        assert_eq!(placing_label(4), Some("1st"));
        assert_eq!(placing_label(1), Some("4th"));
        assert_eq!(placing_label(0), None);
        assert_eq!(placing_label(5), None);
    }

    #[test]
    fn unknown_level_matches_level_one() {
        let config = GenerationConfig::default();
        let one = generate_level(1, &config).unwrap();
        let fallback = generate_level(42, &config).unwrap();
        assert_eq!(fallback.number, 1);
        assert_eq!(fallback.partition.grid, one.partition.grid);
    }

    #[test]
    fn only_the_largest_region_scores() {
        let level = generate_level(3, &GenerationConfig::default()).unwrap();
        let winners: Vec<usize> = (0..regions::COUNT)
            .filter(|&id| level.is_largest(id))
            .collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(
            level.partition.largest().map(|r| r.id),
            winners.first().copied()
        );
        assert!(!level.is_largest(99));
    }

    #[test]
    fn views_carry_paths_and_anchors() {
        let config = GenerationConfig::default();
        let level = generate_level(5, &config).unwrap();
        let views = level.region_views(config.cell_size);
        assert_eq!(views.len(), regions::COUNT);
        for (view, region) in views.iter().zip(&level.partition.regions) {
            assert_eq!(view.id, region.id);
            assert!(view.path.starts_with('M'));
            assert!(view.path.ends_with('Z'));
            assert!(view.anchor.is_some());
            assert_eq!(view.cell_path.matches('M').count(), region.area);
            assert!(view.perimeter >= 4);
        }
        assert_eq!(views[3].placing, "1st");
    }
}
