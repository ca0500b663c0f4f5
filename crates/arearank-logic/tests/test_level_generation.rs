//! Integration tests for the full level generation pipeline.
//!
//! Exercises: seed → quadrants → boundary morph → area balancer → ranking
//! → validation → render paths.
//!
//! All tests are pure logic: no rendering, no input.

use arearank_logic::connectivity::{can_reassign, is_label_connected};
use arearank_logic::constants::LEVEL_COUNT;
use arearank_logic::generator::{
    generate_partition, validate_config, ConfigError, GenerationConfig, GenerationError, Partition,
};
use arearank_logic::grid::{Cell, Grid};
use arearank_logic::levels::{generate_campaign, generate_level, next_level, placing_label};
use arearank_logic::path::{centroid, outline_loops, outline_path, perimeter};
use arearank_logic::quadrants::QuadrantSplit;
use arearank_logic::validation::{
    check_area_floor, check_connectivity, errors_only, validate_partition, Severity,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

fn default_config() -> GenerationConfig {
    GenerationConfig::default()
}

fn assert_hard_invariants(p: &Partition, config: &GenerationConfig) {
    let problems = validate_partition(p, config);
    let errors = errors_only(&problems);
    assert!(
        errors.is_empty(),
        "seed {} on {}x{}: {:?}",
        p.seed,
        p.width,
        p.height,
        errors
    );
    for region in &p.regions {
        assert!(
            is_label_connected(&p.grid, region.label),
            "seed {}: region {} split on the grid",
            p.seed,
            region.id
        );
    }
    assert_eq!(p.areas().iter().sum::<usize>(), p.width * p.height);
}

// ── Level catalogue ────────────────────────────────────────────────────

#[test]
fn every_level_is_valid_and_balanced() {
    let config = default_config();
    let levels = generate_campaign(&config).expect("campaign generates");
    assert_eq!(levels.len(), LEVEL_COUNT as usize);

    for (i, level) in levels.iter().enumerate() {
        assert_eq!(level.number as usize, i + 1);
        let p = &level.partition;
        assert_hard_invariants(p, &config);
        assert!(p.balance.converged, "level {} did not converge", level.number);
        assert!(p.spread() <= 2, "level {} spread {}", level.number, p.spread());
        assert!(
            validate_partition(p, &config).is_empty(),
            "level {} has warnings",
            level.number
        );
    }
}

#[test]
fn deterministic_output() {
    let config = default_config();
    for level in [1, 7, 19, 30] {
        let a = generate_level(level, &config).unwrap();
        let b = generate_level(level, &config).unwrap();
        assert_eq!(a, b, "level {} is not reproducible", level);
    }
}

#[test]
fn different_levels_differ() {
    let config = default_config();
    let one = generate_level(1, &config).unwrap();
    let two = generate_level(2, &config).unwrap();
    assert_ne!(one.partition.grid, two.partition.grid);
}

#[test]
fn ranks_follow_area() {
    let config = default_config();
    for n in 1..=LEVEL_COUNT {
        let level = generate_level(n, &config).unwrap();
        let regions = &level.partition.regions;
        for pair in regions.windows(2) {
            assert!(pair[0].area <= pair[1].area);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
        let largest = level.partition.largest().unwrap();
        assert_eq!(placing_label(largest.rank), Some("1st"));
        assert!(level.is_largest(largest.id));
    }
}

#[test]
fn play_wraps_through_the_catalogue() {
    let mut level = 1;
    for _ in 0..LEVEL_COUNT {
        level = next_level(level);
    }
    assert_eq!(level, 1);
}

// ── Concrete scenario ──────────────────────────────────────────────────

#[test]
fn seed_one_on_the_default_grid() {
    let p = generate_partition(1, &default_config()).unwrap();
    assert_eq!(p.split, QuadrantSplit { mid_x: 4, mid_y: 3 });
    assert_eq!((p.width, p.height), (11, 7));
    assert_eq!(p.regions.len(), 4);
    assert!(p.balance.converged);
    assert!(p.spread() <= 2);
    for region in &p.regions {
        assert!(region.area >= 18 && region.area <= 21, "{:?}", p.areas());
        let mut sorted = region.cells.clone();
        sorted.sort_by_key(|c| (c.y, c.x));
        assert_eq!(region.cells, sorted, "cells are row-major");
    }
}

// ── Connectivity ───────────────────────────────────────────────────────

#[test]
fn bridge_cell_cannot_be_reassigned() {
    // region 1 is a U whose bottom row holds it together
    let grid = Grid::from_rows(&[
        vec![1, 2, 1],
        vec![1, 2, 1],
        vec![1, 1, 1],
    ])
    .unwrap();
    assert!(!can_reassign(&grid, Cell::new(1, 2), 1));
    assert!(can_reassign(&grid, Cell::new(0, 0), 1));
}

#[test]
fn forced_disconnect_is_reported() {
    let mut p = generate_partition(4, &default_config()).unwrap();
    let region = &mut p.regions[0];
    let first = region.cells[0];
    let far = Cell::new(
        (first.x + p.width / 2) % p.width,
        (first.y + p.height / 2) % p.height,
    );
    region.cells = vec![first, far];
    region.area = 2;

    let errors = check_connectivity(&p);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, Severity::Error);
}

// ── Balancer limits ────────────────────────────────────────────────────

#[test]
fn unbalanced_layouts_are_soft_failures() {
    let mut config = default_config();
    config.balance.max_iterations = 0;

    let mut unconverged = 0;
    for seed in 1..=30 {
        let p = generate_partition(seed, &config).expect("soft failure still yields a layout");
        assert_hard_invariants(&p, &config);
        assert_eq!(p.balance.converged, p.spread() <= 2);
        if !p.balance.converged {
            unconverged += 1;
            let problems = validate_partition(&p, &config);
            assert!(problems.iter().any(|e| e.category == "balance"));
            assert!(errors_only(&problems).is_empty());
        }
    }
    assert!(unconverged > 0, "morph alone balanced every seed");
}

#[test]
fn area_floor_holds_through_generation() {
    let config = default_config();
    for seed in 1..=50 {
        let p = generate_partition(seed, &config).unwrap();
        assert!(check_area_floor(&p, config.area_floor).is_empty());
    }
}

// ── Config ─────────────────────────────────────────────────────────────

#[test]
fn config_errors_are_collected() {
    let mut config = GenerationConfig::with_size(3, 2);
    config.cell_size = -4.0;
    let errors = validate_config(&config);
    assert_eq!(errors.len(), 3);
    assert!(errors.contains(&ConfigError::InvalidCellSize(-4.0)));

    let err = generate_partition(1, &config).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidConfig(ref e) if e.len() == 3));
    assert!(err.to_string().starts_with("invalid generation config"));
}

#[test]
fn minimum_grid_generates() {
    let config = GenerationConfig::with_size(6, 4);
    let p = generate_partition(9, &config).unwrap();
    assert_eq!(p.split, QuadrantSplit { mid_x: 3, mid_y: 2 });
    assert_hard_invariants(&p, &config);
}

#[test]
fn long_thin_grids_generate() {
    for (width, height) in [(300, 7), (6, 120)] {
        let config = GenerationConfig::with_size(width, height);
        assert!(validate_config(&config).is_empty());

        let p = generate_partition(1, &config).expect("no upper bound on grid sides");
        assert_eq!((p.width, p.height), (width, height));
        assert_hard_invariants(&p, &config);
        assert_eq!(p.balance.converged, p.spread() <= config.balance.max_spread);
    }
}

// ── Randomized sweep ───────────────────────────────────────────────────

#[test]
fn random_seeds_and_sizes_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..60 {
        let width = rng.gen_range(6..=16);
        let height = rng.gen_range(4..=12);
        let seed: u64 = rng.gen();
        let config = GenerationConfig::with_size(width, height);

        let p = generate_partition(seed, &config).unwrap();
        assert_hard_invariants(&p, &config);
        if p.balance.converged {
            assert!(p.spread() <= config.balance.max_spread);
        }
        assert_eq!(p, generate_partition(seed, &config).unwrap());
    }
}

// ── Render paths ───────────────────────────────────────────────────────

#[test]
fn generated_regions_have_closed_outlines() {
    let config = default_config();
    for n in [1, 12, 25] {
        let level = generate_level(n, &config).unwrap();
        for region in &level.partition.regions {
            let loops = outline_loops(&region.cells);
            assert!(!loops.is_empty());
            assert!(loops.iter().all(|l| l.len() >= 4));
            assert!(perimeter(&region.cells) >= 4);

            let d = outline_path(&region.cells, config.cell_size);
            assert_eq!(d.matches('M').count(), loops.len());

            let (cx, cy) = centroid(&region.cells, config.cell_size).unwrap();
            assert!(cx > 0.0 && cx < config.width as f64 * config.cell_size);
            assert!(cy > 0.0 && cy < config.height as f64 * config.cell_size);
        }
    }
}
