//! AreaRank Headless Generation Harness
//!
//! Generates levels and seed sweeps with the pure logic crate and checks
//! every partition invariant. Runs entirely in-process: no rendering, no
//! input.
//!
//! Usage:
//!   cargo run -p arearank-simtest
//!   cargo run -p arearank-simtest -- --seeds 500 --random 200 --verbose
//!   cargo run -p arearank-simtest -- --levels --export levels.json

use std::path::{Path, PathBuf};

use arearank_logic::constants::LEVEL_COUNT;
use arearank_logic::generator::{generate_partition, GenerationConfig, Partition};
use arearank_logic::levels::{self, Level, RegionView};
use arearank_logic::path::outline_loops;
use arearank_logic::validation::{errors_only, validate_partition};
use clap::Parser;
use rand::Rng;
use serde::Serialize;

/// AreaRank level generation harness
#[derive(Parser, Debug)]
#[command(name = "arearank-simtest", version, about)]
struct Cli {
    /// Only check the level catalogue, skip the seed sweeps
    #[arg(long)]
    levels: bool,

    /// Sweep seeds 1..=N
    #[arg(long, value_name = "N", default_value_t = 300)]
    seeds: u64,

    /// Additionally sweep N randomly chosen seeds
    #[arg(long, value_name = "N", default_value_t = 0)]
    random: u32,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Generation config as JSON; missing fields take defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the generated levels with render paths as JSON
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Print every check, not just failures
    #[arg(long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Sweep totals for one batch of seeds.
#[derive(Default)]
struct SweepStats {
    generated: usize,
    hard_failures: Vec<String>,
    unconverged: Vec<u64>,
    rescued: usize,
    max_spread: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    println!("=== AreaRank Generation Harness ===\n");

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    println!(
        "Grid {}x{}, morph {} attempts (±{}), balance {} iterations (spread ≤ {})\n",
        config.width,
        config.height,
        config.morph.max_attempts,
        config.morph.area_tolerance,
        config.balance.max_iterations,
        config.balance.max_spread
    );

    let mut results = Vec::new();

    // 1. Level catalogue
    let (level_results, catalogue) = validate_levels(&config, cli.verbose);
    results.extend(level_results);

    if !cli.levels {
        // 2. Sequential seed sweep
        results.extend(validate_seed_sweep(&config, cli.seeds, cli.verbose));

        // 3. Random seed sweep
        if cli.random > 0 {
            results.extend(validate_random_sweep(&config, cli.random, cli.verbose));
        }
    }

    // 4. Export
    if let Some(path) = &cli.export {
        results.push(export_levels(path, &config, &catalogue));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || cli.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<GenerationConfig, String> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {}", path.display(), e))?;
            serde_json::from_str(&text).map_err(|e| format!("parsing {}: {}", path.display(), e))?
        }
        None => GenerationConfig::default(),
    };
    if let Some(w) = cli.width {
        config.width = w;
    }
    if let Some(h) = cli.height {
        config.height = h;
    }
    Ok(config)
}

// ── 1. Level Catalogue ──────────────────────────────────────────────────

fn validate_levels(config: &GenerationConfig, verbose: bool) -> (Vec<TestResult>, Vec<Level>) {
    println!("--- Level Catalogue ---");
    let mut results = Vec::new();

    let catalogue = match levels::generate_campaign(config) {
        Ok(levels) => levels,
        Err(e) => {
            results.push(TestResult {
                name: "levels_generate".into(),
                passed: false,
                detail: e.to_string(),
            });
            return (results, Vec::new());
        }
    };

    results.push(TestResult {
        name: "levels_generate".into(),
        passed: catalogue.len() == LEVEL_COUNT as usize,
        detail: format!("{} levels generated", catalogue.len()),
    });

    // Every level clean: hard invariants and balance
    let dirty: Vec<String> = catalogue
        .iter()
        .filter_map(|level| {
            let problems = validate_partition(&level.partition, config);
            (!problems.is_empty()).then(|| format!("level {}: {}", level.number, problems[0]))
        })
        .collect();
    results.push(TestResult {
        name: "levels_valid".into(),
        passed: dirty.is_empty(),
        detail: if dirty.is_empty() {
            "all levels tile, connect, balance and rank correctly".into()
        } else {
            dirty.join("; ")
        },
    });

    // Exactly one winning region per level
    let ambiguous: Vec<u32> = catalogue
        .iter()
        .filter(|level| {
            let winners = level
                .partition
                .regions
                .iter()
                .filter(|r| level.is_largest(r.id))
                .count();
            winners != 1
        })
        .map(|level| level.number)
        .collect();
    results.push(TestResult {
        name: "levels_single_answer".into(),
        passed: ambiguous.is_empty(),
        detail: if ambiguous.is_empty() {
            "one largest region per level".into()
        } else {
            format!("levels without a single answer: {:?}", ambiguous)
        },
    });

    // Same seed, same layout
    let repeat = levels::generate_level(1, config);
    let deterministic = matches!(
        (&repeat, catalogue.first()),
        (Ok(again), Some(first)) if again == first
    );
    results.push(TestResult {
        name: "levels_deterministic".into(),
        passed: deterministic,
        detail: "level 1 regenerates identically".into(),
    });

    // Outlines close for every region
    let open: usize = catalogue
        .iter()
        .flat_map(|level| level.partition.regions.iter())
        .filter(|r| outline_loops(&r.cells).is_empty())
        .count();
    results.push(TestResult {
        name: "levels_outlines".into(),
        passed: open == 0,
        detail: format!("{} regions without an outline", open),
    });

    if verbose {
        println!("  Areas by level (smallest → largest):");
        for level in &catalogue {
            let p = &level.partition;
            println!(
                "    {:2}: {:?} split ({},{}) balance {} iters, {} rescues",
                level.number,
                p.areas(),
                p.split.mid_x,
                p.split.mid_y,
                p.balance.iterations,
                p.balance.rescues
            );
        }
    }

    (results, catalogue)
}

// ── 2. Seed Sweeps ──────────────────────────────────────────────────────

fn sweep(config: &GenerationConfig, seeds: impl IntoIterator<Item = u64>) -> SweepStats {
    let mut stats = SweepStats::default();
    for seed in seeds {
        match generate_partition(seed, config) {
            Ok(p) => {
                stats.generated += 1;
                record(&mut stats, &p, config);
            }
            Err(e) => {
                log::warn!("Seed {} failed to generate: {}", seed, e);
                stats.hard_failures.push(format!("seed {}: {}", seed, e));
            }
        }
    }
    log::info!(
        "Swept {} seeds: {} hard failures, {} unconverged, {} rescued, worst spread {}",
        stats.generated + stats.hard_failures.len(),
        stats.hard_failures.len(),
        stats.unconverged.len(),
        stats.rescued,
        stats.max_spread
    );
    stats
}

fn record(stats: &mut SweepStats, p: &Partition, config: &GenerationConfig) {
    let problems = validate_partition(p, config);
    if let Some(first) = errors_only(&problems).first() {
        log::warn!("Seed {} broke an invariant: {}", p.seed, first);
        stats
            .hard_failures
            .push(format!("seed {}: {}", p.seed, first));
    }
    if !p.balance.converged {
        log::debug!("Seed {} stopped at spread {}", p.seed, p.spread());
        stats.unconverged.push(p.seed);
    }
    if p.balance.rescues > 0 {
        stats.rescued += 1;
    }
    stats.max_spread = stats.max_spread.max(p.spread());
}

fn sweep_results(prefix: &str, stats: &SweepStats, verbose: bool) -> Vec<TestResult> {
    let mut results = vec![TestResult {
        name: format!("{}_invariants", prefix),
        passed: stats.hard_failures.is_empty(),
        detail: if stats.hard_failures.is_empty() {
            format!("{} partitions tile and connect", stats.generated)
        } else {
            format!(
                "{} failures, first: {}",
                stats.hard_failures.len(),
                stats.hard_failures[0]
            )
        },
    }];

    // Non-convergence is allowed, so it never fails the run
    let converged = stats.generated - stats.unconverged.len();
    results.push(TestResult {
        name: format!("{}_convergence", prefix),
        passed: true,
        detail: format!(
            "{}/{} converged, {} needed a rescue morph, worst spread {}",
            converged, stats.generated, stats.rescued, stats.max_spread
        ),
    });

    if verbose && !stats.unconverged.is_empty() {
        println!("  Unconverged seeds: {:?}", stats.unconverged);
    }
    results
}

fn validate_seed_sweep(config: &GenerationConfig, count: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Seed Sweep (1..={}) ---", count);
    let stats = sweep(config, 1..=count);
    sweep_results("sweep", &stats, verbose)
}

fn validate_random_sweep(config: &GenerationConfig, count: u32, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Sweep ({} seeds) ---", count);
    let mut rng = rand::thread_rng();
    let seeds: Vec<u64> = (0..count).map(|_| rng.gen()).collect();
    let stats = sweep(config, seeds);
    sweep_results("random", &stats, verbose)
}

// ── 3. Export ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LevelExport<'a> {
    number: u32,
    seed: u64,
    width: usize,
    height: usize,
    rows: Vec<Vec<u8>>,
    regions: Vec<RegionView>,
    partition: &'a Partition,
}

#[derive(Serialize)]
struct Export<'a> {
    config: &'a GenerationConfig,
    levels: Vec<LevelExport<'a>>,
}

fn export_levels(path: &Path, config: &GenerationConfig, catalogue: &[Level]) -> TestResult {
    println!("--- Export ---");
    let export = Export {
        config,
        levels: catalogue
            .iter()
            .map(|level| LevelExport {
                number: level.number,
                seed: level.partition.seed,
                width: level.partition.width,
                height: level.partition.height,
                rows: level.partition.grid.rows(),
                regions: level.region_views(config.cell_size),
                partition: &level.partition,
            })
            .collect(),
    };

    let written = serde_json::to_string_pretty(&export)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));

    TestResult {
        name: "export".into(),
        passed: written.is_ok(),
        detail: match written {
            Ok(()) => format!("{} levels written to {}", catalogue.len(), path.display()),
            Err(e) => format!("writing {}: {}", path.display(), e),
        },
    }
}
