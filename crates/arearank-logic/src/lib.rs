//! Level generation logic for AreaRank.
//!
//! AreaRank shows the player four irregular regions tiling a small grid and
//! asks which one is largest. This crate builds those layouts. Functions
//! take plain data and return results; there is no rendering, input or
//! timing code here, so the same logic serves the game client and the
//! native simtest harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`balance`] | Area balancer: largest → smallest transfers, rescue morphs |
//! | [`connectivity`] | BFS connectivity oracle for proposed cell moves |
//! | [`constants`] | Grid defaults, region labels, colours, tuning knobs |
//! | [`generator`] | `generate_partition` entry point, config, ranking |
//! | [`grid`] | Label grid and incrementally maintained region cell lists |
//! | [`levels`] | 30-level catalogue, wrap-around, placings, region views |
//! | [`morph`] | Boundary morphing into organic region shapes |
//! | [`path`] | SVG path data, outlines and anchors from cell lists |
//! | [`quadrants`] | Seeded quadrant initialiser |
//! | [`rng`] | Level LCG (`state * 9301 + 49297 mod 233280`) |
//! | [`validation`] | Tiling, connectivity, area floor, balance, rank checks |

pub mod balance;
pub mod connectivity;
pub mod constants;
pub mod generator;
pub mod grid;
pub mod levels;
pub mod morph;
pub mod path;
pub mod quadrants;
pub mod rng;
pub mod validation;
