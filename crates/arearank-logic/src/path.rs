//! Boundary derivation — SVG path data and anchors from a region's cells.
//!
//! Everything here is a pure function of a cell list and a cell size, so a
//! renderer can rebuild a region's outline from the `Region` record alone.

use std::collections::{BTreeMap, HashSet};

use crate::grid::Cell;

/// A grid corner, `(x, y)` in cell units.
pub type Corner = (usize, usize);

/// One closed unit-square subpath per cell. A nonzero fill merges them.
pub fn cells_to_path(cells: &[Cell], cell_size: f64) -> String {
    cells
        .iter()
        .map(|c| {
            let x0 = c.x as f64 * cell_size;
            let y0 = c.y as f64 * cell_size;
            let x1 = (c.x + 1) as f64 * cell_size;
            let y1 = (c.y + 1) as f64 * cell_size;
            format!("M{x0},{y0} L{x1},{y0} L{x1},{y1} L{x0},{y1} Z")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Directed outline edges, clockwise on screen (y grows downward). Only
/// edges with no member cell on the other side are kept.
fn outline_edges(cells: &[Cell]) -> BTreeMap<(usize, usize), Vec<Corner>> {
    let members: HashSet<Cell> = cells.iter().copied().collect();
    let has = |x: Option<usize>, y: Option<usize>| match (x, y) {
        (Some(x), Some(y)) => members.contains(&Cell::new(x, y)),
        _ => false,
    };

    // keyed by (y, x) of the start corner so walks begin at the top-left
    let mut edges: BTreeMap<(usize, usize), Vec<Corner>> = BTreeMap::new();
    let mut push = |from: Corner, to: Corner| {
        edges.entry((from.1, from.0)).or_default().push(to);
    };

    for c in &members {
        let (x, y) = (c.x, c.y);
        if !has(Some(x), y.checked_sub(1)) {
            push((x, y), (x + 1, y));
        }
        if !has(Some(x + 1), Some(y)) {
            push((x + 1, y), (x + 1, y + 1));
        }
        if !has(Some(x), Some(y + 1)) {
            push((x + 1, y + 1), (x, y + 1));
        }
        if !has(x.checked_sub(1), Some(y)) {
            push((x, y + 1), (x, y));
        }
    }
    for targets in edges.values_mut() {
        targets.sort_unstable_by_key(|&(x, y)| (y, x));
    }
    edges
}

fn direction(a: Corner, b: Corner) -> (i64, i64) {
    (
        (b.0 as i64 - a.0 as i64).signum(),
        (b.1 as i64 - a.1 as i64).signum(),
    )
}

/// Drop corners that sit on a straight run.
fn simplify(corners: Vec<Corner>) -> Vec<Corner> {
    let n = corners.len();
    if n < 3 {
        return corners;
    }
    (0..n)
        .filter(|&i| {
            let prev = corners[(i + n - 1) % n];
            let next = corners[(i + 1) % n];
            direction(prev, corners[i]) != direction(corners[i], next)
        })
        .map(|i| corners[i])
        .collect()
}

/// Closed outline loops of the cell set, holes included.
///
/// Every corner has as many outgoing as incoming outline edges, so each
/// walk returns to its start.
pub fn outline_loops(cells: &[Cell]) -> Vec<Vec<Corner>> {
    let mut edges = outline_edges(cells);
    let mut loops = Vec::new();

    loop {
        let Some(&(sy, sx)) = edges.keys().next() else {
            break;
        };
        let start = (sx, sy);
        let mut corners = vec![start];
        let mut at = start;
        loop {
            let key = (at.1, at.0);
            let Some(targets) = edges.get_mut(&key) else {
                break;
            };
            let next = targets.remove(0);
            if targets.is_empty() {
                edges.remove(&key);
            }
            if next == start {
                break;
            }
            corners.push(next);
            at = next;
        }
        loops.push(simplify(corners));
    }
    loops
}

/// The merged outline as SVG path data, one subpath per loop.
pub fn outline_path(cells: &[Cell], cell_size: f64) -> String {
    outline_loops(cells)
        .iter()
        .filter(|corners| !corners.is_empty())
        .map(|corners| {
            let mut d = String::new();
            for (i, &(x, y)) in corners.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                if i > 0 {
                    d.push(' ');
                }
                d.push_str(&format!(
                    "{}{},{}",
                    cmd,
                    x as f64 * cell_size,
                    y as f64 * cell_size
                ));
            }
            d.push_str(" Z");
            d
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of unit edges on the outline (outer boundary plus holes).
pub fn perimeter(cells: &[Cell]) -> usize {
    outline_edges(cells).values().map(Vec::len).sum()
}

/// Mean cell centre in render units; the anchor for markers and labels.
pub fn centroid(cells: &[Cell], cell_size: f64) -> Option<(f64, f64)> {
    if cells.is_empty() {
        return None;
    }
    let n = cells.len() as f64;
    let mean_x = cells.iter().map(|c| c.x as f64).sum::<f64>() / n;
    let mean_y = cells.iter().map(|c| c.y as f64).sum::<f64>() / n;
    Some((
        mean_x * cell_size + cell_size / 2.0,
        mean_y * cell_size + cell_size / 2.0,
    ))
}
