//! BFS connectivity oracle over 4-adjacent cells.
//!
//! Every reassignment proposed by the morph and balance phases is checked
//! here before it touches the grid. The checks only borrow the grid; a
//! hypothetical move is evaluated by treating the moving cell as foreign
//! instead of writing to a copy.

use std::collections::{HashSet, VecDeque};

use crate::grid::{Cell, Grid};

/// True iff every cell labelled `label` is reachable from every other one.
/// A label with no cells is connected.
pub fn is_label_connected(grid: &Grid, label: u8) -> bool {
    flood_fill_excluding(grid, label, None)
}

/// Would `label` stay connected if `cell` were handed to another region?
pub fn can_reassign(grid: &Grid, cell: Cell, label: u8) -> bool {
    flood_fill_excluding(grid, label, Some(cell))
}

fn flood_fill_excluding(grid: &Grid, label: u8, excluded: Option<Cell>) -> bool {
    let owned = |c: Cell| grid.get(c) == label && Some(c) != excluded;

    let Some(start) = grid.cells().find(|&c| owned(c)) else {
        return true;
    };
    let total = grid.cells().filter(|&c| owned(c)).count();

    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();
    visited[start.y * grid.width() + start.x] = true;
    queue.push_back(start);
    let mut reached = 1;

    while let Some(cell) = queue.pop_front() {
        for next in grid.neighbors(cell) {
            let idx = next.y * grid.width() + next.x;
            if !visited[idx] && owned(next) {
                visited[idx] = true;
                reached += 1;
                queue.push_back(next);
            }
        }
    }

    reached == total
}

/// Connectivity of a bare cell list, independent of any grid.
pub fn cells_connected(cells: &[Cell]) -> bool {
    let Some(&start) = cells.first() else {
        return true;
    };
    let members: HashSet<Cell> = cells.iter().copied().collect();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(Cell { x, y }) = queue.pop_front() {
        let candidates = [
            x.checked_sub(1).map(|nx| Cell::new(nx, y)),
            Some(Cell::new(x + 1, y)),
            y.checked_sub(1).map(|ny| Cell::new(x, ny)),
            Some(Cell::new(x, y + 1)),
        ];
        for next in candidates.into_iter().flatten() {
            if members.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.len() == members.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Region 1 is a "U" whose two arms are joined only through (1, 2).
    fn bridge_grid() -> Grid {
        Grid::from_rows(&[
            vec![1, 2, 1],
            vec![1, 2, 1],
            vec![1, 1, 1],
            vec![3, 3, 4],
        ])
        .unwrap()
    }

    #[test]
    fn rectangles_are_connected() {
        let grid = Grid::from_rows(&[vec![1, 1, 2], vec![1, 1, 2]]).unwrap();
        assert!(is_label_connected(&grid, 1));
        assert!(is_label_connected(&grid, 2));
    }

    #[test]
    fn split_label_is_disconnected() {
        let grid = Grid::from_rows(&[vec![1, 2, 1]]).unwrap();
        assert!(!is_label_connected(&grid, 1));
    }

    #[test]
    fn diagonal_contact_is_not_adjacency() {
        let grid = Grid::from_rows(&[vec![1, 2], vec![2, 1]]).unwrap();
        assert!(!is_label_connected(&grid, 1));
    }

    #[test]
    fn empty_label_is_connected() {
        let grid = Grid::from_rows(&[vec![1, 1]]).unwrap();
        assert!(is_label_connected(&grid, 3));
        assert!(cells_connected(&[]));
    }

    #[test]
    fn removing_sole_connector_is_rejected() {
        let grid = bridge_grid();
        assert!(!can_reassign(&grid, Cell::new(1, 2), 1));
        // leaf cells at the arm tips are safe
        assert!(can_reassign(&grid, Cell::new(0, 0), 1));
        assert!(can_reassign(&grid, Cell::new(2, 0), 1));
    }

    #[test]
    fn can_reassign_leaves_grid_untouched() {
        let grid = bridge_grid();
        let before = grid.clone();
        let _ = can_reassign(&grid, Cell::new(1, 2), 1);
        assert_eq!(grid, before);
    }

    #[test]
    fn last_cell_may_leave() {
        let grid = bridge_grid();
        assert!(can_reassign(&grid, Cell::new(2, 3), 4));
    }

    #[test]
    fn cell_list_connectivity() {
        let line = [Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)];
        assert!(cells_connected(&line));
        let gap = [Cell::new(0, 0), Cell::new(2, 0)];
        assert!(!cells_connected(&gap));
    }
}
