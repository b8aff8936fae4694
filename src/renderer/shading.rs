//! Brick edge shading
//!
//! Runs of identical bricks are drawn as one shaded block: each brick picks a
//! tile from the brick sheet by which of its four sides touch a matching
//! brick, then overlays inverse corner shades where two matching sides meet
//! around a non-matching diagonal.

use glam::IVec2;

use crate::sim::grid::{BrickGrid, Cell};

/// Which neighbours hold a brick of the same style and colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbours {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

/// Corner overlays, in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Look up the matching neighbours of the brick at (x, y); off-grid never matches
pub fn neighbours(grid: &BrickGrid, x: i32, y: i32) -> Neighbours {
    let Some(cell) = grid.brick_at(x, y) else {
        return Neighbours::default();
    };
    let same = |dx: i32, dy: i32| {
        grid.get(x + dx, y + dy)
            .is_some_and(|other| other.style == cell.style && other.colour == cell.colour)
    };
    Neighbours {
        top: same(0, -1),
        bottom: same(0, 1),
        left: same(-1, 0),
        right: same(1, 0),
        top_left: same(-1, -1),
        top_right: same(1, -1),
        bottom_left: same(-1, 1),
        bottom_right: same(1, 1),
    }
}

/// Unshaded tile of a brick in the sheet (in 16px tiles)
fn centre_tile(cell: &Cell) -> IVec2 {
    IVec2::new(i32::from(cell.style) * 10 - 8, i32::from(cell.colour) * 3 - 2)
}

/// Sheet tile for a brick with the given matching sides
pub fn edge_tile(cell: &Cell, n: Neighbours) -> IVec2 {
    let offset = match (n.top, n.bottom, n.left, n.right) {
        (true, true, true, true) => (0, 0),
        (true, true, true, false) => (1, 0),
        (true, true, false, true) => (-1, 0),
        (true, true, false, false) => (2, -1),
        (true, false, true, true) => (0, 1),
        (true, false, true, false) => (1, 1),
        (true, false, false, true) => (-1, 1),
        (true, false, false, false) => (3, 1),
        (false, true, true, true) => (0, -1),
        (false, true, true, false) => (1, -1),
        (false, true, false, true) => (-1, -1),
        (false, true, false, false) => (3, -1),
        (false, false, true, true) => (2, 1),
        (false, false, true, false) => (4, 1),
        (false, false, false, true) => (2, 0),
        (false, false, false, false) => (3, 0),
    };
    centre_tile(cell) + IVec2::from(offset)
}

/// Inside corners that need an inverse shade
pub fn corners(n: Neighbours) -> impl Iterator<Item = Corner> {
    [
        (Corner::TopLeft, n.top && n.left && !n.top_left),
        (Corner::TopRight, n.top && n.right && !n.top_right),
        (Corner::BottomLeft, n.bottom && n.left && !n.bottom_left),
        (Corner::BottomRight, n.bottom && n.right && !n.bottom_right),
    ]
    .into_iter()
    .filter_map(|(corner, shaded)| shaded.then_some(corner))
}

/// Sheet tile of a corner overlay
pub fn corner_tile(cell: &Cell, corner: Corner) -> IVec2 {
    let column = match corner {
        Corner::TopLeft => 4,
        Corner::TopRight => 5,
        Corner::BottomLeft => 6,
        Corner::BottomRight => 7,
    };
    centre_tile(cell) + IVec2::new(column, -1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(cells: &[(i32, i32)], style: u8, colour: u8) -> BrickGrid {
        let mut grid = BrickGrid::new();
        for &(x, y) in cells {
            grid.set(x, y, Cell::brick(style, colour));
        }
        grid
    }

    #[test]
    fn test_lone_brick_is_fully_shaded() {
        let grid = block(&[(5, 5)], 1, 4);
        let n = neighbours(&grid, 5, 5);
        assert_eq!(n, Neighbours::default());
        let cell = Cell::brick(1, 4);
        assert_eq!(edge_tile(&cell, n), IVec2::new(2 + 3, 10));
        assert_eq!(corners(n).count(), 0);
    }

    #[test]
    fn test_horizontal_run() {
        let grid = block(&[(4, 5), (5, 5), (6, 5)], 2, 3);
        let cell = Cell::brick(2, 3);
        let centre = IVec2::new(12, 7);
        assert_eq!(edge_tile(&cell, neighbours(&grid, 4, 5)), centre + IVec2::new(2, 0));
        assert_eq!(edge_tile(&cell, neighbours(&grid, 5, 5)), centre + IVec2::new(2, 1));
        assert_eq!(edge_tile(&cell, neighbours(&grid, 6, 5)), centre + IVec2::new(4, 1));
    }

    #[test]
    fn test_different_colour_breaks_the_run() {
        let mut grid = block(&[(4, 5), (5, 5)], 2, 3);
        grid.set(5, 5, Cell::brick(2, 4));
        assert!(!neighbours(&grid, 4, 5).right);
    }

    #[test]
    fn test_inside_corner() {
        // an L of three bricks: the corner brick sees top and right but not the diagonal
        let grid = block(&[(5, 4), (5, 5), (6, 5)], 1, 2);
        let n = neighbours(&grid, 5, 5);
        assert!(n.top && n.right && !n.top_right);
        assert_eq!(corners(n).collect::<Vec<_>>(), vec![Corner::TopRight]);
        assert_eq!(corner_tile(&Cell::brick(1, 2), Corner::TopRight), IVec2::new(2 + 5, 4 - 1));
    }

    #[test]
    fn test_grid_edges_never_match() {
        let grid = block(&[(0, 0), (39, 29)], 1, 2);
        assert_eq!(neighbours(&grid, 0, 0), Neighbours::default());
        assert_eq!(neighbours(&grid, 39, 29), Neighbours::default());
    }
}
