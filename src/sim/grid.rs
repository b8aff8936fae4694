//! Brick grid
//!
//! A fixed 40x30 field of cells. A cell with style 0 is empty; colour 1 marks
//! the grey brick that only the largest ball can knock out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::powerup::PowerupKind;
use crate::consts::{GREY_COLOUR, GRID_HEIGHT, GRID_WIDTH, POWERUP_CHANCE};

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub style: u8,
    pub colour: u8,
    pub powerup: Option<PowerupKind>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        style: 0,
        colour: 0,
        powerup: None,
    };

    /// A brick without a powerup; style 0 always yields an empty cell
    pub fn brick(style: u8, colour: u8) -> Self {
        if style == 0 {
            return Self::EMPTY;
        }
        Self {
            style,
            colour,
            powerup: None,
        }
    }

    #[inline]
    pub fn is_brick(&self) -> bool {
        self.style != 0
    }

    #[inline]
    pub fn is_grey(&self) -> bool {
        self.is_brick() && self.colour == GREY_COLOUR
    }

    /// Bricks that must be destroyed to clear a level
    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.is_brick() && self.colour > GREY_COLOUR
    }
}

/// Fixed-size brick field, indexed by (column, row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickGrid {
    cells: Vec<Cell>,
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickGrid {
    pub const WIDTH: usize = GRID_WIDTH;
    pub const HEIGHT: usize = GRID_HEIGHT;

    /// An empty grid
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::EMPTY; GRID_WIDTH * GRID_HEIGHT],
        }
    }

    #[inline]
    fn index(x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < GRID_WIDTH && y < GRID_HEIGHT).then_some(y * GRID_WIDTH + x)
    }

    /// Cell at (x, y); cells off the grid do not exist
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        Self::index(x, y).map(|i| &self.cells[i])
    }

    /// The brick at (x, y), if any
    pub fn brick_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.get(x, y).copied().filter(Cell::is_brick)
    }

    /// Overwrite a cell; returns false when (x, y) is off the grid
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(i) => {
                self.cells[i] = if cell.is_brick() { cell } else { Cell::EMPTY };
                true
            }
            None => false,
        }
    }

    /// Empty a cell, returning what was there
    pub fn take(&mut self, x: i32, y: i32) -> Option<Cell> {
        let i = Self::index(x, y)?;
        Some(std::mem::take(&mut self.cells[i]))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// All cells with their coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| ((i % GRID_WIDTH) as i32, (i / GRID_WIDTH) as i32, cell))
    }

    /// Bricks that must fall before the level is cleared
    pub fn destructible_count(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_destructible()).count() as u32
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(Cell::is_brick)
    }

    /// Attach random powerups to destructible bricks
    ///
    /// Each destructible brick has a one in [`POWERUP_CHANCE`] chance of
    /// carrying a powerup, whose kind is drawn from the weighted table.
    pub fn assign_powerups<R: Rng>(&mut self, rng: &mut R) -> u32 {
        let mut assigned = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_destructible()) {
            cell.powerup = None;
            if rng.random_range(0..POWERUP_CHANCE) == 0 {
                cell.powerup = Some(PowerupKind::from_draw(
                    rng.random_range(0..PowerupKind::DRAW_RANGE),
                ));
                assigned += 1;
            }
        }
        assigned
    }

    /// Same grid with every powerup removed
    pub fn without_powerups(&self) -> Self {
        let mut grid = self.clone();
        for cell in &mut grid.cells {
            cell.powerup = None;
        }
        grid
    }
}
