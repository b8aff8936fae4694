//! Pixel masks for balls and coins
//!
//! A mask is a 16x16 grid of lit pixels stored one `u16` per row, with
//! column 0 in the most significant bit so the table below reads left to
//! right as drawn.

use crate::consts::{COIN_PHASES, MASK_SIZE, MAX_BALL_SIZE, MIN_BALL_SIZE};

/// 16x16 boolean pixel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelMask {
    rows: [u16; MASK_SIZE],
}

impl PixelMask {
    pub const EMPTY: PixelMask = PixelMask {
        rows: [0; MASK_SIZE],
    };

    pub const fn from_rows(rows: [u16; MASK_SIZE]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[u16; MASK_SIZE] {
        &self.rows
    }

    #[inline]
    fn bit(x: usize) -> u16 {
        1 << (MASK_SIZE - 1 - x)
    }

    /// Whether pixel (x, y) is lit; out-of-range pixels are dark
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < MASK_SIZE && y < MASK_SIZE && self.rows[y] & Self::bit(x) != 0
    }

    pub fn set(&mut self, x: usize, y: usize, lit: bool) {
        if x >= MASK_SIZE || y >= MASK_SIZE {
            return;
        }
        if lit {
            self.rows[y] |= Self::bit(x);
        } else {
            self.rows[y] &= !Self::bit(x);
        }
    }

    /// Number of lit pixels
    pub fn count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Leftmost lit column in row `y`
    pub fn leftmost_in_row(&self, y: usize) -> Option<usize> {
        let row = *self.rows.get(y)?;
        (row != 0).then(|| row.leading_zeros() as usize)
    }

    /// Rightmost lit column in row `y`
    pub fn rightmost_in_row(&self, y: usize) -> Option<usize> {
        let row = *self.rows.get(y)?;
        (row != 0).then(|| MASK_SIZE - 1 - row.trailing_zeros() as usize)
    }

    /// Lowest lit row in column `x`
    pub fn lowest_in_column(&self, x: usize) -> Option<usize> {
        (0..MASK_SIZE).rev().find(|&y| self.is_set(x, y))
    }
}

/// Ball shapes for sizes 1 to 7
///
/// Hand-tuned nested rings with notched corners. The size 5 shape is
/// lopsided and the size 7 shape is hollow; collisions depend on both exactly
/// as listed.
const BALL_MASKS: [[u16; MASK_SIZE]; MAX_BALL_SIZE as usize] = [
    // Size 1
    [
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0011_1100_0000,
        0b0000_0011_1100_0000,
        0b0000_0011_1100_0000,
        0b0000_0011_1100_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
    ],
    // Size 2
    [
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0011_1100_0000,
        0b0000_0111_1110_0000,
        0b0000_0111_1110_0000,
        0b0000_0111_1110_0000,
        0b0000_0111_1110_0000,
        0b0000_0011_1100_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
    ],
    // Size 3
    [
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0011_1100_0000,
        0b0000_0111_1110_0000,
        0b0000_1111_1111_0000,
        0b0000_1111_1111_0000,
        0b0000_1111_1111_0000,
        0b0000_1111_1111_0000,
        0b0000_0111_1110_0000,
        0b0000_0011_1100_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
    ],
    // Size 4
    [
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0011_1100_0000,
        0b0000_0111_1110_0000,
        0b0000_1111_1111_0000,
        0b0001_1111_1111_1000,
        0b0001_1111_1111_1000,
        0b0001_1111_1111_1000,
        0b0001_1111_1111_1000,
        0b0000_1111_1111_0000,
        0b0000_0111_1110_0000,
        0b0000_0011_1100_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
    ],
    // Size 5
    [
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0011_1100_0000,
        0b0000_0011_1100_0000,
        0b0000_0011_1100_0000,
        0b0000_0111_1111_1000,
        0b0011_1111_1111_1100,
        0b0011_1111_1111_1100,
        0b0011_1111_1111_1100,
        0b0011_1111_1111_1100,
        0b0000_0111_1111_1000,
        0b0000_0111_1111_1000,
        0b0000_0111_1111_0000,
        0b0000_0011_1100_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
    ],
    // Size 6
    [
        0b0000_0000_0000_0000,
        0b0000_0011_1100_0000,
        0b0000_1111_1111_0000,
        0b0001_1111_1111_1000,
        0b0011_1111_1111_1100,
        0b0011_1111_1111_1100,
        0b0111_1111_1111_1110,
        0b0111_1111_1111_1110,
        0b0111_1111_1111_1110,
        0b0111_1111_1111_1110,
        0b0011_1111_1111_1100,
        0b0011_1111_1111_1100,
        0b0001_1111_1111_1000,
        0b0000_1111_1111_0000,
        0b0000_0011_1100_0000,
        0b0000_0000_0000_0000,
    ],
    // Size 7
    [
        0b0000_0000_0000_0000,
        0b0000_1100_0011_0000,
        0b0001_1100_0011_1000,
        0b0011_1100_0011_1100,
        0b0111_1100_0011_1110,
        0b0111_1100_0011_1110,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0000_0000_0000_0000,
        0b0111_1100_0011_1110,
        0b0111_1100_0011_1110,
        0b0011_1100_0011_1100,
        0b0001_1100_0011_1000,
        0b0000_1100_0011_0000,
        0b0000_0000_0000_0000,
    ],
];

/// Mask for a ball of the given size; sizes outside 1..=7 have no pixels
pub fn ball_mask(size: u8) -> PixelMask {
    if (MIN_BALL_SIZE..=MAX_BALL_SIZE).contains(&size) {
        PixelMask::from_rows(BALL_MASKS[(size - 1) as usize])
    } else {
        PixelMask::EMPTY
    }
}

/// Half widths of the face-on coin rows 2..=13
const COIN_FACE: [i32; 12] = [2, 4, 5, 5, 6, 6, 6, 6, 5, 5, 4, 2];
/// Horizontal squash per rotation phase, in sixths
const COIN_SQUASH: [i32; COIN_PHASES as usize] = [6, 5, 3, 1, 1, 3, 5, 6];

/// Hit-test masks for the eight coin rotation phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinMasks {
    phases: [PixelMask; COIN_PHASES as usize],
}

impl Default for CoinMasks {
    /// A spinning disc that narrows to a sliver edge-on
    fn default() -> Self {
        let mut phases = [PixelMask::EMPTY; COIN_PHASES as usize];
        for (mask, squash) in phases.iter_mut().zip(COIN_SQUASH) {
            for (row, half) in COIN_FACE.iter().enumerate() {
                let half = ((half * squash + 3) / 6).max(1);
                for x in (8 - half)..=(7 + half) {
                    mask.set(x as usize, row + 2, true);
                }
            }
        }
        Self { phases }
    }
}

impl CoinMasks {
    pub fn from_phases(phases: [PixelMask; COIN_PHASES as usize]) -> Self {
        Self { phases }
    }

    /// Mask for a rotation phase (wraps past the last phase)
    pub fn phase(&self, phase: u32) -> &PixelMask {
        &self.phases[(phase % COIN_PHASES) as usize]
    }
}
