//! Line-oriented level text format
//!
//! ```text
//! M<max level>
//! B<brick styles>
//! L<id>
//! (style,colour)(style,colour)... 40 pairs per row, 30 rows
//! ```

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::sim::grid::{BrickGrid, Cell};

/// Every level in a level file plus its header values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLibrary {
    max_level: u32,
    brick_styles: u8,
    levels: BTreeMap<u32, BrickGrid>,
}

impl Default for LevelLibrary {
    fn default() -> Self {
        Self {
            max_level: 1,
            brick_styles: 1,
            levels: BTreeMap::new(),
        }
    }
}

impl LevelLibrary {
    pub fn new(brick_styles: u8) -> Self {
        Self {
            brick_styles: brick_styles.max(1),
            ..Default::default()
        }
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn brick_styles(&self) -> u8 {
        self.brick_styles
    }

    pub fn get(&self, id: u32) -> Option<&BrickGrid> {
        self.levels.get(&id)
    }

    /// Level ids present in the file, ascending
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }

    /// Store a level, raising the level count when it lies beyond it
    pub fn insert(&mut self, id: u32, grid: &BrickGrid) {
        if id > self.max_level {
            self.max_level = id;
        }
        self.levels.insert(id, grid.without_powerups());
    }

    /// Parse a level file
    pub fn parse(text: &str) -> Result<Self> {
        let mut library = Self::default();
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

        while let Some((line_no, line)) = lines.next() {
            if let Some(value) = line.strip_prefix('M') {
                library.max_level = parse_header(value, line_no)?.max(1);
            } else if let Some(value) = line.strip_prefix('B') {
                library.brick_styles = parse_header(value, line_no)?.clamp(1, u32::from(u8::MAX)) as u8;
            } else if let Some(value) = line.strip_prefix('L') {
                let id = parse_header(value, line_no)?;
                let mut grid = BrickGrid::new();
                for y in 0..BrickGrid::HEIGHT as i32 {
                    let (row_no, row) = lines.next().ok_or_else(|| {
                        Error::level_format(line_no, format!("level {id} ends after {y} rows"))
                    })?;
                    for (x, cell) in parse_row(row, row_no)?.into_iter().enumerate() {
                        grid.set(x as i32, y, cell);
                    }
                }
                if library.levels.insert(id, grid).is_some() {
                    log::warn!("Level {id} defined twice, keeping the later one");
                }
            } else if !line.is_empty() {
                return Err(Error::level_format(line_no, format!("unexpected line {line:?}")));
            }
        }
        Ok(library)
    }

    /// Render the library back to the text format
    pub fn to_text(&self) -> String {
        let mut out = format!("M{}\nB{}\n", self.max_level, self.brick_styles);
        for (id, grid) in &self.levels {
            out.push_str(&format!("L{id}\n"));
            for y in 0..BrickGrid::HEIGHT as i32 {
                for x in 0..BrickGrid::WIDTH as i32 {
                    let cell = grid.get(x, y).copied().unwrap_or_default();
                    out.push_str(&format!("({},{})", cell.style, cell.colour));
                }
                out.push('\n');
            }
        }
        out
    }
}

fn parse_header(value: &str, line_no: usize) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::level_format(line_no, format!("bad number {value:?}: {e}")))
}

fn parse_row(row: &str, line_no: usize) -> Result<Vec<Cell>> {
    let cells = row
        .split(')')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (style, colour) = pair
                .strip_prefix('(')
                .and_then(|pair| pair.split_once(','))
                .ok_or_else(|| Error::level_format(line_no, format!("bad brick {pair:?}")))?;
            let style = style.trim().parse::<u8>();
            let colour = colour.trim().parse::<u8>();
            match (style, colour) {
                (Ok(style), Ok(colour)) => Ok(Cell::brick(style, colour)),
                _ => Err(Error::level_format(line_no, format!("bad brick {pair:?}"))),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if cells.len() != BrickGrid::WIDTH {
        return Err(Error::level_format(
            line_no,
            format!("expected {} bricks, found {}", BrickGrid::WIDTH, cells.len()),
        ));
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blank_row() -> String {
        "(0,0)".repeat(BrickGrid::WIDTH)
    }

    fn level_text(id: u32, first_row: &str) -> String {
        let mut text = format!("L{id}\n{first_row}\n");
        for _ in 1..BrickGrid::HEIGHT {
            text.push_str(&blank_row());
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_headers_and_level() {
        let row = format!("(2,3)(0,7){}", "(0,0)".repeat(38));
        let text = format!("M2\nB4\n{}", level_text(1, &row));
        let library = LevelLibrary::parse(&text).unwrap();
        assert_eq!(library.max_level(), 2);
        assert_eq!(library.brick_styles(), 4);
        let grid = library.get(1).unwrap();
        assert_eq!(grid.brick_at(0, 0), Some(Cell::brick(2, 3)));
        // style 0 with a colour is still empty
        assert!(grid.brick_at(1, 0).is_none());
        assert_eq!(grid.destructible_count(), 1);
        assert!(library.get(2).is_none());
    }

    #[test]
    fn test_headers_floor_at_one() {
        let library = LevelLibrary::parse("M0\nB0\n").unwrap();
        assert_eq!(library.max_level(), 1);
        assert_eq!(library.brick_styles(), 1);
    }

    #[test]
    fn test_short_level_is_an_error() {
        let text = format!("M1\nB1\nL1\n{}\n", blank_row());
        let err = LevelLibrary::parse(&text).unwrap_err();
        assert!(matches!(err, Error::LevelFormat { line: 3, .. }));
    }

    #[test]
    fn test_short_row_reports_line() {
        let text = format!("M1\nB1\n{}", level_text(1, "(1,2)(1,2)"));
        let err = LevelLibrary::parse(&text).unwrap_err();
        assert!(matches!(err, Error::LevelFormat { line: 4, .. }));
    }

    #[test]
    fn test_insert_beyond_max_raises_it() {
        let mut library = LevelLibrary::new(3);
        let mut grid = BrickGrid::new();
        grid.set(4, 4, Cell::brick(1, 5));
        library.insert(2, &grid);
        assert_eq!(library.max_level(), 2);
        library.insert(1, &grid);
        assert_eq!(library.max_level(), 2);
        assert_eq!(library.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_to_text_layout() {
        let mut library = LevelLibrary::new(4);
        let mut grid = BrickGrid::new();
        grid.set(1, 0, Cell::brick(3, 6));
        library.insert(2, &grid);
        let text = library.to_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(&lines[..3], &["M2", "B4", "L2"]);
        assert_eq!(lines[3], format!("(0,0)(3,6){}", "(0,0)".repeat(38)));
        assert_eq!(lines.len(), 3 + BrickGrid::HEIGHT);
        assert!(text.ends_with('\n'));
    }

    fn cell() -> impl Strategy<Value = Cell> {
        (0u8..=5, 0u8..=9).prop_map(|(style, colour)| Cell::brick(style, colour))
    }

    proptest! {
        #[test]
        fn prop_text_round_trip(
            cells in prop::collection::vec(cell(), BrickGrid::WIDTH * BrickGrid::HEIGHT),
            id in 1u32..20,
            styles in 1u8..=9,
        ) {
            let mut grid = BrickGrid::new();
            for (i, cell) in cells.into_iter().enumerate() {
                let (x, y) = (i % BrickGrid::WIDTH, i / BrickGrid::WIDTH);
                grid.set(x as i32, y as i32, cell);
            }
            let mut library = LevelLibrary::new(styles);
            library.insert(id, &grid);
            let parsed = LevelLibrary::parse(&library.to_text()).unwrap();
            prop_assert_eq!(parsed.max_level(), id.max(1));
            prop_assert_eq!(parsed.brick_styles(), styles);
            prop_assert_eq!(parsed.get(id), Some(&grid));
        }
    }
}
