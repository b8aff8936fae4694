//! Coin rotation mask file
//!
//! Each phase starts with a `P<n>` line (1-based) followed by 16 rows of 16
//! comma-separated values; any non-zero value is a lit pixel. Phases the
//! file leaves out keep their built-in mask.

use std::path::Path;

use crate::consts::{COIN_PHASES, MASK_SIZE};
use crate::error::{Error, Result};
use crate::sim::mask::{CoinMasks, PixelMask};

/// Parse coin masks from text
pub fn parse_coin_map(text: &str) -> Result<CoinMasks> {
    let defaults = CoinMasks::default();
    let mut phases: [PixelMask; COIN_PHASES as usize] =
        std::array::from_fn(|p| *defaults.phase(p as u32));
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

    while let Some((line_no, line)) = lines.next() {
        if line.is_empty() {
            continue;
        }
        let phase = line
            .strip_prefix('P')
            .and_then(|n| n.trim().parse::<u32>().ok())
            .filter(|n| (1..=COIN_PHASES).contains(n))
            .ok_or_else(|| Error::coin_map(line_no, format!("expected phase marker, found {line:?}")))?;

        let mut mask = PixelMask::EMPTY;
        for y in 0..MASK_SIZE {
            let (row_no, row) = lines
                .next()
                .ok_or_else(|| Error::coin_map(line_no, format!("phase {phase} ends after {y} rows")))?;
            let values: Vec<&str> = row.split(',').map(str::trim).collect();
            if values.len() != MASK_SIZE {
                return Err(Error::coin_map(
                    row_no,
                    format!("expected {MASK_SIZE} values, found {}", values.len()),
                ));
            }
            for (x, value) in values.into_iter().enumerate() {
                let value: i32 = value
                    .parse()
                    .map_err(|e| Error::coin_map(row_no, format!("bad value {value:?}: {e}")))?;
                mask.set(x, y, value != 0);
            }
        }
        phases[(phase - 1) as usize] = mask;
    }
    Ok(CoinMasks::from_phases(phases))
}

/// Read a coin map file
pub fn load_coin_map(path: &Path) -> Result<CoinMasks> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let masks = parse_coin_map(&text)?;
    log::info!("Loaded coin masks from {}", path.display());
    Ok(masks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_text(phase: u32, lit: (usize, usize)) -> String {
        let mut text = format!("P{phase}\n");
        for y in 0..MASK_SIZE {
            let row: Vec<&str> = (0..MASK_SIZE)
                .map(|x| if (x, y) == lit { "1" } else { "0" })
                .collect();
            text.push_str(&row.join(","));
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_overrides_listed_phases() {
        let masks = parse_coin_map(&phase_text(3, (4, 9))).unwrap();
        let phase = masks.phase(2);
        assert_eq!(phase.count(), 1);
        assert!(phase.is_set(4, 9));
        assert_eq!(masks.phase(0), CoinMasks::default().phase(0));
    }

    #[test]
    fn test_phase_out_of_range_is_rejected() {
        let err = parse_coin_map(&phase_text(9, (0, 0))).unwrap_err();
        assert!(matches!(err, Error::CoinMap { line: 1, .. }));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let mut text = phase_text(1, (0, 0));
        text = text.replacen("0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n", "0,0\n", 1);
        let err = parse_coin_map(&text).unwrap_err();
        assert!(matches!(err, Error::CoinMap { line: 3, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_coin_map(Path::new("/definitely/not/here/CoinMap.txt")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
