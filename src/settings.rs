//! Game settings
//!
//! Stored as JSON beside the level files. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_VOICES, TICK_MILLIS};
use crate::error::{Error, Result};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on at startup
    pub sound_enabled: bool,
    /// Concurrent sound voices
    pub max_voices: usize,

    // === Simulation ===
    /// Fixed tick period in milliseconds
    pub tick_millis: u64,
    /// RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,

    // === Data files ===
    /// Editable level file
    pub levels_path: PathBuf,
    /// Pristine copy used to restore the shipped levels
    pub original_levels_path: PathBuf,
    /// Coin rotation masks; built-in masks when absent
    pub coin_map_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            sound_enabled: true,
            max_voices: MAX_VOICES,

            // Simulation
            tick_millis: TICK_MILLIS,
            seed: None,

            // Data files
            levels_path: PathBuf::from("Levels.txt"),
            original_levels_path: PathBuf::from("OriginalLevels.txt"),
            coin_map_path: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}
