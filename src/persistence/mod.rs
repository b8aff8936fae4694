//! Level data store
//!
//! Features:
//! - [`LevelStore`] seam between the simulation and level storage
//! - Line-oriented level text format ([`level_file`])
//! - Coin mask files ([`coin_map`])
//! - Atomic rewrite on save (tmp file, then rename); a failed write leaves the held levels unchanged
//! - Restore from a pristine copy of the shipped levels

pub mod coin_map;
pub mod level_file;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sim::grid::BrickGrid;
pub use coin_map::{load_coin_map, parse_coin_map};
pub use level_file::LevelLibrary;

/// Source and sink of level layouts
pub trait LevelStore {
    /// Layout of level `id`; `None` when missing or unreadable
    fn load_level(&self, id: u32) -> Option<BrickGrid>;

    /// Write level `id`, appending it when it lies beyond [`LevelStore::max_level`]
    fn save_level(&mut self, id: u32, grid: &BrickGrid) -> Result<()>;

    fn max_level(&self) -> u32;

    fn brick_style_count(&self) -> u8;

    /// Replace every level with the shipped originals
    fn restore_originals(&mut self) -> Result<()>;
}

/// In-memory store, used by tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryLevelStore {
    library: LevelLibrary,
    originals: LevelLibrary,
}

impl MemoryLevelStore {
    pub fn new(library: LevelLibrary) -> Self {
        Self {
            originals: library.clone(),
            library,
        }
    }

    pub fn library(&self) -> &LevelLibrary {
        &self.library
    }
}

impl LevelStore for MemoryLevelStore {
    fn load_level(&self, id: u32) -> Option<BrickGrid> {
        self.library.get(id).cloned()
    }

    fn save_level(&mut self, id: u32, grid: &BrickGrid) -> Result<()> {
        self.library.insert(id, grid);
        Ok(())
    }

    fn max_level(&self) -> u32 {
        self.library.max_level()
    }

    fn brick_style_count(&self) -> u8 {
        self.library.brick_styles()
    }

    fn restore_originals(&mut self) -> Result<()> {
        self.library = self.originals.clone();
        Ok(())
    }
}

/// Store backed by a level text file
#[derive(Debug, Clone)]
pub struct FileLevelStore {
    path: PathBuf,
    original_path: Option<PathBuf>,
    library: LevelLibrary,
}

impl FileLevelStore {
    /// Read the level file at `path`
    ///
    /// `original_path` names the pristine copy used by
    /// [`LevelStore::restore_originals`].
    pub fn open(path: impl Into<PathBuf>, original_path: Option<PathBuf>) -> Result<Self> {
        let path = path.into();
        let library = read_library(&path)?;
        log::info!(
            "Loaded {} levels ({} brick styles) from {}",
            library.max_level(),
            library.brick_styles(),
            path.display()
        );
        Ok(Self {
            path,
            original_path,
            library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `library` to disk and adopt it; the held library is untouched on failure
    fn commit(&mut self, library: LevelLibrary) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, library.to_text()).map_err(|e| Error::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;
        self.library = library;
        Ok(())
    }
}

fn read_library(path: &Path) -> Result<LevelLibrary> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    LevelLibrary::parse(&text)
}

impl LevelStore for FileLevelStore {
    fn load_level(&self, id: u32) -> Option<BrickGrid> {
        self.library.get(id).cloned()
    }

    fn save_level(&mut self, id: u32, grid: &BrickGrid) -> Result<()> {
        let mut library = self.library.clone();
        library.insert(id, grid);
        self.commit(library)?;
        log::info!("Saved level {id} to {}", self.path.display());
        Ok(())
    }

    fn max_level(&self) -> u32 {
        self.library.max_level()
    }

    fn brick_style_count(&self) -> u8 {
        self.library.brick_styles()
    }

    fn restore_originals(&mut self) -> Result<()> {
        let Some(original) = self.original_path.clone() else {
            log::warn!("No original level file configured, nothing to restore");
            return Ok(());
        };
        let library = read_library(&original)?;
        self.commit(library)?;
        log::info!("Restored original levels from {}", original.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("brick-knockout-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_library() -> LevelLibrary {
        let mut library = LevelLibrary::new(2);
        let mut grid = BrickGrid::new();
        grid.set(0, 0, Cell::brick(1, 4));
        library.insert(1, &grid);
        library
    }

    #[test]
    fn test_memory_store_restore() {
        let mut store = MemoryLevelStore::new(sample_library());
        store.save_level(2, &BrickGrid::new()).unwrap();
        assert_eq!(store.max_level(), 2);
        store.restore_originals().unwrap();
        assert_eq!(store.max_level(), 1);
        assert!(store.load_level(2).is_none());
        assert!(store.load_level(1).is_some());
    }

    #[test]
    fn test_saved_levels_drop_powerups() {
        let mut store = MemoryLevelStore::default();
        let mut grid = BrickGrid::new();
        grid.set(3, 3, Cell::brick(1, 5));
        grid.assign_powerups(&mut rand_pcg::Pcg32::new(0, 0));
        store.save_level(1, &grid).unwrap();
        let saved = store.load_level(1).unwrap();
        assert!(saved.iter().all(|(_, _, cell)| cell.powerup.is_none()));
    }

    #[test]
    fn test_file_store_save_and_restore() {
        let dir = scratch_dir("store");
        let levels = dir.join("Levels.txt");
        let originals = dir.join("OriginalLevels.txt");
        std::fs::write(&levels, sample_library().to_text()).unwrap();
        std::fs::write(&originals, sample_library().to_text()).unwrap();

        let mut store = FileLevelStore::open(&levels, Some(originals)).unwrap();
        let mut grid = BrickGrid::new();
        grid.set(5, 5, Cell::brick(2, 7));
        store.save_level(2, &grid).unwrap();

        let reopened = FileLevelStore::open(&levels, None).unwrap();
        assert_eq!(reopened.max_level(), 2);
        assert_eq!(reopened.load_level(2), Some(grid));

        store.restore_originals().unwrap();
        let reopened = FileLevelStore::open(&levels, None).unwrap();
        assert_eq!(reopened.max_level(), 1);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_failed_save_keeps_levels() {
        let dir = scratch_dir("failed-save");
        let levels = dir.join("Levels.txt");
        std::fs::write(&levels, sample_library().to_text()).unwrap();
        let mut store = FileLevelStore::open(&levels, None).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let mut grid = BrickGrid::new();
        grid.set(1, 1, Cell::brick(1, 3));
        assert!(matches!(store.save_level(7, &grid), Err(Error::Io { .. })));
        assert_eq!(store.max_level(), 1);
        assert!(store.load_level(7).is_none());
    }

    #[test]
    fn test_failed_restore_keeps_levels() {
        let dir = scratch_dir("failed-restore");
        let levels = dir.join("Levels.txt");
        let originals = dir.join("OriginalLevels.txt");
        let mut edited = sample_library();
        edited.insert(2, &BrickGrid::new());
        std::fs::write(&levels, edited.to_text()).unwrap();
        std::fs::write(&originals, sample_library().to_text()).unwrap();
        let mut store = FileLevelStore::open(&levels, Some(originals.clone())).unwrap();

        // originals stay readable, but the level file's directory is gone
        let kept = std::env::temp_dir().join(format!("brick-knockout-originals-{}.txt", std::process::id()));
        std::fs::copy(&originals, &kept).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        store.original_path = Some(kept.clone());

        assert!(store.restore_originals().is_err());
        assert_eq!(store.max_level(), 2);
        std::fs::remove_file(kept).ok();
    }

    #[test]
    fn test_file_store_missing_file() {
        let err = FileLevelStore::open("/definitely/not/here/Levels.txt", None).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
