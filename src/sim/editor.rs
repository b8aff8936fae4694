//! Level editor
//!
//! Edits the top 40x20 cells of a level layout. The edited level is saved
//! through the [`LevelStore`]; saving past the last level appends a new one.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{BrickGrid, Cell};
use super::session::sync_store;
use super::state::{GameState, Mode, wrap_one_based};
use crate::consts::*;
use crate::persistence::LevelStore;

/// Editor cursor, selection and working copy of the level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEditor {
    /// Cell under the cursor, within the 40x20 editing area
    pub cursor: IVec2,
    pub colour: u8,
    pub style: u8,
    /// Level being edited; one past the last level means a new level
    pub level: u32,
    pub grid: BrickGrid,
    /// Unsaved changes
    pub modified: bool,
    /// Place key held
    pub placing: bool,
    /// Erase key held
    pub erasing: bool,
    /// Cursor animation clock
    pub cursor_timer: u32,
}

impl Default for LevelEditor {
    fn default() -> Self {
        Self {
            cursor: IVec2::new(EDITOR_WIDTH / 2, EDITOR_HEIGHT / 2),
            colour: GREY_COLOUR,
            style: 1,
            level: 1,
            grid: BrickGrid::new(),
            modified: false,
            placing: false,
            erasing: false,
            cursor_timer: 0,
        }
    }
}

impl LevelEditor {
    /// Cursor animation frame (0..5)
    pub fn cursor_frame(&self) -> u32 {
        self.cursor_timer / CURSOR_TIMING
    }
}

/// Open the editor on a blank new level
pub fn start_editor(state: &mut GameState, levels: &dyn LevelStore) {
    sync_store(state, levels);
    state.editor = LevelEditor {
        colour: state.session.help_colour,
        style: state.session.help_style,
        level: state.session.max_level + 1,
        ..Default::default()
    };
    state.session.game_lost = true;
    state.session.mode = Mode::LevelEditor;
    log::info!("Level editor opened on new level {}", state.editor.level);
}

/// Leave the editor for the first help screen
pub fn quit_editor(state: &mut GameState) {
    state.editor.placing = false;
    state.editor.erasing = false;
    state.session.mode = Mode::Paused { help_page: 1 };
}

/// Write the edited level; failures are logged and leave the level unsaved
pub fn save_editor_level(state: &mut GameState, store: &mut dyn LevelStore) {
    let level = state.editor.level;
    match store.save_level(level, &state.editor.grid) {
        Ok(()) => {
            state.editor.modified = false;
            sync_store(state, store);
            log::info!("Saved level {level} ({} levels)", state.session.max_level);
        }
        Err(e) => log::warn!("Failed to save level {level}: {e}"),
    }
}

/// Select another level, wrapping over the stored levels plus one new slot
pub fn change_editor_level(state: &mut GameState, levels: &dyn LevelStore, delta: i32) {
    let slots = i64::from(state.session.max_level) + 1;
    let target = (i64::from(state.editor.level) - 1 + i64::from(delta)).rem_euclid(slots) + 1;
    load_editor_level(state, levels, target as u32);
}

/// Replace every level with the originals and edit level 1
pub fn restore_levels(state: &mut GameState, store: &mut dyn LevelStore) {
    if let Err(e) = store.restore_originals() {
        log::warn!("Failed to restore original levels: {e}");
    }
    sync_store(state, store);
    load_editor_level(state, store, 1);
}

fn load_editor_level(state: &mut GameState, levels: &dyn LevelStore, id: u32) {
    let max = state.session.max_level;
    let loaded = (id <= max).then(|| levels.load_level(id)).flatten();
    let editor = &mut state.editor;
    match loaded {
        Some(grid) => {
            editor.level = id;
            editor.grid = grid.without_powerups();
        }
        None => {
            if id <= max {
                log::warn!("Level {id} could not be loaded, editing a new level");
            }
            editor.level = max + 1;
            editor.grid = BrickGrid::new();
        }
    }
    editor.modified = false;
}

/// Put a brick in the editing area; out-of-range requests are ignored
pub fn add_brick(state: &mut GameState, x: i32, y: i32, style: u8, colour: u8) {
    if !(0..EDITOR_WIDTH).contains(&x) || !(0..EDITOR_HEIGHT).contains(&y) {
        return;
    }
    if style > state.session.brick_styles || colour > BRICK_COLOURS {
        return;
    }
    state.editor.grid.set(x, y, Cell::brick(style, colour));
    state.editor.modified = true;
}

pub fn erase_brick(state: &mut GameState, x: i32, y: i32) {
    add_brick(state, x, y, 0, 0);
}

/// Move the cursor, stopping at the edges of the editing area
pub fn move_cursor(state: &mut GameState, delta: IVec2) {
    let cursor = &mut state.editor.cursor;
    *cursor = (*cursor + delta).clamp(IVec2::ZERO, IVec2::new(EDITOR_WIDTH - 1, EDITOR_HEIGHT - 1));
}

pub fn change_colour(state: &mut GameState, delta: i32) {
    state.editor.colour = wrap_one_based(state.editor.colour, delta, BRICK_COLOURS);
}

pub fn change_style(state: &mut GameState, delta: i32) {
    state.editor.style = wrap_one_based(state.editor.style, delta, state.session.brick_styles);
}

/// Advance the cursor animation and apply held place/erase keys
pub fn editor_tick(state: &mut GameState) {
    let editor = &mut state.editor;
    editor.cursor_timer = (editor.cursor_timer + 1) % (CURSOR_TIMING * CURSOR_FRAMES);

    let LevelEditor {
        cursor,
        style,
        colour,
        placing,
        erasing,
        ..
    } = *editor;
    if erasing {
        erase_brick(state, cursor.x, cursor.y);
    }
    if placing {
        add_brick(state, cursor.x, cursor.y, style, colour);
    }
}
