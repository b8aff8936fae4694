//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity lists compact on removal)
//! - No rendering, audio output or file access (levels come through [`LevelStore`])
//!
//! [`LevelStore`]: crate::persistence::LevelStore

pub mod coins;
pub mod collision;
pub mod editor;
pub mod fixed_list;
pub mod grid;
pub mod mask;
pub mod paddle;
pub mod powerup;
pub mod projectile;
pub mod session;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use editor::LevelEditor;
pub use fixed_list::FixedList;
pub use grid::{BrickGrid, Cell};
pub use mask::{CoinMasks, PixelMask, ball_mask};
pub use powerup::{MessageQueue, PowerupKind, gain_powerup};
pub use session::{change_level, start_game, use_life};
pub use state::{
    Ball, Bullet, Coin, ConfirmKind, Confirmation, Explosion, GameState, Mode, Paddle, Phase,
    Session,
};
pub use tick::{Key, KeyEvent, TickInput, apply_key, tick};
