//! Brick Knockout - a brick-breaking arcade game with a level editor
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balls, paddle, bricks, coins, session, editor)
//! - `audio`: Sound cues and the bounded voice pool that plays them
//! - `persistence`: Level data store and the text formats it reads and writes
//! - `renderer`: Sprite-level draw list handed to a render surface
//! - `platform`: Fixed-rate tick gate for the host loop
//! - `settings`: JSON configuration

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation period (20 ticks per second)
    pub const TICK_MILLIS: u64 = 50;

    /// Size of one layout tile in pixels
    pub const TILE_SIZE: i32 = 8;
    /// Playfield dimensions in tiles
    pub const GAME_WIDTH_TILES: i32 = 80;
    pub const GAME_HEIGHT_TILES: i32 = 60;
    /// Playfield dimensions in pixels
    pub const GAME_WIDTH: i32 = GAME_WIDTH_TILES * TILE_SIZE;
    pub const GAME_HEIGHT: i32 = GAME_HEIGHT_TILES * TILE_SIZE;

    /// Bricks are square
    pub const BRICK_SIZE: i32 = 16;
    /// Brick grid dimensions in cells
    pub const GRID_WIDTH: usize = 40;
    pub const GRID_HEIGHT: usize = 30;
    /// Number of brick colours (colour 1 is the grey brick)
    pub const BRICK_COLOURS: u8 = 9;
    pub const GREY_COLOUR: u8 = 1;

    /// Entity masks are 16x16 pixel grids
    pub const MASK_SIZE: usize = 16;

    /// Ball limits
    pub const MAX_BALLS: usize = 5;
    pub const MIN_BALL_SIZE: u8 = 1;
    pub const MAX_BALL_SIZE: u8 = 7;
    pub const START_BALL_SIZE: u8 = 4;
    /// Ball size that knocks out grey bricks
    pub const KNOCKOUT_BALL_SIZE: u8 = 7;
    /// Consecutive grey rebounds before a grey brick gives way
    pub const GREY_STREAK_LIMIT: u32 = 20;
    /// Ticks after a release during which the paddle is ignored
    pub const NO_REBOUND_TICKS: u32 = 4;
    /// Highest per-axis speed bucket
    pub const MAX_BALL_SPEED: i32 = 4;

    /// Paddle geometry and limits (size is measured in 8px units plus two end caps)
    pub const PADDLE_TOP: i32 = 464;
    pub const PADDLE_START_X: i32 = 279;
    pub const INIT_PADDLE_SIZE: i32 = 8;
    pub const INIT_PADDLE_SPEED: i32 = 5;
    /// Speed set by a new game or level change before the first ball restores the default
    pub const LEVEL_PADDLE_SPEED: i32 = 4;
    pub const MIN_PADDLE_SIZE: i32 = 2;
    pub const MAX_PADDLE_SIZE: i32 = 14;
    pub const MIN_PADDLE_SPEED: i32 = 2;
    pub const MAX_PADDLE_SPEED: i32 = 10;

    /// Powerup coins
    pub const MAX_COINS: usize = 20;
    pub const COIN_PHASES: u32 = 8;
    /// Ticks spent on each coin rotation phase
    pub const COIN_SPEED: u32 = 5;
    pub const COIN_FALL_SPEED: i32 = 2;
    /// Coins start testing against the paddle once this low
    pub const COIN_CATCH_LINE: i32 = GAME_HEIGHT - 32;
    /// One in this many eligible bricks carries a powerup
    pub const POWERUP_CHANCE: u32 = 3;
    /// Duration of timed powerups in ticks
    pub const POWERUP_TIME: u32 = 600;

    /// Explosions
    pub const MAX_EXPLOSIONS: usize = 25;
    /// Ticks per explosion animation frame
    pub const EXPLOSION_FRAMES: u32 = 15;

    /// Laser bullets
    pub const MAX_BULLETS: usize = 20;
    pub const LASER_SPEED: i32 = 6;

    /// On-screen messages
    pub const MAX_MESSAGES: usize = 3;
    pub const MESSAGE_TIME: u32 = 100;

    /// Session limits
    pub const START_LIVES: u8 = 4;
    pub const MAX_LIVES: u8 = 5;
    pub const MAX_MULTIPLIER: u32 = 1000;
    pub const HELP_SCREENS: u8 = 5;

    /// Level editor
    pub const EDITOR_WIDTH: i32 = 40;
    pub const EDITOR_HEIGHT: i32 = 20;
    /// Ticks per cursor animation frame
    pub const CURSOR_TIMING: u32 = 80;
    pub const CURSOR_FRAMES: u32 = 5;

    /// Concurrent sound voices
    pub const MAX_VOICES: usize = 50;
}

/// Grid cell containing the given pixel coordinate
#[inline]
pub fn pixel_to_cell(pixel: i32) -> i32 {
    pixel.div_euclid(consts::BRICK_SIZE)
}

/// Pixel width of a paddle with the given size
#[inline]
pub fn paddle_width(size: i32) -> i32 {
    consts::TILE_SIZE * (size + 2)
}
