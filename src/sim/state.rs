//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one [`GameState`] aggregate.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::editor::LevelEditor;
use super::fixed_list::FixedList;
use super::grid::BrickGrid;
use super::mask::{CoinMasks, PixelMask, ball_mask};
use super::powerup::{MessageQueue, PowerupKind};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::paddle_width;

/// Top-level mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Balls and paddle are live
    Playing,
    /// Help screen `help_page` (1..=5) is showing; also the game-over screen
    Paused { help_page: u8 },
    /// Level editor is active
    LevelEditor,
}

/// Questions the player must answer before a destructive action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmKind {
    /// Yes / No
    Quit,
    /// Yes / No
    NewGame,
    /// Yes / No
    EditorStart,
    /// Save and quit / Quit / Cancel
    EditorQuit,
    /// Save and change / Change / Cancel
    EditorLevelChange { delta: i32 },
    /// Yes / No
    Restore,
}

impl ConfirmKind {
    /// Number of selectable actions
    pub fn action_count(&self) -> usize {
        match self {
            ConfirmKind::EditorQuit | ConfirmKind::EditorLevelChange { .. } => 3,
            _ => 2,
        }
    }
}

/// An open confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub kind: ConfirmKind,
    /// Highlighted action, 0 is the first
    pub selected: usize,
}

impl Confirmation {
    pub fn new(kind: ConfirmKind) -> Self {
        Self { kind, selected: 0 }
    }

    /// Move the highlight, wrapping at either end
    pub fn navigate(&mut self, delta: i32) {
        let count = self.kind.action_count() as i32;
        self.selected = (self.selected as i32 + delta.signum()).rem_euclid(count) as usize;
    }
}

/// What the session is doing, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused { help_page: u8 },
    GameOver { help_page: u8 },
    LevelEditor,
    ConfirmationPending(Confirmation),
}

/// Session-wide progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub mode: Mode,
    /// Dialog shown over the current mode
    pub confirmation: Option<Confirmation>,
    pub level: u32,
    pub max_level: u32,
    /// Number of brick styles available in the level data
    pub brick_styles: u8,
    pub lives: u8,
    pub score: u64,
    pub multiplier: u32,
    /// Destructible bricks left on the current level
    pub bricks_remaining: u32,
    /// No game in progress (before the first game, after game over, after editing)
    pub game_lost: bool,
    /// Brick shown on the help screens and first selected in the editor
    pub help_style: u8,
    pub help_colour: u8,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: Mode::Paused { help_page: 1 },
            confirmation: None,
            level: 1,
            max_level: 1,
            brick_styles: 1,
            lives: 0,
            score: 0,
            multiplier: 1,
            bricks_remaining: 0,
            game_lost: true,
            help_style: 1,
            help_colour: GREY_COLOUR,
        }
    }
}

impl Session {
    pub fn is_paused(&self) -> bool {
        matches!(self.mode, Mode::Paused { .. })
    }

    pub fn in_editor(&self) -> bool {
        self.mode == Mode::LevelEditor
    }

    /// Cycle the help-screen brick style within the available styles
    pub fn change_help_style(&mut self, delta: i32) {
        self.help_style = wrap_one_based(self.help_style, delta, self.brick_styles);
    }

    /// Cycle the help-screen brick colour within the palette
    pub fn change_help_colour(&mut self, delta: i32) {
        self.help_colour = wrap_one_based(self.help_colour, delta, BRICK_COLOURS);
    }
}

/// Step `value` by `delta` within `1..=max`, wrapping at both ends
pub(crate) fn wrap_one_based(value: u8, delta: i32, max: u8) -> u8 {
    let max = i32::from(max.max(1));
    ((i32::from(value) - 1 + delta).rem_euclid(max) + 1) as u8
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    /// Size class 1..=7, selects the pixel mask
    pub size: u8,
    /// Top-left corner of the 16x16 mask in playfield pixels
    pub pos: IVec2,
    /// Speed bucket per axis; the sign gives the direction of travel
    pub speed: IVec2,
    /// Riding on the paddle
    pub stuck: bool,
    /// Fireball ticks remaining (bricks do not deflect the ball)
    pub fire: u32,
    /// Explosive ticks remaining
    pub explosive: u32,
    /// Ticks before the paddle can deflect the ball again
    pub no_rebound: u32,
    /// Brick combo counter, reset to 1 on a paddle hit
    pub combo: u32,
    /// Consecutive grey brick rebounds
    pub grey_streak: u32,
}

impl Ball {
    pub fn new(size: u8, pos: IVec2) -> Self {
        Self {
            size: size.clamp(MIN_BALL_SIZE, MAX_BALL_SIZE),
            pos,
            speed: IVec2::ZERO,
            stuck: false,
            fire: 0,
            explosive: 0,
            no_rebound: 0,
            combo: 1,
            grey_streak: 0,
        }
    }

    pub fn mask(&self) -> PixelMask {
        ball_mask(self.size)
    }

    /// Grow or shrink by one size class, saturating at the bounds
    pub fn adjust_size(&mut self, delta: i32) {
        let size = i32::from(self.size) + delta.signum();
        self.size = size.clamp(i32::from(MIN_BALL_SIZE), i32::from(MAX_BALL_SIZE)) as u8;
    }

    pub fn is_fireball(&self) -> bool {
        self.fire > 0
    }

    pub fn is_explosive(&self) -> bool {
        self.explosive > 0
    }

    /// Count down the per-ball modifier timers
    pub fn countdown(&mut self) {
        self.fire = self.fire.saturating_sub(1);
        self.explosive = self.explosive.saturating_sub(1);
        self.no_rebound = self.no_rebound.saturating_sub(1);
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge in playfield pixels
    pub x: i32,
    /// Length in 8px units between the two end caps (2..=14)
    pub size: i32,
    /// Pixels travelled per tick (2..=10)
    pub speed: i32,
    /// -1 left, 0 still, 1 right
    pub direction: i32,
    /// Magnetic ticks remaining
    pub magnetic: u32,
    /// Laser ticks remaining
    pub laser: u32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: PADDLE_START_X,
            size: INIT_PADDLE_SIZE,
            speed: INIT_PADDLE_SPEED,
            direction: 0,
            magnetic: 0,
            laser: 0,
        }
    }
}

impl Paddle {
    /// Width in pixels including end caps
    pub fn width(&self) -> i32 {
        paddle_width(self.size)
    }

    pub fn is_magnetic(&self) -> bool {
        self.magnetic > 0
    }

    pub fn has_lasers(&self) -> bool {
        self.laser > 0
    }

    /// Change the size by one step, keeping the paddle inside the right wall
    pub fn adjust_size(&mut self, delta: i32) {
        self.set_size(self.size + delta.signum());
    }

    pub fn set_size(&mut self, size: i32) {
        self.size = size.clamp(MIN_PADDLE_SIZE, MAX_PADDLE_SIZE);
        let limit = GAME_WIDTH - TILE_SIZE - 1;
        if self.x + self.width() >= limit {
            self.x = limit - self.width();
        }
    }

    /// Change the speed by one step
    pub fn adjust_speed(&mut self, delta: i32) {
        self.speed = (self.speed + delta.signum()).clamp(MIN_PADDLE_SPEED, MAX_PADDLE_SPEED);
    }

    pub fn set_direction(&mut self, direction: i32) {
        self.direction = direction.signum();
    }
}

/// A falling powerup coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: IVec2,
    /// Animation counter in `0..COIN_PHASES * COIN_SPEED`
    pub rotation: u32,
    pub powerup: PowerupKind,
}

impl Coin {
    pub fn new(powerup: PowerupKind, pos: IVec2) -> Self {
        Self {
            pos,
            rotation: 0,
            powerup,
        }
    }

    /// Rotation phase 0..8, shared by animation and hit-testing
    pub fn phase(&self) -> u32 {
        self.rotation / COIN_SPEED
    }
}

/// A laser shot travelling up the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: IVec2,
    /// Spent; compacted out on the next movement pass
    pub remove: bool,
}

/// A transient blast marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    /// Top-left of the 5x5 cell blast area in pixels
    pub pos: IVec2,
    pub size_class: u32,
    pub remaining: u32,
}

impl Explosion {
    pub fn new(pos: IVec2, size_class: u32) -> Self {
        Self {
            pos,
            size_class,
            remaining: size_class * EXPLOSION_FRAMES,
        }
    }

    /// Animation frame, counting down to 0 as the blast fades
    pub fn frame(&self) -> u32 {
        self.remaining.saturating_sub(1) / EXPLOSION_FRAMES
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub session: Session,
    /// Bricks of the level being played
    pub grid: BrickGrid,
    pub paddle: Paddle,
    pub balls: FixedList<Ball, MAX_BALLS>,
    pub coins: FixedList<Coin, MAX_COINS>,
    pub bullets: FixedList<Bullet, MAX_BULLETS>,
    pub explosions: FixedList<Explosion, MAX_EXPLOSIONS>,
    pub messages: MessageQueue,
    pub editor: LevelEditor,
    pub coin_masks: CoinMasks,
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Host asked to close the game
    pub quit_requested: bool,
    /// Cues emitted since the last drain
    sounds: Vec<SoundCue>,
}

impl GameState {
    /// Create a new game state with the given seed, paused on the first help page
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            session: Session::default(),
            grid: BrickGrid::new(),
            paddle: Paddle::default(),
            balls: FixedList::new(),
            coins: FixedList::new(),
            bullets: FixedList::new(),
            explosions: FixedList::new(),
            messages: MessageQueue::default(),
            editor: LevelEditor::default(),
            coin_masks: CoinMasks::default(),
            sound_enabled: true,
            quit_requested: false,
            sounds: Vec::new(),
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Queue a sound cue (ignored while sound is off)
    pub fn play(&mut self, cue: SoundCue) {
        if self.sound_enabled {
            self.sounds.push(cue);
        }
    }

    /// Cues emitted since the last drain
    pub fn sounds(&self) -> &[SoundCue] {
        &self.sounds
    }

    /// Take the pending cues for the sound sink
    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        if !enabled {
            self.sounds.clear();
        }
    }

    /// Current phase for renderers and hosts
    pub fn phase(&self) -> Phase {
        if let Some(confirmation) = self.session.confirmation {
            return Phase::ConfirmationPending(confirmation);
        }
        match self.session.mode {
            Mode::Playing => Phase::Playing,
            Mode::LevelEditor => Phase::LevelEditor,
            Mode::Paused { help_page } if self.session.game_lost => Phase::GameOver { help_page },
            Mode::Paused { help_page } => Phase::Paused { help_page },
        }
    }

    /// Live balls still riding the paddle
    pub fn stuck_ball_count(&self) -> usize {
        self.balls.iter().filter(|b| b.stuck).count()
    }
}
