//! Powerup kinds, their effects and the on-screen message queue

use serde::{Deserialize, Serialize};

use super::session::{add_ball, add_life};
use super::state::GameState;
use crate::audio::SoundCue;
use crate::consts::{MAX_MESSAGES, MESSAGE_TIME, POWERUP_TIME};

/// Powerups carried by coins
///
/// Discriminants are the sprite/message indices; 7 and 8 were ball speed
/// powerups that never drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerupKind {
    IncPaddleSize = 1,
    DecPaddleSize = 2,
    IncPaddleSpeed = 3,
    DecPaddleSpeed = 4,
    IncBallSize = 5,
    DecBallSize = 6,
    ExtraBall = 9,
    Magnetic = 10,
    ExtraLife = 11,
    Fireball = 12,
    Guns = 13,
    Explosive = 14,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 12] = [
        PowerupKind::IncPaddleSize,
        PowerupKind::DecPaddleSize,
        PowerupKind::IncPaddleSpeed,
        PowerupKind::DecPaddleSpeed,
        PowerupKind::IncBallSize,
        PowerupKind::DecBallSize,
        PowerupKind::ExtraBall,
        PowerupKind::Magnetic,
        PowerupKind::ExtraLife,
        PowerupKind::Fireball,
        PowerupKind::Guns,
        PowerupKind::Explosive,
    ];

    /// Size of the weighted draw used by [`PowerupKind::from_draw`]
    pub const DRAW_RANGE: u32 = 250;

    /// Map a draw in `0..250` onto the weighted powerup table
    pub fn from_draw(draw: u32) -> Self {
        match draw % Self::DRAW_RANGE {
            0..50 => PowerupKind::DecBallSize,
            50..75 => PowerupKind::DecPaddleSpeed,
            75..100 => PowerupKind::DecPaddleSize,
            100..125 => PowerupKind::IncBallSize,
            125..150 => PowerupKind::IncPaddleSpeed,
            150..175 => PowerupKind::IncPaddleSize,
            175..200 => PowerupKind::ExtraBall,
            200..225 => PowerupKind::Magnetic,
            225..235 => PowerupKind::Explosive,
            235..245 => PowerupKind::Fireball,
            245..249 => PowerupKind::Guns,
            _ => PowerupKind::ExtraLife,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Sound played when the powerup is collected
    pub fn sound(self) -> SoundCue {
        match self {
            PowerupKind::IncPaddleSize => SoundCue::PaddleSizeInc,
            PowerupKind::DecPaddleSize => SoundCue::PaddleSizeDec,
            PowerupKind::IncPaddleSpeed => SoundCue::PaddleSpeedInc,
            PowerupKind::DecPaddleSpeed => SoundCue::PaddleSpeedDec,
            PowerupKind::IncBallSize => SoundCue::BallSizeInc,
            PowerupKind::DecBallSize => SoundCue::BallSizeDec,
            PowerupKind::ExtraBall => SoundCue::ExtraBall,
            PowerupKind::Magnetic => SoundCue::Magnetism,
            PowerupKind::ExtraLife => SoundCue::ExtraLife,
            PowerupKind::Fireball => SoundCue::Fireball,
            PowerupKind::Guns => SoundCue::Guns,
            PowerupKind::Explosive => SoundCue::Explosive,
        }
    }

    /// Message shown when the powerup is collected
    pub fn label(self) -> &'static str {
        match self {
            PowerupKind::IncPaddleSize => "Paddle Size Up",
            PowerupKind::DecPaddleSize => "Paddle Size Down",
            PowerupKind::IncPaddleSpeed => "Paddle Speed Up",
            PowerupKind::DecPaddleSpeed => "Paddle Speed Down",
            PowerupKind::IncBallSize => "Ball Size Up",
            PowerupKind::DecBallSize => "Ball Size Down",
            PowerupKind::ExtraBall => "Extra Ball",
            PowerupKind::Magnetic => "Magnetic Paddle",
            PowerupKind::ExtraLife => "Extra Life",
            PowerupKind::Fireball => "Fireball",
            PowerupKind::Guns => "Lasers",
            PowerupKind::Explosive => "Explosive Ball",
        }
    }
}

/// Apply a collected powerup, queueing its message and sound
pub fn gain_powerup(state: &mut GameState, kind: PowerupKind) {
    match kind {
        PowerupKind::IncPaddleSize => state.paddle.adjust_size(1),
        PowerupKind::DecPaddleSize => state.paddle.adjust_size(-1),
        PowerupKind::IncPaddleSpeed => state.paddle.adjust_speed(1),
        PowerupKind::DecPaddleSpeed => state.paddle.adjust_speed(-1),
        PowerupKind::IncBallSize => state.balls.iter_mut().for_each(|b| b.adjust_size(1)),
        PowerupKind::DecBallSize => state.balls.iter_mut().for_each(|b| b.adjust_size(-1)),
        PowerupKind::ExtraBall => add_ball(state),
        PowerupKind::Magnetic => state.paddle.magnetic += POWERUP_TIME,
        PowerupKind::ExtraLife => add_life(state),
        PowerupKind::Fireball => {
            for ball in state.balls.iter_mut() {
                ball.fire += POWERUP_TIME;
                ball.explosive = 0;
            }
        }
        PowerupKind::Guns => state.paddle.laser += POWERUP_TIME,
        PowerupKind::Explosive => {
            for ball in state.balls.iter_mut() {
                ball.explosive += POWERUP_TIME;
                ball.fire = 0;
            }
        }
    }
    state.messages.push(kind);
    state.play(kind.sound());
}

/// Up to three powerup messages, the oldest shown for [`MESSAGE_TIME`] ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQueue {
    slots: Vec<PowerupKind>,
    timer: Option<u32>,
}

impl MessageQueue {
    pub fn messages(&self) -> &[PowerupKind] {
        &self.slots
    }

    /// Ticks before the oldest message expires
    pub fn timer(&self) -> Option<u32> {
        self.timer
    }

    /// Queue a message; a full queue drops its oldest entry
    pub fn push(&mut self, kind: PowerupKind) {
        if self.slots.len() >= MAX_MESSAGES {
            self.pop();
        }
        if self.slots.is_empty() {
            self.timer = Some(MESSAGE_TIME);
        }
        self.slots.push(kind);
    }

    /// Drop the oldest message and restart the timer for the next one
    pub fn pop(&mut self) -> Option<PowerupKind> {
        if self.slots.is_empty() {
            self.timer = None;
            return None;
        }
        let kind = self.slots.remove(0);
        self.timer = (!self.slots.is_empty()).then_some(MESSAGE_TIME);
        Some(kind)
    }

    /// Count down one tick, expiring the oldest message at zero
    pub fn tick(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            *timer = timer.saturating_sub(1);
            if *timer == 0 {
                self.pop();
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.timer = None;
    }
}
