//! Sound cues and the bounded voice pool
//!
//! The simulation only names cues; a [`SoundSink`] decides how to play them.
//! [`VoicePool`] is the stock sink: it tracks up to [`MAX_VOICES`] playing
//! voices and drops cues that arrive while every voice is busy.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_VOICES;

/// Sound effect cues emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Brick destroyed
    BrickKo,
    /// Ball bounced off a grey brick
    BrickRebound,
    /// Ball bounced off a playfield wall
    BorderRebound,
    /// Ball bounced off (or stuck to) the paddle
    PaddleRebound,
    /// A life was spent on a new ball
    LoseLife,
    /// No lives left
    GameOver,
    /// Coin collected (three recorded variants)
    Coin { variant: u8 },
    PaddleSizeInc,
    PaddleSizeDec,
    PaddleSpeedInc,
    PaddleSpeedDec,
    BallSizeInc,
    BallSizeDec,
    ExtraBall,
    Magnetism,
    ExtraLife,
    Fireball,
    Guns,
    Explosive,
    LaserFire,
}

impl SoundCue {
    /// Number of coin collection variants
    pub const COIN_VARIANTS: u8 = 3;

    /// Approximate playback length in ticks
    pub fn duration_ticks(&self) -> u32 {
        match self {
            SoundCue::BrickKo | SoundCue::BrickRebound | SoundCue::BorderRebound => 4,
            SoundCue::PaddleRebound | SoundCue::LaserFire => 4,
            SoundCue::Coin { .. } => 8,
            SoundCue::LoseLife => 20,
            SoundCue::GameOver => 40,
            _ => 16,
        }
    }

    /// File stem of the recorded sample for this cue
    pub fn sample_name(&self) -> String {
        match self {
            SoundCue::BrickKo => "BrickKO".into(),
            SoundCue::BrickRebound => "BrickRebound".into(),
            SoundCue::BorderRebound => "BorderRebound".into(),
            SoundCue::PaddleRebound => "PaddleRebound".into(),
            SoundCue::LoseLife => "LoseLife".into(),
            SoundCue::GameOver => "GameOver".into(),
            SoundCue::Coin { variant } => format!("Coin{variant}"),
            SoundCue::PaddleSizeInc => "PaddleSizeInc".into(),
            SoundCue::PaddleSizeDec => "PaddleSizeDec".into(),
            SoundCue::PaddleSpeedInc => "PaddleSpeedInc".into(),
            SoundCue::PaddleSpeedDec => "PaddleSpeedDec".into(),
            SoundCue::BallSizeInc => "BallSizeInc".into(),
            SoundCue::BallSizeDec => "BallSizeDec".into(),
            SoundCue::ExtraBall => "ExtraBall".into(),
            SoundCue::Magnetism => "Magnetism".into(),
            SoundCue::ExtraLife => "ExtraLife".into(),
            SoundCue::Fireball => "Fireball".into(),
            SoundCue::Guns => "Guns".into(),
            SoundCue::Explosive => "Explosive".into(),
            SoundCue::LaserFire => "LaserFire".into(),
        }
    }
}

/// Fire-and-forget sound output
pub trait SoundSink {
    /// Start playing a cue; returns false when the cue was dropped
    fn play(&mut self, cue: SoundCue) -> bool;
}

/// A cue occupying a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub cue: SoundCue,
    pub remaining: u32,
}

/// Bounded pool of concurrently playing voices
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
    capacity: usize,
    /// False when the samples failed to load; every cue is dropped
    available: bool,
    /// Cues played since creation
    pub played: u64,
    /// Cues dropped because the pool was full or unavailable
    pub dropped: u64,
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new(MAX_VOICES)
    }
}

impl VoicePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            voices: Vec::with_capacity(capacity),
            capacity,
            available: true,
            played: 0,
            dropped: 0,
        }
    }

    /// A pool whose samples could not be loaded
    pub fn silent() -> Self {
        let mut pool = Self::new(0);
        pool.available = false;
        log::warn!("Sound samples unavailable - audio disabled");
        pool
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Voices currently playing
    pub fn active(&self) -> &[Voice] {
        &self.voices
    }

    /// Advance playback by one tick, freeing finished voices
    pub fn advance(&mut self) {
        for voice in &mut self.voices {
            voice.remaining = voice.remaining.saturating_sub(1);
        }
        self.voices.retain(|v| v.remaining > 0);
    }

    /// Stop every playing voice
    pub fn stop_all(&mut self) {
        self.voices.clear();
    }
}

impl SoundSink for VoicePool {
    fn play(&mut self, cue: SoundCue) -> bool {
        if !self.available || self.voices.len() >= self.capacity {
            self.dropped += 1;
            log::debug!("Dropped sound cue {cue:?}");
            return false;
        }
        self.voices.push(Voice {
            cue,
            remaining: cue.duration_ticks(),
        });
        self.played += 1;
        true
    }
}
