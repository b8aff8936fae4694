//! Brick Knockout entry point
//!
//! Headless runner: loads settings and level data, then lets the autopilot
//! play for a fixed number of ticks and logs a summary.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use brick_knockout::Settings;
use brick_knockout::audio::{SoundSink, VoicePool};
use brick_knockout::persistence::{FileLevelStore, load_coin_map};
use brick_knockout::platform::TickGate;
use brick_knockout::renderer::{DrawList, draw_game};
use brick_knockout::sim::{CoinMasks, GameState, TickInput, start_game, tick};

#[derive(Parser, Debug)]
#[command(about = "Run Brick Knockout headless with the autopilot playing", version)]
struct Args {
    /// Settings file (JSON); defaults are used when it is missing
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    #[arg(long)]
    levels: Option<PathBuf>,
    #[arg(long)]
    original_levels: Option<PathBuf>,
    #[arg(long)]
    coin_map: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation ticks to run
    #[arg(long, default_value_t = 2000)]
    ticks: u64,
    /// Pace ticks at the configured tick period instead of running flat out
    #[arg(long)]
    realtime: bool,
    #[arg(long)]
    tick_millis: Option<u64>,
    /// Start with sound effects off
    #[arg(long)]
    mute: bool,
}

impl Args {
    /// Command-line values override the settings file
    fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.levels {
            settings.levels_path = path.clone();
        }
        if let Some(path) = &self.original_levels {
            settings.original_levels_path = path.clone();
        }
        if let Some(path) = &self.coin_map {
            settings.coin_map_path = Some(path.clone());
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(millis) = self.tick_millis {
            settings.tick_millis = millis;
        }
        if self.mute {
            settings.sound_enabled = false;
        }
    }
}

fn coin_masks(settings: &Settings) -> CoinMasks {
    let Some(path) = &settings.coin_map_path else {
        return CoinMasks::default();
    };
    match load_coin_map(path) {
        Ok(masks) => masks,
        Err(e) => {
            log::warn!("Using built-in coin masks: {e}");
            CoinMasks::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load(&args.settings)
        .with_context(|| format!("loading settings from {}", args.settings.display()))?;
    args.apply(&mut settings);

    let mut store = FileLevelStore::open(
        &settings.levels_path,
        Some(settings.original_levels_path.clone()),
    )
    .with_context(|| format!("opening level file {}", settings.levels_path.display()))?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Brick Knockout starting (seed {seed})");

    let mut state = GameState::new(seed);
    state.coin_masks = coin_masks(&settings);
    state.set_sound_enabled(settings.sound_enabled);
    let mut voices = VoicePool::new(settings.max_voices);
    let mut gate = TickGate::from_millis(settings.tick_millis);

    start_game(&mut state, &store);
    let mut games = 1;
    let mut best_score = 0;
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    for _ in 0..args.ticks {
        if args.realtime {
            while !gate.admit() {
                std::thread::sleep(gate.remaining_at(Instant::now()));
            }
        }

        tick(&mut state, &input, &mut store);
        for cue in state.drain_sounds() {
            voices.play(cue);
        }
        voices.advance();

        if state.session.game_lost {
            best_score = best_score.max(state.session.score);
            games += 1;
            start_game(&mut state, &store);
        }
    }
    best_score = best_score.max(state.session.score);

    let mut frame = DrawList::default();
    draw_game(&state, &mut frame);
    log::info!(
        "Ran {} ticks over {games} game(s): level {}, score {}, best {best_score}, lives {}",
        args.ticks,
        state.session.level,
        state.session.score,
        state.session.lives,
    );
    log::info!(
        "Sounds played {}, dropped {}; final frame {} sprites",
        voices.played,
        voices.dropped,
        frame.sprites.len()
    );
    Ok(())
}
