//! Session flow: games, lives, levels, scoring and confirmation dialogs

use glam::IVec2;
use rand::Rng;

use super::editor;
use super::grid::{BrickGrid, Cell};
use super::paddle::release_ball;
use super::state::{Ball, ConfirmKind, Confirmation, GameState, Mode};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::persistence::LevelStore;

/// Row of the top of a fresh ball resting on the paddle
const BALL_REST_Y: i32 = GAME_HEIGHT - 1 - 14 - (9 + START_BALL_SIZE as i32);

/// Refresh level count and brick styles from the store
pub fn sync_store(state: &mut GameState, levels: &dyn LevelStore) {
    state.session.max_level = levels.max_level().max(1);
    state.session.brick_styles = levels.brick_style_count().max(1);
    state.session.change_help_style(0);
}

/// Start a new game on level 1
pub fn start_game(state: &mut GameState, levels: &dyn LevelStore) {
    sync_store(state, levels);
    state.paddle.size = INIT_PADDLE_SIZE;
    state.paddle.x = PADDLE_START_X;
    state.paddle.speed = LEVEL_PADDLE_SPEED;
    state.paddle.direction = 0;

    let session = &mut state.session;
    session.lives = START_LIVES;
    session.level = 1;
    session.multiplier = 1;
    session.score = 0;

    load_level(state, levels, 1);
    use_life(state);
    state.session.game_lost = false;
    state.session.mode = Mode::Playing;
    log::info!("New game started (seed {})", state.seed);
}

/// Spend a life on a fresh ball, or end the game when none are left
pub fn use_life(state: &mut GameState) {
    state.balls.clear();

    if state.session.lives == 0 {
        state.play(SoundCue::GameOver);
        state.session.game_lost = true;
        state.session.mode = Mode::Paused { help_page: 1 };
        log::info!(
            "Game over on level {} with score {}",
            state.session.level,
            state.session.score
        );
        return;
    }

    let x = state.paddle.x + (state.paddle.size + 2) * 4 - TILE_SIZE;
    let mut ball = Ball::new(START_BALL_SIZE, IVec2::new(x, BALL_REST_Y));
    ball.stuck = true;
    if state.balls.push(ball).is_err() {
        log::debug!("Ball list full, no ball for the new life");
    }

    state.paddle.set_size(INIT_PADDLE_SIZE);
    state.paddle.speed = INIT_PADDLE_SPEED;
    state.paddle.magnetic = 0;
    state.paddle.laser = 0;

    state.session.lives -= 1;
    if !state.session.is_paused() {
        state.play(SoundCue::LoseLife);
    }
}

/// Gain a life unless already at the cap
pub fn add_life(state: &mut GameState) {
    if state.session.lives < MAX_LIVES {
        state.session.lives += 1;
    }
}

/// Launch an extra ball from a random point on the paddle
pub fn add_ball(state: &mut GameState) {
    if state.balls.is_full() {
        return;
    }
    let span = state.paddle.width() - TILE_SIZE;
    let x = state.paddle.x + state.rng().random_range(0..span);
    let mut ball = Ball::new(START_BALL_SIZE, IVec2::new(x, BALL_REST_Y));
    ball.stuck = true;
    ball.combo = 0;
    release_ball(&state.paddle, &mut ball);
    if state.balls.push(ball).is_err() {
        log::debug!("Ball list full, extra ball dropped");
    }
}

/// Remove a ball; losing the last one costs a life
pub fn lose_ball(state: &mut GameState, index: usize) {
    state.balls.remove(index);
    if state.balls.is_empty() {
        use_life(state);
    }
}

/// Install level `id` from the store, rolling fresh powerups
///
/// Returns false (leaving an empty grid) when the store has no such level.
pub fn load_level(state: &mut GameState, levels: &dyn LevelStore, id: u32) -> bool {
    state.coins.clear();
    state.messages.clear();

    let Some(mut grid) = levels.load_level(id) else {
        state.grid = BrickGrid::new();
        state.session.bricks_remaining = 0;
        return false;
    };
    let powerups = grid.assign_powerups(state.rng());
    state.session.bricks_remaining = grid.destructible_count();
    state.grid = grid;
    log::debug!(
        "Loaded level {id}: {} bricks, {powerups} powerups",
        state.session.bricks_remaining
    );
    true
}

/// Move `delta` levels, wrapping around the level list and adjusting the multiplier
pub fn change_level(state: &mut GameState, levels: &dyn LevelStore, delta: i32) {
    state.grid.clear();
    let max = i64::from(state.session.max_level.max(1));
    let mut target = i64::from(state.session.level) + i64::from(delta);

    while target < 1 {
        if state.session.multiplier == 1 {
            target = 1;
        } else {
            target += max;
            state.session.multiplier -= 1;
        }
    }
    while target > max {
        target -= max;
        state.session.multiplier = (state.session.multiplier + 1).min(MAX_MULTIPLIER);
    }

    let target = target as u32;
    if load_level(state, levels, target) {
        state.session.level = target;
    } else {
        log::warn!("Level {target} missing, falling back to level 1");
        if !load_level(state, levels, 1) {
            log::warn!("Level 1 missing, playing an empty grid");
        }
        state.session.level = 1;
    }

    state.paddle.set_size(INIT_PADDLE_SIZE);
    state.paddle.speed = LEVEL_PADDLE_SPEED;
    state.paddle.magnetic = 0;

    // Keep the life count: the cap decides which comes first
    if state.session.lives == MAX_LIVES {
        use_life(state);
        add_life(state);
    } else {
        add_life(state);
        use_life(state);
    }

    state.explosions.clear();
    state.bullets.clear();
    log::info!(
        "Level {} (multiplier {})",
        state.session.level,
        state.session.multiplier
    );
}

/// Count one destructible brick as cleared; returns true if that ended the level
pub fn count_cleared_brick(state: &mut GameState, levels: &dyn LevelStore) -> bool {
    state.session.bricks_remaining = state.session.bricks_remaining.saturating_sub(1);
    if state.session.bricks_remaining == 0 {
        change_level(state, levels, 1);
        return true;
    }
    false
}

/// Points for knocking out `cell` with a ball on the given combo
pub fn brick_score(state: &GameState, cell: &Cell, combo: u32) -> u64 {
    u64::from(cell.style)
        * (u64::from(cell.colour) + u64::from(state.session.level))
        * u64::from(combo / 5 + 1)
        * u64::from(state.session.multiplier)
}

pub fn add_brick_score(state: &mut GameState, cell: &Cell, combo: u32) {
    let points = brick_score(state, cell, combo);
    state.session.score += points;
}

/// Pause, or advance to the next help screen when already paused
pub fn pause_game(state: &mut GameState) {
    let page = match state.session.mode {
        Mode::Paused { help_page } => help_page % HELP_SCREENS + 1,
        _ => 1,
    };
    state.session.mode = Mode::Paused { help_page: page };
}

/// Resume play; a lost game stays on the help screens
pub fn unpause_game(state: &mut GameState) {
    if state.session.is_paused() && !state.session.game_lost {
        state.session.mode = Mode::Playing;
    }
}

/// A game is under way (possibly paused)
pub fn game_in_progress(state: &GameState) -> bool {
    !state.session.game_lost && !state.session.in_editor()
}

/// Show a confirmation dialog over the current mode
pub fn ask(state: &mut GameState, kind: ConfirmKind) {
    state.session.confirmation = Some(Confirmation::new(kind));
}

/// Act on the highlighted choice of the open dialog and close it
pub fn resolve_confirmation(state: &mut GameState, store: &mut dyn LevelStore) {
    let Some(confirmation) = state.session.confirmation.take() else {
        return;
    };
    let choice = confirmation.selected;
    match confirmation.kind {
        ConfirmKind::Quit => {
            if choice == 0 {
                log::info!("Quit requested");
                state.quit_requested = true;
            }
        }
        ConfirmKind::NewGame => {
            if choice == 0 {
                start_game(state, store);
            }
        }
        ConfirmKind::EditorStart => {
            if choice == 0 {
                editor::start_editor(state, store);
            }
        }
        ConfirmKind::EditorQuit => match choice {
            0 => {
                editor::save_editor_level(state, store);
                editor::quit_editor(state);
            }
            1 => editor::quit_editor(state),
            _ => {}
        },
        ConfirmKind::EditorLevelChange { delta } => match choice {
            0 => {
                editor::save_editor_level(state, store);
                editor::change_editor_level(state, store, delta);
            }
            1 => editor::change_editor_level(state, store, delta),
            _ => {}
        },
        ConfirmKind::Restore => {
            if choice == 0 {
                editor::restore_levels(state, store);
            }
        }
    }
}
