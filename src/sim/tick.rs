//! Fixed timestep simulation tick
//!
//! Applies the tick's key events, then advances the game deterministically.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::move_balls;
use super::coins::drop_coins;
use super::editor;
use super::paddle::{move_paddle, release_stuck_balls};
use super::projectile::{decay_explosions, fire_bullets, move_bullets};
use super::session::{
    ask, game_in_progress, pause_game, resolve_confirmation, start_game, unpause_game,
};
use super::state::{ConfirmKind, GameState, Mode};
use crate::persistence::LevelStore;

/// Keys the game responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Delete,
    /// Open the level editor
    L,
    /// New game
    N,
    /// Pause toggle
    P,
    /// Quit
    Q,
    /// Restore original levels (editor)
    R,
    /// Save level (editor) or sound toggle
    S,
}

/// A key press or release with the modifiers held at the time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            pressed: true,
            shift: false,
            ctrl: false,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            pressed: false,
            ..Self::press(key)
        }
    }

    pub fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }

    pub fn with_ctrl(self) -> Self {
        Self { ctrl: true, ..self }
    }
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key events in arrival order
    pub events: Vec<KeyEvent>,
    /// Demo mode - the paddle plays itself
    pub autoplay: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, store: &mut dyn LevelStore) {
    for event in &input.events {
        apply_key(state, store, *event);
    }

    if state.session.confirmation.is_some() {
        return;
    }

    match state.session.mode {
        Mode::Paused { .. } => {}
        Mode::LevelEditor => editor::editor_tick(state),
        Mode::Playing => {
            if input.autoplay {
                autopilot(state);
            }
            step(state, store);
        }
    }
}

/// One gameplay step
fn step(state: &mut GameState, levels: &dyn LevelStore) {
    let paddle = &mut state.paddle;
    paddle.magnetic = paddle.magnetic.saturating_sub(1);
    paddle.laser = paddle.laser.saturating_sub(1);
    state.messages.tick();
    for ball in state.balls.iter_mut() {
        ball.countdown();
    }
    decay_explosions(state);

    if state.paddle.direction != 0 {
        move_paddle(state);
    }
    move_balls(state, levels);
    drop_coins(state);
    move_bullets(state, levels);

    state.time_ticks += 1;
}

/// Apply one key event to the session
pub fn apply_key(state: &mut GameState, store: &mut dyn LevelStore, event: KeyEvent) {
    if event.pressed {
        key_down(state, store, event);
    } else {
        key_up(state, event.key);
    }
}

fn key_down(state: &mut GameState, store: &mut dyn LevelStore, event: KeyEvent) {
    if state.session.confirmation.is_some() {
        match event.key {
            Key::Left | Key::Right => {
                let delta = if event.key == Key::Left { -1 } else { 1 };
                if let Some(confirmation) = state.session.confirmation.as_mut() {
                    confirmation.navigate(delta);
                }
            }
            Key::Space | Key::Enter => resolve_confirmation(state, store),
            _ => {}
        }
        return;
    }

    let mode = state.session.mode;
    let in_editor = mode == Mode::LevelEditor;
    let paused = state.session.is_paused();

    match event.key {
        Key::Escape => ask(state, ConfirmKind::Quit),
        Key::Left | Key::Right => {
            let delta = if event.key == Key::Left { -1 } else { 1 };
            if in_editor {
                if event.ctrl {
                    if state.editor.modified {
                        ask(state, ConfirmKind::EditorLevelChange { delta });
                    } else {
                        editor::change_editor_level(state, store, delta);
                    }
                } else if event.shift {
                    editor::change_colour(state, delta);
                } else {
                    editor::move_cursor(state, IVec2::new(delta, 0));
                }
            } else if paused {
                state.session.change_help_style(-delta);
            } else {
                state.paddle.set_direction(delta);
            }
        }
        Key::Up | Key::Down => {
            let delta = if event.key == Key::Up { -1 } else { 1 };
            if in_editor {
                if event.shift {
                    editor::change_style(state, delta);
                } else {
                    editor::move_cursor(state, IVec2::new(0, delta));
                }
            } else if paused {
                state.session.change_help_colour(-delta);
            }
        }
        Key::Space => {
            if in_editor {
                state.editor.placing = true;
            } else if paused {
                pause_game(state);
            } else if release_stuck_balls(state) == 0 && state.paddle.has_lasers() {
                fire_bullets(state);
            }
        }
        Key::Enter => {}
        Key::Delete => {
            if in_editor {
                state.editor.erasing = true;
            }
        }
        Key::L => {
            if paused {
                if game_in_progress(state) {
                    ask(state, ConfirmKind::EditorStart);
                } else {
                    editor::start_editor(state, store);
                }
            }
        }
        Key::N => {
            if paused {
                if game_in_progress(state) {
                    ask(state, ConfirmKind::NewGame);
                } else {
                    start_game(state, store);
                }
            }
        }
        Key::P => {
            if paused {
                unpause_game(state);
            } else if !in_editor {
                pause_game(state);
            }
        }
        Key::Q => {
            if in_editor {
                if state.editor.modified {
                    ask(state, ConfirmKind::EditorQuit);
                } else {
                    editor::quit_editor(state);
                }
            } else if paused {
                ask(state, ConfirmKind::Quit);
            }
        }
        Key::R => {
            if in_editor {
                ask(state, ConfirmKind::Restore);
            }
        }
        Key::S => {
            if in_editor {
                editor::save_editor_level(state, store);
            } else {
                let enabled = !state.sound_enabled;
                state.set_sound_enabled(enabled);
                log::info!("Sound {}", if enabled { "on" } else { "off" });
            }
        }
    }
}

fn key_up(state: &mut GameState, key: Key) {
    match key {
        Key::Space => state.editor.placing = false,
        Key::Delete => state.editor.erasing = false,
        Key::Left | Key::Right if state.session.confirmation.is_none() => {
            let dir = if key == Key::Left { -1 } else { 1 };
            if state.session.mode == Mode::Playing && state.paddle.direction == dir {
                state.paddle.set_direction(0);
            }
        }
        _ => {}
    }
}

/// Steer the paddle under the most urgent ball, releasing and firing as it goes
fn autopilot(state: &mut GameState) {
    release_stuck_balls(state);

    // Track the lowest descending ball, or the lowest ball if none descend
    let target = state
        .balls
        .iter()
        .filter(|b| !b.stuck)
        .max_by_key(|b| (b.speed.y > 0, b.pos.y))
        .map(|b| b.pos.x + 8);

    let direction = match target {
        Some(x) => {
            let centre = state.paddle.x + state.paddle.width() / 2;
            // Offset the aim with time so the rebound angle varies
            let wobble = (state.time_ticks / 40 % 5) as i32 * 6 - 12;
            let error = x + wobble - centre;
            if error.abs() <= state.paddle.speed { 0 } else { error.signum() }
        }
        None => 0,
    };
    state.paddle.set_direction(direction);

    if state.paddle.has_lasers() && state.time_ticks % 10 == 0 {
        fire_bullets(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryLevelStore;
    use crate::sim::state::Phase;
    use crate::sim::testing::store_with_levels;

    fn press(key: Key) -> TickInput {
        TickInput {
            events: vec![KeyEvent::press(key)],
            ..Default::default()
        }
    }

    fn playing(store: &mut MemoryLevelStore) -> GameState {
        let mut state = GameState::new(12345);
        tick(&mut state, &press(Key::N), store);
        state
    }

    #[test]
    fn test_tick_new_game_from_help_screen() {
        let mut store = store_with_levels(2);
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default(), &mut store);
        assert_eq!(state.phase(), Phase::GameOver { help_page: 1 });
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &press(Key::N), &mut store);
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut store = store_with_levels(2);
        let mut state = playing(&mut store);
        tick(&mut state, &press(Key::Space), &mut store);
        assert!(!state.balls[0].stuck);

        tick(&mut state, &press(Key::P), &mut store);
        assert_eq!(state.phase(), Phase::Paused { help_page: 1 });
        let frozen = state.balls[0];
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), &mut store);
        assert_eq!(state.balls[0], frozen);
        assert_eq!(state.time_ticks, ticks);

        // space flips through the help screens while paused
        tick(&mut state, &press(Key::Space), &mut store);
        assert_eq!(state.phase(), Phase::Paused { help_page: 2 });

        tick(&mut state, &press(Key::P), &mut store);
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn test_paddle_direction_from_keys() {
        let mut store = store_with_levels(1);
        let mut state = playing(&mut store);
        tick(&mut state, &press(Key::Left), &mut store);
        assert_eq!(state.paddle.x, 279 - 5);

        // releasing the other arrow keeps moving
        let release_right = TickInput {
            events: vec![KeyEvent::release(Key::Right)],
            ..Default::default()
        };
        tick(&mut state, &release_right, &mut store);
        assert_eq!(state.paddle.x, 279 - 10);

        let release_left = TickInput {
            events: vec![KeyEvent::release(Key::Left)],
            ..Default::default()
        };
        tick(&mut state, &release_left, &mut store);
        assert_eq!(state.paddle.x, 279 - 10);
        assert_eq!(state.paddle.direction, 0);
    }

    #[test]
    fn test_space_fires_when_nothing_is_stuck() {
        let mut store = store_with_levels(1);
        let mut state = playing(&mut store);
        state.paddle.laser = 100;
        tick(&mut state, &press(Key::Space), &mut store);
        assert!(state.bullets.is_empty());
        tick(&mut state, &press(Key::Space), &mut store);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_escape_confirms_quit() {
        let mut store = store_with_levels(1);
        let mut state = playing(&mut store);
        tick(&mut state, &press(Key::Escape), &mut store);
        assert!(matches!(state.phase(), Phase::ConfirmationPending(_)));

        // gameplay is frozen while the dialog is open
        let ticks = state.time_ticks;
        tick(&mut state, &press(Key::Left), &mut store);
        assert_eq!(state.time_ticks, ticks);

        // Left wrapped the highlight onto "No"
        tick(&mut state, &press(Key::Enter), &mut store);
        assert!(!state.quit_requested);
        assert_eq!(state.phase(), Phase::Playing);

        tick(&mut state, &press(Key::Escape), &mut store);
        tick(&mut state, &press(Key::Space), &mut store);
        assert!(state.quit_requested);
    }

    #[test]
    fn test_new_game_needs_confirmation_mid_game() {
        let mut store = store_with_levels(2);
        let mut state = playing(&mut store);
        state.session.score = 50;
        tick(&mut state, &press(Key::P), &mut store);
        tick(&mut state, &press(Key::N), &mut store);
        assert!(matches!(state.phase(), Phase::ConfirmationPending(_)));
        tick(&mut state, &press(Key::Enter), &mut store);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn test_help_screen_brick_cycling() {
        let mut store = store_with_levels(1);
        let mut state = GameState::new(1);
        tick(&mut state, &press(Key::Down), &mut store);
        assert_eq!(state.session.help_colour, 9);
        tick(&mut state, &press(Key::Up), &mut store);
        assert_eq!(state.session.help_colour, 1);
        // left steps the style forward
        tick(&mut state, &press(Key::Left), &mut store);
        assert_eq!(state.session.help_style, 1);
    }

    #[test]
    fn test_sound_toggle() {
        let mut store = store_with_levels(1);
        let mut state = GameState::new(1);
        tick(&mut state, &press(Key::S), &mut store);
        assert!(!state.sound_enabled);
        tick(&mut state, &press(Key::S), &mut store);
        assert!(state.sound_enabled);
    }

    #[test]
    fn test_editor_session() {
        let mut store = store_with_levels(2);
        let mut state = GameState::new(1);
        tick(&mut state, &press(Key::L), &mut store);
        assert_eq!(state.phase(), Phase::LevelEditor);
        assert_eq!(state.editor.level, 3);

        let shift_right = TickInput {
            events: vec![KeyEvent::press(Key::Right).with_shift()],
            ..Default::default()
        };
        tick(&mut state, &shift_right, &mut store);
        assert_eq!(state.editor.colour, 2);

        // held space places on every editor tick
        tick(&mut state, &press(Key::Space), &mut store);
        tick(&mut state, &press(Key::Right), &mut store);
        assert!(state.editor.grid.brick_at(20, 10).is_some());
        assert!(state.editor.grid.brick_at(21, 10).is_some());
        let release = TickInput {
            events: vec![KeyEvent::release(Key::Space)],
            ..Default::default()
        };
        tick(&mut state, &release, &mut store);
        tick(&mut state, &press(Key::Right), &mut store);
        assert!(state.editor.grid.brick_at(22, 10).is_none());

        // unsaved changes need confirming before changing level
        let ctrl_right = TickInput {
            events: vec![KeyEvent::press(Key::Right).with_ctrl()],
            ..Default::default()
        };
        tick(&mut state, &ctrl_right, &mut store);
        assert!(matches!(state.phase(), Phase::ConfirmationPending(_)));
        tick(&mut state, &press(Key::Enter), &mut store);
        assert_eq!(store.max_level(), 3);
        assert_eq!(state.editor.level, 4);

        tick(&mut state, &press(Key::Q), &mut store);
        assert_eq!(state.phase(), Phase::GameOver { help_page: 1 });
    }

    #[test]
    fn test_autoplay_keeps_the_ball_in_play() {
        let mut store = store_with_levels(3);
        let mut state = playing(&mut store);
        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut store);
        assert!(!state.balls[0].stuck);

        for _ in 0..500 {
            tick(&mut state, &input, &mut store);
        }
        let width = state.paddle.width();
        assert!(state.paddle.x >= TILE_SIZE);
        assert!(state.paddle.x + width <= GAME_WIDTH - TILE_SIZE);
    }

    #[test]
    fn test_determinism() {
        let mut store1 = store_with_levels(3);
        let mut store2 = store_with_levels(3);
        let mut state1 = playing(&mut store1);
        let mut state2 = playing(&mut store2);

        let inputs = [
            press(Key::Right),
            press(Key::Space),
            TickInput {
                autoplay: true,
                ..Default::default()
            },
        ];
        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, &mut store1);
                tick(&mut state2, input, &mut store2);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.paddle, state2.paddle);
        assert_eq!(state1.session, state2.session);
    }
}
