//! Sprite-level rendering
//!
//! The game is drawn as a list of sprites at playfield pixel positions. A
//! [`RenderSurface`] maps each sprite to its sheet region; [`DrawList`]
//! simply records them.

pub mod shading;

use glam::IVec2;

use crate::consts::*;
use crate::sim::grid::BrickGrid;
use crate::sim::powerup::PowerupKind;
use crate::sim::state::{ConfirmKind, GameState, Mode};
use shading::{Corner, corner_tile, corners, edge_tile, neighbours};

/// Everything the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    /// Level backdrop (the editor shows the edited level's)
    Background { level: u32 },
    /// Playfield frame; the editor frame differs
    Border { editor: bool },
    Paddle { size: i32, magnetic: bool, laser: bool },
    Ball { size: u8, fire: bool, explosive: bool },
    /// A brick sheet tile (in 16px tiles)
    Brick { tile: IVec2 },
    BrickCorner { corner: Corner, tile: IVec2 },
    Coin { powerup: PowerupKind, phase: u32 },
    Bullet,
    Explosion { size_class: u32, frame: u32 },
    Message { powerup: PowerupKind },
    Lives { count: u8 },
    Score { score: u64, multiplier: u32 },
    Help { page: u8, style: u8, colour: u8, game_over: bool },
    EditorCursor { frame: u32 },
    EditorSelection { style: u8, colour: u8 },
    EditorLevel { level: u32 },
    Confirmation { kind: ConfirmKind, selected: usize },
}

/// Render target keyed by sprite
pub trait RenderSurface {
    fn draw(&mut self, sprite: Sprite, pos: IVec2);
}

/// Surface that records draws in order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub sprites: Vec<(Sprite, IVec2)>,
}

impl RenderSurface for DrawList {
    fn draw(&mut self, sprite: Sprite, pos: IVec2) {
        self.sprites.push((sprite, pos));
    }
}

/// Draw the current frame, back to front
pub fn draw_game(state: &GameState, surface: &mut dyn RenderSurface) {
    match state.session.mode {
        Mode::LevelEditor => draw_editor(state, surface),
        Mode::Paused { help_page } => {
            let session = &state.session;
            surface.draw(
                Sprite::Help {
                    page: help_page,
                    style: session.help_style,
                    colour: session.help_colour,
                    game_over: session.game_lost,
                },
                IVec2::ZERO,
            );
        }
        Mode::Playing => draw_playfield(state, surface),
    }

    if let Some(confirmation) = state.session.confirmation {
        surface.draw(
            Sprite::Confirmation {
                kind: confirmation.kind,
                selected: confirmation.selected,
            },
            IVec2::new(GAME_WIDTH / 2, GAME_HEIGHT / 2),
        );
    }
}

fn draw_playfield(state: &GameState, surface: &mut dyn RenderSurface) {
    surface.draw(Sprite::Background { level: state.session.level }, IVec2::ZERO);

    for bullet in state.bullets.iter().filter(|b| !b.remove) {
        surface.draw(Sprite::Bullet, bullet.pos);
    }

    let paddle = &state.paddle;
    surface.draw(
        Sprite::Paddle {
            size: paddle.size,
            magnetic: paddle.is_magnetic(),
            laser: paddle.has_lasers(),
        },
        IVec2::new(paddle.x, PADDLE_TOP),
    );

    draw_grid(&state.grid, surface);

    for coin in state.coins.iter() {
        surface.draw(
            Sprite::Coin {
                powerup: coin.powerup,
                phase: coin.phase(),
            },
            coin.pos,
        );
    }
    for ball in state.balls.iter() {
        surface.draw(
            Sprite::Ball {
                size: ball.size,
                fire: ball.is_fireball(),
                explosive: ball.is_explosive(),
            },
            ball.pos,
        );
    }
    for explosion in state.explosions.iter() {
        surface.draw(
            Sprite::Explosion {
                size_class: explosion.size_class,
                frame: explosion.frame(),
            },
            explosion.pos,
        );
    }
    for (slot, &powerup) in state.messages.messages().iter().enumerate() {
        let pos = IVec2::new(GAME_WIDTH / 2 - 80, TILE_SIZE * 35 + slot as i32 * 36);
        surface.draw(Sprite::Message { powerup }, pos);
    }

    surface.draw(Sprite::Border { editor: false }, IVec2::ZERO);
    surface.draw(Sprite::Lives { count: state.session.lives }, IVec2::ZERO);
    surface.draw(
        Sprite::Score {
            score: state.session.score,
            multiplier: state.session.multiplier,
        },
        IVec2::new(GAME_WIDTH, 0),
    );
}

fn draw_grid(grid: &BrickGrid, surface: &mut dyn RenderSurface) {
    for (x, y, cell) in grid.iter().filter(|(_, _, cell)| cell.is_brick()) {
        let pos = IVec2::new(x, y) * BRICK_SIZE;
        let n = neighbours(grid, x, y);
        surface.draw(Sprite::Brick { tile: edge_tile(cell, n) }, pos);
        for corner in corners(n) {
            let tile = corner_tile(cell, corner);
            surface.draw(Sprite::BrickCorner { corner, tile }, pos);
        }
    }
}

fn draw_editor(state: &GameState, surface: &mut dyn RenderSurface) {
    let editor = &state.editor;
    surface.draw(Sprite::Background { level: editor.level }, IVec2::ZERO);
    draw_grid(&editor.grid, surface);

    let selection_pos = IVec2::new(0, EDITOR_HEIGHT * BRICK_SIZE);
    surface.draw(
        Sprite::EditorSelection {
            style: editor.style,
            colour: editor.colour,
        },
        selection_pos,
    );
    surface.draw(
        Sprite::EditorLevel { level: editor.level },
        IVec2::new(GAME_WIDTH / 2, EDITOR_HEIGHT * BRICK_SIZE),
    );
    surface.draw(
        Sprite::EditorCursor { frame: editor.cursor_frame() },
        editor.cursor * BRICK_SIZE,
    );
    surface.draw(Sprite::Border { editor: true }, IVec2::ZERO);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use crate::sim::testing::{empty_game, store_with_levels};

    fn render(state: &GameState) -> Vec<(Sprite, IVec2)> {
        let mut list = DrawList::default();
        draw_game(state, &mut list);
        list.sprites
    }

    #[test]
    fn test_help_screen_only_when_paused() {
        let state = GameState::new(1);
        let sprites = render(&state);
        assert_eq!(sprites.len(), 1);
        assert!(matches!(sprites[0].0, Sprite::Help { page: 1, game_over: true, .. }));
    }

    #[test]
    fn test_playfield_draw_order() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        state.grid.set(2, 3, Cell::brick(1, 4));
        let sprites = render(&state);
        let kinds: Vec<_> = sprites.iter().map(|(s, _)| std::mem::discriminant(s)).collect();
        let first = |sprite: Sprite| kinds.iter().position(|k| *k == std::mem::discriminant(&sprite));
        let paddle = first(Sprite::Paddle { size: 0, magnetic: false, laser: false }).unwrap();
        let brick = first(Sprite::Brick { tile: IVec2::ZERO }).unwrap();
        let border = first(Sprite::Border { editor: false }).unwrap();
        assert_eq!(kinds[0], std::mem::discriminant(&Sprite::Background { level: 0 }));
        assert!(paddle < brick && brick < border);
        assert!(sprites.contains(&(Sprite::Brick { tile: IVec2::new(5, 10) }, IVec2::new(32, 48))));
    }

    #[test]
    fn test_confirmation_drawn_last() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        crate::sim::session::ask(&mut state, ConfirmKind::Quit);
        let sprites = render(&state);
        assert!(matches!(
            sprites.last(),
            Some((Sprite::Confirmation { kind: ConfirmKind::Quit, selected: 0 }, _))
        ));
    }

    #[test]
    fn test_editor_draws_cursor_cell() {
        let store = store_with_levels(2);
        let mut state = GameState::new(1);
        crate::sim::editor::start_editor(&mut state, &store);
        let sprites = render(&state);
        assert!(sprites.contains(&(Sprite::EditorCursor { frame: 0 }, IVec2::new(320, 160))));
        assert!(sprites.contains(&(Sprite::Background { level: 3 }, IVec2::ZERO)));
    }
}
