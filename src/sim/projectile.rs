//! Laser bullets and explosion markers

use glam::IVec2;

use super::coins::knock_out;
use super::session::{add_brick_score, count_cleared_brick};
use super::state::{Bullet, Explosion, GameState};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::persistence::LevelStore;
use crate::pixel_to_cell;

/// Row bullets leave the paddle from
const MUZZLE_Y: i32 = PADDLE_TOP;

/// Fire a bullet from each end of the paddle; a full list drops the shot
pub fn fire_bullets(state: &mut GameState) {
    let paddle = state.paddle;
    for x in [paddle.x + 6, paddle.x + TILE_SIZE * (paddle.size + 1)] {
        let bullet = Bullet {
            pos: IVec2::new(x, MUZZLE_Y),
            remove: false,
        };
        if state.bullets.push(bullet).is_err() {
            log::debug!("Bullet list full");
        }
    }
    state.play(SoundCue::LaserFire);
}

/// Advance every bullet, knocking out the first destructible brick each one meets
///
/// Spent bullets are compacted out on the following pass. Grey bricks do not
/// stop bullets.
pub fn move_bullets(state: &mut GameState, levels: &dyn LevelStore) {
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = state.bullets[i];
        if bullet.remove {
            state.bullets.remove(i);
            continue;
        }

        let next_y = bullet.pos.y - LASER_SPEED;
        if next_y <= 0 {
            state.bullets[i].remove = true;
            i += 1;
            continue;
        }

        let (cx, cy) = (pixel_to_cell(bullet.pos.x), pixel_to_cell(next_y));
        if let Some(cell) = state.grid.brick_at(cx, cy).filter(|cell| !cell.is_grey()) {
            add_brick_score(state, &cell, 1);
            state.play(SoundCue::BrickKo);
            knock_out(state, cx, cy);
            state.bullets[i].remove = true;
            // A level change clears every bullet
            if cell.is_destructible() && count_cleared_brick(state, levels) {
                return;
            }
        }
        state.bullets[i].pos.y = next_y;
        i += 1;
    }
}

/// Add a blast marker; ignored when the list is full
pub fn add_explosion(state: &mut GameState, pos: IVec2, size_class: u32) {
    if state.explosions.push(Explosion::new(pos, size_class)).is_err() {
        log::debug!("Explosion list full");
    }
}

/// Age every blast marker, dropping those that have faded
pub fn decay_explosions(state: &mut GameState) {
    for explosion in state.explosions.iter_mut() {
        explosion.remaining = explosion.remaining.saturating_sub(1);
    }
    state.explosions.retain(|explosion| explosion.remaining > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use crate::sim::powerup::PowerupKind;
    use crate::sim::testing::{empty_game, store_with_levels};

    #[test]
    fn test_fire_from_both_paddle_ends() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        fire_bullets(&mut state);
        assert_eq!(state.bullets.len(), 2);
        assert_eq!(state.bullets[0].pos, IVec2::new(279 + 6, 464));
        assert_eq!(state.bullets[1].pos, IVec2::new(279 + 72, 464));
        assert_eq!(state.sounds(), &[SoundCue::LaserFire]);
    }

    #[test]
    fn test_full_bullet_list_still_sounds() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        for _ in 0..MAX_BULLETS / 2 {
            fire_bullets(&mut state);
        }
        state.drain_sounds();
        fire_bullets(&mut state);
        assert_eq!(state.bullets.len(), MAX_BULLETS);
        assert_eq!(state.sounds(), &[SoundCue::LaserFire]);
    }

    #[test]
    fn test_bullet_knocks_out_brick() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        state.grid.set(5, 10, Cell::brick(2, 3));
        state.grid.set(6, 10, Cell::brick(1, 4));
        state.session.bricks_remaining = 2;
        state.bullets.push(Bullet {
            pos: IVec2::new(85, 170),
            remove: false,
        }).unwrap();

        move_bullets(&mut state, &store);
        // (170 - 6) / 16 = 10
        assert!(state.grid.brick_at(5, 10).is_none());
        assert_eq!(state.session.score, 2 * (3 + 1));
        assert_eq!(state.session.bricks_remaining, 1);
        assert!(state.bullets[0].remove);
        assert_eq!(state.bullets[0].pos.y, 164);

        move_bullets(&mut state, &store);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_passes_grey_brick() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        state.grid.set(5, 10, Cell::brick(1, GREY_COLOUR));
        state.bullets.push(Bullet {
            pos: IVec2::new(85, 170),
            remove: false,
        }).unwrap();
        for _ in 0..4 {
            move_bullets(&mut state, &store);
        }
        assert!(state.grid.brick_at(5, 10).is_some());
        assert!(!state.bullets[0].remove);
        assert_eq!(state.bullets[0].pos.y, 170 - 4 * LASER_SPEED);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_bullet_drops_coin() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        let mut cell = Cell::brick(1, 4);
        cell.powerup = Some(PowerupKind::Guns);
        state.grid.set(5, 10, cell);
        state.session.bricks_remaining = 2;
        state.bullets.push(Bullet {
            pos: IVec2::new(85, 170),
            remove: false,
        }).unwrap();
        move_bullets(&mut state, &store);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.coins[0].pos, IVec2::new(80, 160));
    }

    #[test]
    fn test_bullet_spent_at_top() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        for y in [6, 40] {
            state.bullets.push(Bullet {
                pos: IVec2::new(100, y),
                remove: false,
            }).unwrap();
        }
        move_bullets(&mut state, &store);
        assert!(state.bullets[0].remove);
        assert_eq!(state.bullets[0].pos.y, 6);
        assert_eq!(state.bullets[1].pos.y, 34);

        // the spent bullet is compacted and the next one still moves
        move_bullets(&mut state, &store);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.y, 28);
    }

    #[test]
    fn test_last_brick_by_bullet_changes_level() {
        let store = store_with_levels(2);
        let mut state = empty_game(&store);
        state.grid.set(5, 10, Cell::brick(1, 4));
        state.session.bricks_remaining = 1;
        for x in [85, 200] {
            state.bullets.push(Bullet {
                pos: IVec2::new(x, 170),
                remove: false,
            }).unwrap();
        }
        move_bullets(&mut state, &store);
        assert_eq!(state.session.level, 2);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_explosions_fade() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        add_explosion(&mut state, IVec2::new(0, 0), 1);
        add_explosion(&mut state, IVec2::new(32, 0), 2);
        for _ in 0..EXPLOSION_FRAMES {
            decay_explosions(&mut state);
        }
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].pos, IVec2::new(32, 0));
        assert_eq!(state.explosions[0].remaining, EXPLOSION_FRAMES);
    }

    #[test]
    fn test_explosion_list_is_bounded() {
        let store = store_with_levels(1);
        let mut state = empty_game(&store);
        for _ in 0..MAX_EXPLOSIONS + 5 {
            add_explosion(&mut state, IVec2::ZERO, 1);
        }
        assert_eq!(state.explosions.len(), MAX_EXPLOSIONS);
    }
}
