//! Falling powerup coins

use glam::IVec2;
use rand::Rng;

use super::paddle::COIN_CATCH;
use super::powerup::{PowerupKind, gain_powerup};
use super::state::{Coin, GameState};
use crate::audio::SoundCue;
use crate::consts::*;

/// Drop a coin from a knocked-out brick; ignored when the coin list is full
pub fn spawn_coin(state: &mut GameState, powerup: PowerupKind, pos: IVec2) {
    if state.coins.push(Coin::new(powerup, pos)).is_err() {
        log::debug!("Coin list full, dropping {powerup:?}");
    }
}

/// Clear a brick cell, dropping its powerup coin
pub fn knock_out(state: &mut GameState, cx: i32, cy: i32) {
    if let Some(powerup) = state.grid.take(cx, cy).and_then(|cell| cell.powerup) {
        spawn_coin(state, powerup, IVec2::new(cx, cy) * BRICK_SIZE);
    }
}

/// Spin and drop every coin, collecting those that land on the paddle
pub fn drop_coins(state: &mut GameState) {
    let mut i = 0;
    while i < state.coins.len() {
        let coin = &mut state.coins[i];
        coin.rotation = (coin.rotation + 1) % (COIN_PHASES * COIN_SPEED);
        let coin = *coin;

        if coin.pos.y + COIN_FALL_SPEED >= COIN_CATCH_LINE && caught_by_paddle(state, &coin) {
            let variant = state.rng().random_range(1..=SoundCue::COIN_VARIANTS);
            state.play(SoundCue::Coin { variant });
            gain_powerup(state, coin.powerup);
            state.coins.remove(i);
            continue;
        }

        if coin.pos.y + COIN_FALL_SPEED > GAME_HEIGHT {
            state.coins.remove(i);
            continue;
        }
        state.coins[i].pos.y += COIN_FALL_SPEED;
        i += 1;
    }
}

/// Lowest lit pixel of each column (and its mirror row) against the catch profile
fn caught_by_paddle(state: &GameState, coin: &Coin) -> bool {
    let mask = state.coin_masks.phase(coin.phase());
    let (left, width) = (state.paddle.x, state.paddle.width());
    (0..MASK_SIZE).any(|x| {
        mask.lowest_in_column(x).is_some_and(|y| {
            let px = coin.pos.x + x as i32;
            [y, MASK_SIZE - 1 - y]
                .into_iter()
                .any(|y| COIN_CATCH.hits(left, width, px, coin.pos.y + y as i32))
        })
    })
}
