//! Shared fixtures for simulation tests

use glam::IVec2;

use super::grid::{BrickGrid, Cell};
use super::session::start_game;
use super::state::{Ball, GameState};
use crate::consts::GREY_COLOUR;
use crate::persistence::{LevelLibrary, MemoryLevelStore};

/// `count` levels, each with two destructible bricks and one grey brick
pub fn store_with_levels(count: u32) -> MemoryLevelStore {
    let mut library = LevelLibrary::new(3);
    for id in 1..=count {
        let mut grid = BrickGrid::new();
        grid.set(id as i32, 2, Cell::brick(1, 4));
        grid.set(10, 10, Cell::brick(2, 6));
        grid.set(12, 10, Cell::brick(1, GREY_COLOUR));
        library.insert(id, &grid);
    }
    MemoryLevelStore::new(library)
}

/// A game in progress with an empty grid and no balls
pub fn empty_game(store: &MemoryLevelStore) -> GameState {
    let mut state = GameState::new(42);
    start_game(&mut state, store);
    state.balls.clear();
    state.grid = BrickGrid::new();
    state.drain_sounds();
    state
}

/// A free ball at `pos` moving with `speed`
pub fn ball(size: u8, pos: (i32, i32), speed: (i32, i32)) -> Ball {
    let mut ball = Ball::new(size, IVec2::new(pos.0, pos.1));
    ball.speed = IVec2::new(speed.0, speed.1);
    ball
}
