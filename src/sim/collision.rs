//! Pixel-exact ball collision resolution
//!
//! Balls move one pixel at a time. Before each step the lit pixels of the
//! ball's mask are scanned from the leading edge; the first pixel that would
//! touch a wall, the paddle or a brick resolves the contact and blocks the
//! step.

use glam::IVec2;

use super::coins::knock_out;
use super::paddle::{BALL_DROP, BALL_SIDE, release_ball};
use super::session::{add_brick_score, count_cleared_brick, lose_ball};
use super::projectile::add_explosion;
use super::state::GameState;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::persistence::LevelStore;
use crate::pixel_to_cell;

/// Single-pixel ball movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Left,
    Right,
    Up,
    Down,
}

impl Step {
    pub fn offset(self) -> IVec2 {
        match self {
            Step::Left => IVec2::NEG_X,
            Step::Right => IVec2::X,
            Step::Up => IVec2::NEG_Y,
            Step::Down => IVec2::Y,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Step::Left | Step::Right)
    }

    /// Mask pixels in the order they are tested, leading edge first
    fn scan_order(self) -> impl Iterator<Item = (usize, usize)> {
        (0..MASK_SIZE * MASK_SIZE).map(move |i| {
            let (outer, inner) = (i / MASK_SIZE, i % MASK_SIZE);
            match self {
                Step::Left | Step::Up => (inner, outer),
                Step::Right => (MASK_SIZE - 1 - inner, outer),
                Step::Down => (outer, MASK_SIZE - 1 - inner),
            }
        })
    }
}

/// Outcome of testing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Step is clear
    None,
    /// Bounced off a wall
    Border,
    /// Bounced off or stuck to the paddle
    Paddle,
    /// Bounced off a grey brick
    GreyRebound,
    /// Knocked out a grey brick
    GreyKnockout,
    /// Knocked out a brick
    Brick,
    /// Fell off the bottom and was removed
    Lost,
}

impl Contact {
    /// Whether the step was blocked
    pub fn blocks(self) -> bool {
        self != Contact::None
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Order of pixel steps per tick, indexed by horizontal speed
const STEP_PATTERNS: [&[Axis]; 5] = {
    use Axis::{X, Y};
    [
        &[],
        &[Y, Y, X, Y, Y],
        &[Y, X, Y, X, Y],
        &[X, Y, X, Y, X],
        &[X, X, Y, X, X],
    ]
};

/// Move every free ball through its step pattern for this tick
pub fn move_balls(state: &mut GameState, levels: &dyn LevelStore) {
    let mut i = 0;
    while i < state.balls.len() {
        let ball = state.balls[i];
        if ball.stuck {
            i += 1;
            continue;
        }

        let step_x = if ball.speed.x > 0 { Step::Right } else { Step::Left };
        let step_y = if ball.speed.y > 0 { Step::Down } else { Step::Up };
        let pattern = STEP_PATTERNS[ball.speed.x.unsigned_abs().min(MAX_BALL_SPEED as u32) as usize];

        let mut lost = false;
        for axis in pattern {
            let step = match axis {
                Axis::X => step_x,
                Axis::Y => step_y,
            };
            match collision_check(state, levels, i, step) {
                Contact::None => state.balls[i].pos += step.offset(),
                Contact::Lost => {
                    lost = true;
                    break;
                }
                _ => break,
            }
        }
        // A lost ball shifts the next one into this slot
        if !lost {
            i += 1;
        }
    }
}

/// Test (and resolve) moving ball `index` one pixel
pub fn collision_check(
    state: &mut GameState,
    levels: &dyn LevelStore,
    index: usize,
    step: Step,
) -> Contact {
    let Some(&ball) = state.balls.get(index) else {
        return Contact::None;
    };
    let mask = ball.mask();

    for (x, y) in step.scan_order() {
        if !mask.is_set(x, y) {
            continue;
        }
        let target = ball.pos + IVec2::new(x as i32, y as i32) + step.offset();
        let contact = resolve_pixel(state, levels, index, step, target);
        if contact.blocks() {
            return contact;
        }
    }

    if step == Step::Down && state.balls[index].pos.y > GAME_HEIGHT - 1 {
        lose_ball(state, index);
        return Contact::Lost;
    }
    Contact::None
}

fn bounce(state: &mut GameState, index: usize, step: Step) {
    let ball = &mut state.balls[index];
    if step.is_horizontal() {
        ball.speed.x = -ball.speed.x;
    } else {
        ball.speed.y = -ball.speed.y;
    }
}

/// Borders, then paddle, then bricks
fn resolve_pixel(
    state: &mut GameState,
    levels: &dyn LevelStore,
    index: usize,
    step: Step,
    target: IVec2,
) -> Contact {
    let hits_border = match step {
        Step::Left => target.x < TILE_SIZE,
        Step::Right => target.x > GAME_WIDTH - 1 - TILE_SIZE,
        Step::Up => target.y < TILE_SIZE,
        Step::Down => false,
    };
    if hits_border {
        bounce(state, index, step);
        state.play(SoundCue::BorderRebound);
        return Contact::Border;
    }

    let paddle = state.paddle;
    if step != Step::Up && state.balls[index].no_rebound == 0 {
        let profile = if step == Step::Down { &BALL_DROP } else { &BALL_SIDE };
        if profile.hits(paddle.x, paddle.width(), target.x, target.y) {
            state.play(SoundCue::PaddleRebound);
            let ball = &mut state.balls[index];
            ball.combo = 1;
            if paddle.is_magnetic() {
                ball.stuck = true;
                ball.speed = IVec2::ZERO;
            } else {
                release_ball(&paddle, ball);
            }
            return Contact::Paddle;
        }
    }

    let (cx, cy) = (pixel_to_cell(target.x), pixel_to_cell(target.y));
    let Some(cell) = state.grid.brick_at(cx, cy) else {
        return Contact::None;
    };
    let ball = state.balls[index];

    if cell.is_grey() {
        if ball.size < KNOCKOUT_BALL_SIZE && ball.grey_streak < GREY_STREAK_LIMIT {
            bounce(state, index, step);
            state.play(SoundCue::BrickRebound);
            state.balls[index].grey_streak += 1;
            return Contact::GreyRebound;
        }
        state.play(SoundCue::BrickKo);
        knock_out(state, cx, cy);
        if !ball.is_fireball() {
            bounce(state, index, step);
        }
        if ball.is_explosive() && explode(state, levels, index, cx, cy) {
            return Contact::GreyKnockout;
        }
        state.balls[index].grey_streak = 0;
        return Contact::GreyKnockout;
    }

    add_brick_score(state, &cell, ball.combo);
    state.play(SoundCue::BrickKo);
    knock_out(state, cx, cy);
    if cell.is_destructible() && count_cleared_brick(state, levels) {
        return Contact::Brick;
    }
    if !ball.is_fireball() {
        bounce(state, index, step);
    }
    if ball.is_explosive() && explode(state, levels, index, cx, cy) {
        return Contact::Brick;
    }
    let ball = &mut state.balls[index];
    ball.combo += 1;
    ball.grey_streak = 0;
    Contact::Brick
}

/// Whether cell offset (dx, dy) lies in the blast of a ball of `size`
fn in_blast(size: u8, dx: i32, dy: i32) -> bool {
    let (ax, ay) = (dx.abs(), dy.abs());
    match size {
        0..=2 => (dx == 0 || dy == 0) && ax < 2 && ay < 2,
        3..=5 => ax <= 1 && ay <= 1,
        _ => ax <= 1 || ay <= 1,
    }
}

/// Blast the bricks around cell (cx, cy) knocked out by explosive ball `index`
///
/// Returns true if the blast cleared the level, in which case the ball list
/// has been reset and no explosion marker is added.
pub fn explode(
    state: &mut GameState,
    levels: &dyn LevelStore,
    index: usize,
    cx: i32,
    cy: i32,
) -> bool {
    let size = state.balls[index].size;

    for dx in -2..=2 {
        for dy in -2..=2 {
            if !in_blast(size, dx, dy) {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            let Some(cell) = state.grid.brick_at(x, y) else {
                continue;
            };
            if cell.is_grey() {
                if size >= KNOCKOUT_BALL_SIZE {
                    knock_out(state, x, y);
                }
            } else if cell.is_destructible() {
                let combo = state.balls[index].combo;
                add_brick_score(state, &cell, combo);
                if count_cleared_brick(state, levels) {
                    return true;
                }
                knock_out(state, x, y);
                let ball = &mut state.balls[index];
                ball.combo += 1;
                ball.grey_streak = 0;
            }
        }
    }

    let origin = IVec2::new(cx - 2, cy - 2) * BRICK_SIZE;
    add_explosion(state, origin, u32::from(size) / 3 + 1);
    false
}
