//! Paddle movement, ball release and the paddle's rounded hit profiles

use std::ops::RangeInclusive;

use super::mask::PixelMask;
use super::state::{Ball, GameState, Paddle};
use crate::audio::SoundCue;
use crate::consts::*;

/// One horizontal band of the paddle's rounded outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    /// Playfield rows covered by the band
    pub rows: RangeInclusive<i32>,
    /// Pixels trimmed from the paddle's left edge
    pub left: i32,
    /// Pixels trimmed from the paddle's right edge
    pub right: i32,
}

/// Paddle outline for one kind of contact test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddleProfile {
    pub tiers: [Tier; 3],
}

impl PaddleProfile {
    /// Whether pixel (px, py) touches a paddle whose left edge is at `left`
    pub fn hits(&self, left: i32, width: i32, px: i32, py: i32) -> bool {
        self.tiers.iter().any(|tier| {
            tier.rows.contains(&py) && px >= left + tier.left && px <= left + width - tier.right
        })
    }
}

const fn tier(rows: RangeInclusive<i32>, left: i32, right: i32) -> Tier {
    Tier { rows, left, right }
}

/// Ball moving sideways into the paddle
pub const BALL_SIDE: PaddleProfile = PaddleProfile {
    tiers: [tier(466..=477, 3, 4), tier(467..=476, 1, 2), tier(468..=475, 0, 1)],
};

/// Ball dropping onto the paddle (tested on the row the ball moves into)
pub const BALL_DROP: PaddleProfile = PaddleProfile {
    tiers: [tier(466..=476, 3, 4), tier(467..=475, 1, 2), tier(468..=474, 0, 1)],
};

/// Moving paddle sweeping into a ball
pub const PADDLE_PUSH: PaddleProfile = PaddleProfile {
    tiers: [tier(466..=477, 3, 3), tier(467..=476, 1, 1), tier(468..=475, 0, 0)],
};

/// Falling coin landing on the paddle
pub const COIN_CATCH: PaddleProfile = PaddleProfile {
    tiers: [tier(465..=477, 3, 4), tier(466..=476, 1, 2), tier(467..=475, 0, 1)],
};

/// Launch a ball off the paddle, angled by where it sits along the paddle
pub fn release_ball(paddle: &Paddle, ball: &mut Ball) {
    ball.stuck = false;
    ball.no_rebound = NO_REBOUND_TICKS;
    ball.grey_streak = 0;

    let offset = ball.pos.x + TILE_SIZE - paddle.x;
    let mut speed_x = offset / (paddle.size + 2) - 4;
    if speed_x >= 0 {
        speed_x += 1;
    }
    ball.speed.x = speed_x.clamp(-MAX_BALL_SPEED, MAX_BALL_SPEED);
    ball.speed.y = (ball.speed.x.abs() - 5).min(-1);
}

/// Release every ball riding the paddle; returns how many were let go
pub fn release_stuck_balls(state: &mut GameState) -> usize {
    let paddle = state.paddle;
    let mut released = 0;
    for ball in state.balls.iter_mut().filter(|b| b.stuck) {
        release_ball(&paddle, ball);
        released += 1;
    }
    released
}

/// Advance the paddle `speed` pixels in its current direction
///
/// Movement stops early at a wall, after knocking a free ball, or when a
/// riding ball is pinned against a wall.
pub fn move_paddle(state: &mut GameState) {
    let dir = state.paddle.direction;
    if dir == 0 {
        return;
    }

    for _ in 0..state.paddle.speed {
        let x = state.paddle.x;
        let width = state.paddle.width();
        if x + dir < TILE_SIZE || x + dir + width >= GAME_WIDTH - TILE_SIZE + 1 {
            state.paddle.direction = 0;
            return;
        }

        let target = x + dir;
        let mut halt = false;

        for i in 0..state.balls.len() {
            let ball = state.balls[i];
            if !ball.stuck && ball.no_rebound == 0 && swept_by_paddle(&ball, target, width) {
                state.play(SoundCue::PaddleRebound);
                let paddle = state.paddle;
                let ball = &mut state.balls[i];
                ball.combo = 1;
                if paddle.is_magnetic() {
                    ball.stuck = true;
                    ball.speed = glam::IVec2::ZERO;
                } else {
                    release_ball(&paddle, ball);
                }
                halt = true;
            }

            let ball = &mut state.balls[i];
            if ball.stuck {
                ball.pos.x += dir;
                if let Some(overlap) = pin_to_wall(ball, dir, target, width) {
                    if overlap {
                        state.paddle.x -= dir;
                    }
                    halt = true;
                }
            }
        }

        state.paddle.x += dir;
        if halt {
            break;
        }
    }
}

/// Rightmost lit pixel of each row (and its mirror) against the push profile
fn swept_by_paddle(ball: &Ball, target: i32, width: i32) -> bool {
    let mask = ball.mask();
    (0..MASK_SIZE).any(|y| match mask.rightmost_in_row(y) {
        Some(x) if x > 0 => {
            let py = ball.pos.y + y as i32;
            [x, MASK_SIZE - 1 - x]
                .into_iter()
                .any(|x| PADDLE_PUSH.hits(target, width, ball.pos.x + x as i32, py))
        }
        _ => false,
    })
}

/// Clamp a riding ball that crossed a wall
///
/// Returns `None` when the ball is clear of the walls, otherwise whether the
/// paddle still overlaps the clamped ball.
fn pin_to_wall(ball: &mut Ball, dir: i32, target: i32, width: i32) -> Option<bool> {
    let slack = i32::from(MAX_BALL_SIZE - ball.size);
    let limit = if dir > 0 {
        GAME_WIDTH - TILE_SIZE - (2 * TILE_SIZE - slack)
    } else {
        TILE_SIZE - slack
    };
    let crossed = if dir > 0 {
        ball.pos.x > limit
    } else {
        ball.pos.x < limit
    };
    if !crossed {
        return None;
    }

    ball.pos.x = limit;
    let resting = GAME_HEIGHT - (2 * TILE_SIZE - 2) - (2 * TILE_SIZE - slack);
    if ball.pos.y > resting {
        ball.pos.y -= 1;
    }

    let mask = ball.mask();
    let edge = |mask: &PixelMask, y| {
        if dir > 0 {
            mask.leftmost_in_row(y)
        } else {
            mask.rightmost_in_row(y)
        }
    };
    let overlap = (0..MASK_SIZE).any(|y| {
        edge(&mask, y).is_some_and(|x| {
            PADDLE_PUSH.hits(target, width, ball.pos.x + x as i32, ball.pos.y + y as i32)
        })
    });
    Some(overlap)
}
