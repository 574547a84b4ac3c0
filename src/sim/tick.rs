//! Fixed timestep simulation tick
//!
//! Core game loop that advances a round deterministically. Given the previous
//! state and one input snapshot, `tick` produces the next state.

use super::state::{Block, BlockKind, Bullet, GameEvent, RoundOutcome, RoundState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x position; the paddle centers on it
    pub pointer_x: Option<f32>,
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    /// Release the ball from the paddle
    pub launch: bool,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut RoundState, input: &TickInput, dt_ms: u32) {
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;
    let score_before = state.score;
    let lives_before = state.lives;

    // 1. Paddle movement, bounded by the margins
    let paddle = &mut state.paddle;
    paddle.moving_left = input.move_left;
    paddle.moving_right = input.move_right;
    paddle.shooting = input.fire;
    if let Some(x) = input.pointer_x {
        paddle.center_on(x);
    }
    if paddle.moving_left {
        paddle.move_left();
    }
    if paddle.moving_right {
        paddle.move_right();
    }
    paddle.clamp_to(LEFT_MARGIN, RIGHT_MARGIN);

    // 2. Launch, then advance or anchor the ball
    if let Some(ball) = state.ball.as_mut() {
        if input.launch && !ball.launched {
            ball.launch();
            state.events.push(GameEvent::BallLaunched);
        }
        ball.tick(&state.paddle);
    }

    // 3. Weapon fire with cooldown
    update_weapon(state, dt_ms);

    // 4. Bullets
    for bullet in &mut state.bullets {
        bullet.advance();
    }
    state.bullets.retain(|b| !b.is_gone());

    // 5. Block hits
    resolve_block_hits(state);

    // 6. Paddle bounce
    if let Some(ball) = state.ball.as_mut() {
        if ball.launched {
            ball.collide_with_paddle(&state.paddle);
        }
    }

    // 7. Boundaries
    resolve_boundaries(state);

    // 8. Win check
    if state.is_running() && state.blocks.is_empty() {
        state.finish(RoundOutcome::Won);
    }

    // 9. HUD update
    if state.score != score_before || state.lives != lives_before {
        let (score, lives) = (state.score, state.lives);
        state.push_event(GameEvent::Stats { score, lives });
    }
}

/// Slow score decay, driven by its own timer
pub fn decay_tick(state: &mut RoundState) {
    if state.is_running() && state.score > 0 {
        state.score = state.score.saturating_sub(DECAY_PER_TICK);
        let (score, lives) = (state.score, state.lives);
        state.push_event(GameEvent::Stats { score, lives });
    }
}

fn update_weapon(state: &mut RoundState, dt_ms: u32) {
    let threshold = state.paddle.reload_threshold_ms();
    let armed = state.paddle.has_weapon();

    if armed && state.paddle.shooting && state.reload_elapsed_ms >= threshold {
        for mount in state.paddle.mounts() {
            state.bullets.push(Bullet::from_mount(&mount));
        }
        state.score = state.score.saturating_sub(SHOT_PENALTY);
        state.reload_elapsed_ms = 0;
        state.push_event(GameEvent::BulletsFired);
        log::debug!("Bullets fired, {} in flight", state.bullets.len());
    } else {
        state.reload_elapsed_ms = state.reload_elapsed_ms.saturating_add(dt_ms).min(threshold);
    }
}

fn resolve_block_hits(state: &mut RoundState) {
    let mut ball_bounced = false;
    let mut destroyed: Vec<Block> = Vec::new();
    let mut survivors = Vec::with_capacity(state.blocks.len());

    for block in std::mem::take(&mut state.blocks) {
        let block_rect = block.rect();

        let ball_hit = match state.ball.as_mut() {
            Some(ball) if ball.launched => {
                if ball_bounced {
                    // Only one reflection per tick; further overlaps still break blocks
                    ball.rect().intersects(&block_rect)
                } else {
                    ball_bounced = ball.collide_with_block(&block);
                    ball_bounced
                }
            }
            _ => false,
        };

        let bullets_before = state.bullets.len();
        state.bullets.retain(|b| !b.rect().intersects(&block_rect));
        let bullet_hit = state.bullets.len() < bullets_before;

        if ball_hit || bullet_hit {
            destroyed.push(block);
        } else {
            survivors.push(block);
        }
    }
    state.blocks = survivors;

    for block in destroyed {
        match block.kind {
            BlockKind::WeaponUpgrade => {
                state.paddle.upgrade_weapon();
                state.push_event(GameEvent::PowerUp(block.kind));
            }
            BlockKind::SizeUpgrade => {
                state.paddle.upgrade_size();
                state.paddle.clamp_to(LEFT_MARGIN, RIGHT_MARGIN);
                state.push_event(GameEvent::PowerUp(block.kind));
            }
            _ => {}
        }
        state.score += BLOCK_SCORE;
        log::debug!(
            "Block {:?} at ({}, {}) destroyed, {} left",
            block.kind,
            block.row,
            block.col,
            state.blocks.len()
        );
        state.push_event(GameEvent::BlockDestroyed {
            row: block.row,
            col: block.col,
            kind: block.kind,
        });
    }
}

fn resolve_boundaries(state: &mut RoundState) {
    let Some(ball) = state.ball.as_mut() else {
        return;
    };
    if !ball.launched {
        return;
    }

    let rect = ball.rect();
    if (rect.left() <= LEFT_MARGIN && ball.vel.x < 0.0)
        || (rect.right() >= RIGHT_MARGIN && ball.vel.x > 0.0)
    {
        ball.flip_x();
    }
    if rect.top() <= 0.0 && ball.vel.y < 0.0 {
        ball.flip_y();
    }

    if rect.top() >= WINDOW_HEIGHT {
        debug_assert!(state.lives > 0, "ball lost with no lives left");
        state.lives = state.lives.saturating_sub(1);
        state.ball = None;
        log::info!("Life lost, {} remaining", state.lives);
        let remaining = state.lives;
        state.push_event(GameEvent::LifeLost { remaining });

        if state.lives > 0 {
            state.spawn_ball_anchored();
        } else {
            state.finish(RoundOutcome::Lost);
        }
    }
}
