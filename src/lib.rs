//! Brickfall - A single-screen breakout game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, round state)
//! - `game`: Session driver (timers, input intents, level sequence)
//! - `highscores`: Bounded in-memory leaderboard
//! - `settings`: Player-facing configuration

pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use game::{Game, Key};
pub use highscores::{ScoreEntry, ScoreTable};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation tick interval (ms)
    pub const SIM_TICK_MS: u32 = 20;
    /// Score decay tick interval (ms)
    pub const DECAY_TICK_MS: u32 = 1000;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the session will try to catch up on (ms)
    pub const MAX_FRAME_MS: u32 = 100;

    /// Window dimensions
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;

    /// Level grid
    pub const GRID_ROWS: usize = 17;
    pub const GRID_COLS: usize = 17;
    pub const BLOCK_WIDTH: f32 = 48.0;
    pub const BLOCK_HEIGHT: f32 = 18.0;
    /// Spacing between neighbouring blocks
    pub const BLOCK_GAP: f32 = 1.0;

    /// Playable area: the grid (gaps included) centered in the window, side
    /// panels excluded. Symmetric margins derived from the grid width rather
    /// than a fixed right-hand panel.
    pub const LEFT_MARGIN: f32 =
        (WINDOW_WIDTH - GRID_COLS as f32 * (BLOCK_WIDTH + BLOCK_GAP)) / 2.0;
    pub const RIGHT_MARGIN: f32 = WINDOW_WIDTH - LEFT_MARGIN;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 64.0;
    pub const PADDLE_HEIGHT: f32 = 18.0;
    /// Distance between paddle bottom and window bottom
    pub const PADDLE_BOTTOM_OFFSET: f32 = 60.0;
    pub const PADDLE_SPEED: f32 = 10.0;
    pub const PADDLE_GROWTH: f32 = 16.0;
    /// Shots per second
    pub const FIRE_RATE: f32 = 2.5;
    pub const MOUNT_SIZE: f32 = 18.0;

    /// Ball defaults (velocity in units per tick)
    pub const BALL_SIZE: f32 = 16.0;
    pub const BALL_START_VEL_X: f32 = 5.0;
    pub const BALL_START_VEL_Y: f32 = -10.0;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 6.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const BULLET_SPEED: f32 = 12.0;

    /// Scoring
    pub const BLOCK_SCORE: u64 = 50;
    pub const SHOT_PENALTY: u64 = 10;
    pub const DECAY_PER_TICK: u64 = 1;
    pub const STARTING_LIVES: u8 = 3;
}
