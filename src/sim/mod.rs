//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (grid order for blocks, spawn order for bullets)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use geometry::{Axis, Rect, intersects, reflect};
pub use level::{LevelError, LevelLayout, builtin_levels};
pub use snapshot::{BlockView, Snapshot};
pub use state::{
    Ball, Block, BlockKind, Bullet, GameEvent, GamePhase, Paddle, RoundOutcome, RoundState,
    WeaponMounts,
};
pub use tick::{TickInput, decay_tick, tick};
