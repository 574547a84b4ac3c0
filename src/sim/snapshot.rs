//! Read-only view of a round for rendering

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{BlockKind, GamePhase, RoundState};

/// A block as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub row: usize,
    pub col: usize,
    pub kind: BlockKind,
    pub rect: Rect,
}

/// Everything presentation needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub paddle: Rect,
    pub mounts: Vec<Rect>,
    pub ball: Option<Rect>,
    pub blocks: Vec<BlockView>,
    pub bullets: Vec<Rect>,
}

impl Snapshot {
    pub fn capture(state: &RoundState) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            paddle: state.paddle.rect(),
            mounts: state.paddle.mounts(),
            ball: state.ball.as_ref().map(|b| b.rect()),
            blocks: state
                .blocks
                .iter()
                .map(|b| BlockView {
                    row: b.row,
                    col: b.col,
                    kind: b.kind,
                    rect: b.rect(),
                })
                .collect(),
            bullets: state.bullets.iter().map(|b| b.rect()).collect(),
        }
    }
}
