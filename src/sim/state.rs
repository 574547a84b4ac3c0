//! Round state and core simulation types
//!
//! Everything the simulation mutates during a round lives in [`RoundState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Axis, Rect, reflect};
use super::level::LevelLayout;
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Round built but not started
    Idle,
    /// Ticking
    Running,
    /// Round ended, timers stopped, waiting for score submission/restart
    RoundOver(RoundOutcome),
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Won,
    Lost,
}

/// Events raised by the simulation for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched,
    BulletsFired,
    BlockDestroyed {
        row: usize,
        col: usize,
        kind: BlockKind,
    },
    PowerUp(BlockKind),
    LifeLost {
        remaining: u8,
    },
    /// Score or lives changed during the tick
    Stats {
        score: u64,
        lives: u8,
    },
    RoundOver {
        outcome: RoundOutcome,
        score: u64,
    },
}

/// Left/right weapon mounts carried by an armed paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponMounts {
    pub left: Rect,
    pub right: Rect,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    pub move_speed: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub shooting: bool,
    /// Present once the weapon power-up has been collected
    pub weapon: Option<WeaponMounts>,
}

impl Default for Paddle {
    fn default() -> Self {
        let size = Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT);
        Self {
            pos: Vec2::new(
                WINDOW_WIDTH / 2.0 - size.x / 2.0,
                WINDOW_HEIGHT - size.y - PADDLE_BOTTOM_OFFSET,
            ),
            size,
            move_speed: PADDLE_SPEED,
            fire_rate: FIRE_RATE,
            moving_left: false,
            moving_right: false,
            shooting: false,
            weapon: None,
        }
    }
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn has_weapon(&self) -> bool {
        self.weapon.is_some()
    }

    pub fn move_left(&mut self) {
        self.pos.x -= self.move_speed;
        self.sync_mounts();
    }

    pub fn move_right(&mut self) {
        self.pos.x += self.move_speed;
        self.sync_mounts();
    }

    /// Center the paddle on a pointer x coordinate
    pub fn center_on(&mut self, x: f32) {
        self.pos.x = x - self.size.x / 2.0;
        self.sync_mounts();
    }

    /// Pin the paddle between the playable margins
    pub fn clamp_to(&mut self, left: f32, right: f32) {
        let max_x = (right - self.size.x).max(left);
        self.pos.x = self.pos.x.clamp(left, max_x);
        self.sync_mounts();
    }

    /// Attach weapon mounts (no-op if already armed)
    pub fn upgrade_weapon(&mut self) {
        if self.weapon.is_none() {
            let mount = Rect::new(self.pos, Vec2::splat(MOUNT_SIZE));
            self.weapon = Some(WeaponMounts {
                left: mount,
                right: mount,
            });
            self.sync_mounts();
        }
    }

    pub fn upgrade_size(&mut self) {
        self.size.x += PADDLE_GROWTH;
        self.sync_mounts();
    }

    /// Recompute mount positions from the paddle's position and size
    pub fn sync_mounts(&mut self) {
        if let Some(mounts) = self.weapon.as_mut() {
            mounts.left.pos = self.pos;
            mounts.right.pos = Vec2::new(self.pos.x + self.size.x - mounts.right.size.x, self.pos.y);
        }
    }

    /// Mount rectangles, left then right (empty while unarmed)
    pub fn mounts(&self) -> Vec<Rect> {
        self.weapon
            .map(|m| vec![m.left, m.right])
            .unwrap_or_default()
    }

    /// Time between shots (ms)
    pub fn reload_threshold_ms(&self) -> u32 {
        (1000.0 / self.fire_rate).round() as u32
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per tick
    pub vel: Vec2,
    /// False while glued to the paddle
    pub launched: bool,
}

impl Ball {
    /// Create a ball resting on top of the paddle
    pub fn anchored(paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(BALL_SIZE),
            vel: Vec2::new(BALL_START_VEL_X, BALL_START_VEL_Y),
            launched: false,
        };
        ball.snap_to(paddle);
        ball
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn launch(&mut self) {
        self.launched = true;
    }

    fn snap_to(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(
            paddle.pos.x + paddle.size.x / 2.0 - self.size.x / 2.0,
            paddle.pos.y - self.size.y,
        );
    }

    /// Advance by velocity, or follow the paddle until launched
    pub fn tick(&mut self, paddle: &Paddle) {
        if self.launched {
            self.pos += self.vel;
        } else {
            self.snap_to(paddle);
        }
    }

    /// Bounce off the paddle; only a descending ball is turned around
    pub fn collide_with_paddle(&mut self, paddle: &Paddle) -> bool {
        if self.vel.y > 0.0 && self.rect().intersects(&paddle.rect()) {
            self.flip_y();
            return true;
        }
        false
    }

    /// Bounce off a block and report the hit (the caller destroys it)
    pub fn collide_with_block(&mut self, block: &Block) -> bool {
        if self.rect().intersects(&block.rect()) {
            self.flip_y();
            return true;
        }
        false
    }

    pub fn flip_x(&mut self) {
        self.vel = reflect(self.vel, Axis::X);
    }

    pub fn flip_y(&mut self) {
        self.vel = reflect(self.vel, Axis::Y);
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Plain1,
    Plain2,
    Plain3,
    Plain4,
    WeaponUpgrade,
    SizeUpgrade,
}

impl BlockKind {
    /// Parse a level tag character
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            '1' => Some(BlockKind::Plain1),
            '2' => Some(BlockKind::Plain2),
            '3' => Some(BlockKind::Plain3),
            '4' => Some(BlockKind::Plain4),
            'W' | 'w' => Some(BlockKind::WeaponUpgrade),
            'S' | 's' => Some(BlockKind::SizeUpgrade),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            BlockKind::Plain1 => '1',
            BlockKind::Plain2 => '2',
            BlockKind::Plain3 => '3',
            BlockKind::Plain4 => '4',
            BlockKind::WeaponUpgrade => 'W',
            BlockKind::SizeUpgrade => 'S',
        }
    }

    pub fn is_power_up(&self) -> bool {
        matches!(self, BlockKind::WeaponUpgrade | BlockKind::SizeUpgrade)
    }
}

/// A block, identified by its grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub row: usize,
    pub col: usize,
    pub kind: BlockKind,
    pub pos: Vec2,
}

impl Block {
    /// Place a block at its screen position for the given grid cell
    pub fn at_cell(row: usize, col: usize, kind: BlockKind) -> Self {
        Self {
            row,
            col,
            kind,
            pos: Vec2::new(
                LEFT_MARGIN + col as f32 * (BLOCK_WIDTH + BLOCK_GAP),
                row as f32 * (BLOCK_HEIGHT + BLOCK_GAP),
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT))
    }
}

/// A bullet fired from a weapon mount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
}

impl Bullet {
    /// Spawn a bullet centered above a mount
    pub fn from_mount(mount: &Rect) -> Self {
        Self {
            pos: Vec2::new(mount.center_x() - BULLET_WIDTH / 2.0, mount.top() - BULLET_HEIGHT),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }

    pub fn advance(&mut self) {
        self.pos.y -= BULLET_SPEED;
    }

    /// Whether the bullet has fully left the play area
    pub fn is_gone(&self) -> bool {
        self.rect().bottom() < 0.0
    }
}

/// Complete state of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub paddle: Paddle,
    /// None once the last life has been lost
    pub ball: Option<Ball>,
    pub blocks: Vec<Block>,
    pub bullets: Vec<Bullet>,
    /// Time accumulated toward the next shot (ms), capped at the threshold
    pub reload_elapsed_ms: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events for presentation
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl RoundState {
    /// Build a fresh round from a level layout
    pub fn new(level: &LevelLayout, lives: u8) -> Self {
        let lives = if lives == 0 {
            log::warn!("A round needs at least one life, using 1");
            1
        } else {
            lives
        };
        let paddle = Paddle::default();
        let ball = Ball::anchored(&paddle);
        let reload_elapsed_ms = paddle.reload_threshold_ms();
        Self {
            phase: GamePhase::Idle,
            score: 0,
            lives,
            paddle,
            ball: Some(ball),
            blocks: level.spawn_blocks(),
            bullets: Vec::new(),
            reload_elapsed_ms,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a new ball glued to the paddle
    pub fn spawn_ball_anchored(&mut self) {
        self.ball = Some(Ball::anchored(&self.paddle));
    }

    /// End the round and notify presentation
    pub fn finish(&mut self, outcome: RoundOutcome) {
        self.phase = GamePhase::RoundOver(outcome);
        self.bullets.clear();
        log::info!("Round over: {:?} with score {}", outcome, self.score);
        self.push_event(GameEvent::RoundOver {
            outcome,
            score: self.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddle_starts_centered_above_bottom() {
        let paddle = Paddle::default();
        assert_eq!(paddle.rect().center_x(), WINDOW_WIDTH / 2.0);
        assert_eq!(paddle.rect().bottom(), WINDOW_HEIGHT - PADDLE_BOTTOM_OFFSET);
        assert!(!paddle.has_weapon());
        assert!(paddle.mounts().is_empty());
    }

    #[test]
    fn test_weapon_upgrade_is_idempotent() {
        let mut paddle = Paddle::default();
        paddle.upgrade_weapon();
        paddle.upgrade_weapon();
        let mounts = paddle.mounts();
        assert_eq!(mounts.len(), 2);
        assert_eq!(mounts[0].left(), paddle.rect().left());
        assert_eq!(mounts[1].right(), paddle.rect().right());
    }

    #[test]
    fn test_mounts_track_paddle() {
        let mut paddle = Paddle::default();
        paddle.upgrade_weapon();
        paddle.move_right();
        paddle.upgrade_size();
        let mounts = paddle.mounts();
        assert_eq!(mounts[0].pos, paddle.pos);
        assert_eq!(mounts[1].right(), paddle.rect().right());
        assert_eq!(mounts[1].top(), paddle.rect().top());

        paddle.center_on(400.0);
        assert_eq!(paddle.mounts()[0].left(), 400.0 - paddle.size.x / 2.0);
    }

    #[test]
    fn test_size_upgrade_widens_by_fixed_step() {
        let mut paddle = Paddle::default();
        paddle.upgrade_size();
        paddle.upgrade_size();
        assert_eq!(paddle.size.x, PADDLE_WIDTH + 2.0 * PADDLE_GROWTH);
    }

    #[test]
    fn test_clamp_to_margins() {
        let mut paddle = Paddle::default();
        paddle.pos.x = LEFT_MARGIN - 25.0;
        paddle.clamp_to(LEFT_MARGIN, RIGHT_MARGIN);
        assert_eq!(paddle.pos.x, LEFT_MARGIN);

        paddle.pos.x = RIGHT_MARGIN;
        paddle.clamp_to(LEFT_MARGIN, RIGHT_MARGIN);
        assert_eq!(paddle.rect().right(), RIGHT_MARGIN);
    }

    #[test]
    fn test_round_never_starts_without_lives() {
        let level = crate::sim::level::builtin_levels().remove(0);
        assert_eq!(RoundState::new(&level, 0).lives, 1);
        assert_eq!(RoundState::new(&level, 4).lives, 4);
    }

    #[test]
    fn test_reload_threshold() {
        let paddle = Paddle::default();
        assert_eq!(paddle.reload_threshold_ms(), 400);
    }

    #[test]
    fn test_anchored_ball_follows_paddle() {
        let mut paddle = Paddle::default();
        let mut ball = Ball::anchored(&paddle);
        assert_eq!(ball.rect().bottom(), paddle.rect().top());

        paddle.center_on(500.0);
        ball.tick(&paddle);
        assert_eq!(ball.rect().center_x(), 500.0);
        assert!(!ball.launched);
    }

    #[test]
    fn test_launched_ball_moves_by_velocity() {
        let paddle = Paddle::default();
        let mut ball = Ball::anchored(&paddle);
        ball.launch();
        let before = ball.pos;
        ball.tick(&paddle);
        assert_eq!(ball.pos, before + ball.vel);
    }

    #[test]
    fn test_paddle_bounce_negates_y_only() {
        let paddle = Paddle::default();
        let mut ball = Ball::anchored(&paddle);
        ball.launched = true;
        ball.vel = Vec2::new(-5.0, 10.0);
        ball.pos.y += 2.0;
        assert!(ball.collide_with_paddle(&paddle));
        assert_eq!(ball.vel, Vec2::new(-5.0, -10.0));

        // Already rising: no second flip
        assert!(!ball.collide_with_paddle(&paddle));
        assert_eq!(ball.vel, Vec2::new(-5.0, -10.0));
    }

    #[test]
    fn test_block_bounce_reports_hit() {
        let block = Block::at_cell(3, 4, BlockKind::Plain2);
        let mut ball = Ball::anchored(&Paddle::default());
        ball.vel = Vec2::new(5.0, -5.0);
        ball.pos = Vec2::new(block.rect().left() + 4.0, block.rect().bottom() - 2.0);
        assert!(ball.collide_with_block(&block));
        assert_eq!(ball.vel, Vec2::new(5.0, 5.0));

        ball.pos.y += 100.0;
        assert!(!ball.collide_with_block(&block));
    }

    #[test]
    fn test_block_cell_positions() {
        let origin = Block::at_cell(0, 0, BlockKind::Plain1);
        assert_eq!(origin.pos, Vec2::new(LEFT_MARGIN, 0.0));
        let block = Block::at_cell(2, 3, BlockKind::Plain1);
        assert_eq!(block.pos.x, LEFT_MARGIN + 3.0 * 49.0);
        assert_eq!(block.pos.y, 2.0 * 19.0);
        assert!(!origin.rect().intersects(&Block::at_cell(0, 1, BlockKind::Plain1).rect()));
    }

    #[test]
    fn test_block_tags_round_trip() {
        for tag in ['1', '2', '3', '4', 'W', 'S'] {
            let kind = BlockKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert_eq!(BlockKind::from_tag('x'), None);
        assert!(BlockKind::WeaponUpgrade.is_power_up());
        assert!(!BlockKind::Plain3.is_power_up());
    }

    #[test]
    fn test_bullet_leaves_play_area() {
        let mut bullet = Bullet::from_mount(&Rect::new(
            Vec2::new(100.0, 20.0),
            Vec2::splat(MOUNT_SIZE),
        ));
        assert_eq!(bullet.rect().bottom(), 20.0);
        assert!(!bullet.is_gone());
        bullet.advance();
        bullet.advance();
        assert!(bullet.is_gone());
    }
}
