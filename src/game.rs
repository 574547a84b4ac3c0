//! Session driver
//!
//! Owns the active round, the level sequence and the session leaderboard.
//! Presentation feeds it wall-clock time and input events; two fixed-rate
//! accumulators turn that into simulation ticks and score-decay ticks.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::{ScoreEntry, ScoreTable};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GamePhase, LevelError, LevelLayout, RoundOutcome, RoundState, Snapshot, TickInput,
    builtin_levels, decay_tick, tick,
};

/// Discrete keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Launch,
    MoveLeft,
    MoveRight,
    Fire,
}

/// Input intents collected between ticks
#[derive(Debug, Clone, Default)]
struct Intent {
    move_left: bool,
    move_right: bool,
    fire: bool,
    /// One-shot: cleared once a tick has consumed it
    launch: bool,
    /// One-shot: latest pointer position since the last tick
    pointer_x: Option<f32>,
}

impl Intent {
    /// Sample for the next tick and clear one-shot intents
    fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            pointer_x: self.pointer_x.take(),
            move_left: self.move_left,
            move_right: self.move_right,
            fire: self.fire,
            launch: self.launch,
        };
        self.launch = false;
        input
    }
}

/// A play session
pub struct Game {
    settings: Settings,
    levels: Vec<LevelLayout>,
    level_index: usize,
    round: RoundState,
    intent: Intent,
    sim_accumulator_ms: u32,
    decay_accumulator_ms: u32,
    scores: ScoreTable,
    score_submitted: bool,
}

impl Game {
    /// Create a session over a level sequence (empty = built-in levels)
    pub fn new(settings: Settings, levels: Vec<LevelLayout>) -> Self {
        let levels = if levels.is_empty() {
            builtin_levels()
        } else {
            levels
        };
        let round = RoundState::new(&levels[0], settings.starting_lives);
        Self {
            settings,
            levels,
            level_index: 0,
            round,
            intent: Intent::default(),
            sim_accumulator_ms: 0,
            decay_accumulator_ms: 0,
            scores: ScoreTable::new(),
            score_submitted: false,
        }
    }

    /// Create a session with the levels named in the settings
    pub fn from_settings(settings: Settings) -> Result<Self, LevelError> {
        let levels = settings.levels()?;
        Ok(Self::new(settings, levels))
    }

    pub fn phase(&self) -> GamePhase {
        self.round.phase
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Begin the first round (Idle -> Running)
    pub fn start(&mut self) {
        if self.round.phase == GamePhase::Idle {
            log::info!(
                "Round started on level {} ({} blocks)",
                self.level_index + 1,
                self.round.blocks.len()
            );
            self.round.phase = GamePhase::Running;
        }
    }

    /// Start a new round after the previous one ended
    ///
    /// A won round moves on to the next level (wrapping); a lost round
    /// replays the same one. Returns false if no round has ended.
    pub fn restart(&mut self) -> bool {
        let GamePhase::RoundOver(outcome) = self.round.phase else {
            return false;
        };
        if outcome == RoundOutcome::Won {
            self.level_index = (self.level_index + 1) % self.levels.len();
        }
        self.round = RoundState::new(&self.levels[self.level_index], self.settings.starting_lives);
        self.intent = Intent::default();
        self.sim_accumulator_ms = 0;
        self.decay_accumulator_ms = 0;
        self.score_submitted = false;
        self.start();
        true
    }

    pub fn pointer_moved(&mut self, x: f32) {
        self.intent.pointer_x = Some(x);
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Launch => self.intent.launch = true,
            Key::MoveLeft => self.intent.move_left = true,
            Key::MoveRight => self.intent.move_right = true,
            Key::Fire => self.intent.fire = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Launch => {}
            Key::MoveLeft => self.intent.move_left = false,
            Key::MoveRight => self.intent.move_right = false,
            Key::Fire => self.intent.fire = false,
        }
    }

    /// Feed elapsed wall-clock time; returns the number of simulation ticks run
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.round.is_running() {
            self.sim_accumulator_ms = 0;
            self.decay_accumulator_ms = 0;
            return 0;
        }

        let elapsed_ms = elapsed_ms.min(MAX_FRAME_MS);

        self.sim_accumulator_ms += elapsed_ms;
        let mut substeps = 0;
        while self.sim_accumulator_ms >= SIM_TICK_MS && substeps < MAX_SUBSTEPS {
            let input = self.intent.take_input();
            tick(&mut self.round, &input, SIM_TICK_MS);
            self.sim_accumulator_ms -= SIM_TICK_MS;
            substeps += 1;

            if !self.round.is_running() {
                return substeps;
            }
        }

        self.decay_accumulator_ms += elapsed_ms;
        while self.decay_accumulator_ms >= DECAY_TICK_MS {
            decay_tick(&mut self.round);
            self.decay_accumulator_ms -= DECAY_TICK_MS;
        }

        substeps
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.round)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.round.drain_events()
    }

    /// Record the final score of the ended round (once per round)
    pub fn submit_score(&mut self, name: &str) -> Option<usize> {
        if !matches!(self.round.phase, GamePhase::RoundOver(_)) || self.score_submitted {
            return None;
        }
        self.score_submitted = true;
        self.scores
            .insert_and_resort(ScoreEntry::new(self.round.score, name))
    }

    /// Search the leaderboard for a typed score
    pub fn find_score(&self, query: &str) -> Option<usize> {
        self.scores.lookup(query)
    }
}
