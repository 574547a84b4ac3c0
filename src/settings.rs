//! Game settings and preferences
//!
//! Loaded from an optional JSON file. Physics is fixed (see [`crate::consts`]);
//! only session-level choices live here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;
use crate::sim::level::{LevelError, LevelLayout, builtin_levels};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lives at the start of each round
    pub starting_lives: u8,
    /// Name used for score submission when presentation doesn't ask
    pub player_name: String,
    /// Level files played in order (empty = built-in levels)
    pub level_files: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            player_name: "PLAYER".to_string(),
            level_files: Vec::new(),
        }
    }
}

impl Settings {
    /// Strict parse; zero lives is corrected to one
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if settings.starting_lives == 0 {
            log::warn!("starting_lives must be at least 1, using 1");
            settings.starting_lives = 1;
        }
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Resolve the level sequence these settings ask for
    pub fn levels(&self) -> Result<Vec<LevelLayout>, LevelError> {
        if self.level_files.is_empty() {
            return Ok(builtin_levels());
        }
        self.level_files
            .iter()
            .map(|path| LevelLayout::load(path))
            .collect()
    }
}
