//! Level layouts
//!
//! A level is a fixed 17×17 grid of single-character tags. Blank cells are a
//! space or a dot; every other character must name a [`BlockKind`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{Block, BlockKind};
use crate::consts::{GRID_COLS, GRID_ROWS};

/// Errors raised while loading a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has {found} rows, expected {}", GRID_ROWS)]
    RowCount { found: usize },
    #[error("row {row} has {found} cells, expected {}", GRID_COLS)]
    RowWidth { row: usize, found: usize },
    #[error("unknown block tag {tag:?} at row {row}, column {col}")]
    UnknownTag { row: usize, col: usize, tag: char },
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed level grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    cells: Vec<Vec<Option<BlockKind>>>,
}

impl LevelLayout {
    /// Parse a level from text, one grid row per line
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        // An all-space row is a valid blank row, so only truly empty lines are skipped
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    /// Build a level from explicit rows
    pub fn from_rows(rows: &[&str]) -> Result<Self, LevelError> {
        if rows.len() != GRID_ROWS {
            return Err(LevelError::RowCount { found: rows.len() });
        }

        let mut cells = Vec::with_capacity(GRID_ROWS);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != GRID_COLS {
                return Err(LevelError::RowWidth { row, found });
            }
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, tag)| match tag {
                    ' ' | '.' => Ok(None),
                    _ => BlockKind::from_tag(tag)
                        .map(Some)
                        .ok_or(LevelError::UnknownTag { row, col, tag }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(parsed);
        }

        Ok(Self { cells })
    }

    /// Load a level file from disk
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path)?;
        let level = Self::parse(&text)?;
        log::info!(
            "Loaded level {} ({} blocks)",
            path.display(),
            level.block_count()
        );
        Ok(level)
    }

    /// Kind at a grid cell (None when blank or out of range)
    pub fn cell(&self, row: usize, col: usize) -> Option<BlockKind> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn block_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Instantiate the block set, ordered row by row
    pub fn spawn_blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.block_count());
        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if let Some(kind) = cell {
                    blocks.push(Block::at_cell(row, col, *kind));
                }
            }
        }
        blocks
    }
}

/// Opening level: a chalice of plain blocks with a power-up in each arm
const CHALICE: [&str; GRID_ROWS] = [
    "11.............11",
    "1...4444W4444...1",
    ".....3333333.....",
    "......33S33......",
    ".......222.......",
    ".......222.......",
    "........2........",
    "........2........",
    ".......111.......",
    "......11111......",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    "1...............1",
    "11.............11",
];

/// Second level: only the corners remain
const CORNERS: [&str; GRID_ROWS] = [
    "4W.............S4",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    ".................",
    "33.............33",
];

/// Levels shipped with the game, in play order
pub fn builtin_levels() -> Vec<LevelLayout> {
    [&CHALICE[..], &CORNERS[..]]
        .into_iter()
        .filter_map(|rows| match LevelLayout::from_rows(rows) {
            Ok(level) => Some(level),
            Err(e) => {
                log::error!("Built-in level rejected: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rows() -> Vec<String> {
        vec![".".repeat(GRID_COLS); GRID_ROWS]
    }

    fn parse_rows(rows: &[String]) -> Result<LevelLayout, LevelError> {
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        LevelLayout::from_rows(&refs)
    }

    #[test]
    fn test_builtin_levels_parse() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 2);
        assert!(levels.iter().all(|l| l.block_count() > 0));
        assert_eq!(levels[0].cell(1, 8), Some(BlockKind::WeaponUpgrade));
        assert_eq!(levels[0].cell(3, 8), Some(BlockKind::SizeUpgrade));
        assert_eq!(levels[1].block_count(), 8);
    }

    #[test]
    fn test_spaces_and_dots_are_blank() {
        let mut rows = blank_rows();
        rows[0] = format!("1{}2", " ".repeat(GRID_COLS - 2));
        let level = parse_rows(&rows).unwrap();
        assert_eq!(level.block_count(), 2);
        assert_eq!(level.cell(0, 0), Some(BlockKind::Plain1));
        assert_eq!(level.cell(0, 1), None);
        assert_eq!(level.cell(0, GRID_COLS - 1), Some(BlockKind::Plain2));
        assert_eq!(level.cell(99, 0), None);
    }

    #[test]
    fn test_wrong_row_count_fails() {
        let rows = vec![".".repeat(GRID_COLS); GRID_ROWS - 1];
        let err = parse_rows(&rows).unwrap_err();
        assert!(matches!(err, LevelError::RowCount { found } if found == GRID_ROWS - 1));
    }

    #[test]
    fn test_wrong_row_width_fails() {
        let mut rows = blank_rows();
        rows[5] = ".".repeat(GRID_COLS + 1);
        let err = parse_rows(&rows).unwrap_err();
        assert!(matches!(err, LevelError::RowWidth { row: 5, .. }));
    }

    #[test]
    fn test_unknown_tag_fails() {
        let mut rows = blank_rows();
        rows[2] = format!("..Z{}", ".".repeat(GRID_COLS - 3));
        let err = parse_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            LevelError::UnknownTag {
                row: 2,
                col: 2,
                tag: 'Z'
            }
        ));
    }

    #[test]
    fn test_parse_skips_empty_lines() {
        let text = format!("\n{}\n", blank_rows().join("\n"));
        let level = LevelLayout::parse(&text).unwrap();
        assert_eq!(level.block_count(), 0);
    }

    #[test]
    fn test_spawned_blocks_are_unique_cells() {
        let level = &builtin_levels()[0];
        let blocks = level.spawn_blocks();
        assert_eq!(blocks.len(), level.block_count());
        for (i, a) in blocks.iter().enumerate() {
            for b in &blocks[i + 1..] {
                assert_ne!((a.row, a.col), (b.row, b.col));
                assert!(!a.rect().intersects(&b.rect()));
            }
        }
    }

    #[test]
    fn test_load_level_file() {
        let mut rows = blank_rows();
        rows[4] = format!("W{}S", ".".repeat(GRID_COLS - 2));
        let path = std::env::temp_dir().join(format!("brickfall_level_{}.txt", std::process::id()));
        std::fs::write(&path, rows.join("\n")).unwrap();
        let level = LevelLayout::load(&path);
        std::fs::remove_file(&path).unwrap();

        let level = level.unwrap();
        assert_eq!(level.block_count(), 2);
        assert_eq!(level.cell(4, 0), Some(BlockKind::WeaponUpgrade));
        assert_eq!(level.cell(4, GRID_COLS - 1), Some(BlockKind::SizeUpgrade));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LevelLayout::load(Path::new("/nonexistent/level.txt")).unwrap_err();
        assert!(matches!(err, LevelError::Io(_)));
    }
}
