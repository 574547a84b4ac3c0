//! High score leaderboard
//!
//! Bounded in-memory table of the best scores of the current session, kept
//! in descending score order after every mutation. Nothing is written to disk.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 80;

/// Longest name kept for an entry (characters)
pub const MAX_NAME_CHARS: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    pub name: String,
}

impl ScoreEntry {
    /// Create an entry, trimming and truncating the name
    pub fn new(score: u64, name: &str) -> Self {
        let name: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
        let name = if name.is_empty() { "???".to_string() } else { name };
        Self { score, name }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_HIGH_SCORES),
        }
    }

    /// Entries, best first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a score would make it onto the table
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Full: must beat the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Position a score would take (0-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()))
    }

    /// Put an entry in the last slot, then restore descending order
    ///
    /// While the table has free capacity the entry takes a new slot; once
    /// full it overwrites the lowest-ranked one. Returns the entry's final
    /// position, or None if the score does not beat the lowest entry.
    pub fn insert_and_resort(&mut self, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            log::debug!("Score {} does not qualify", entry.score);
            return None;
        }

        let slot = if self.entries.len() < MAX_HIGH_SCORES {
            self.entries.push(entry);
            self.entries.len() - 1
        } else {
            let last = self.entries.len() - 1;
            self.entries[last] = entry;
            last
        };

        // Stable: ties keep earlier submissions ahead; the new entry was last,
        // so it ends up behind any equal score
        let score = self.entries[slot].score;
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        debug_assert!(self.entries.len() <= MAX_HIGH_SCORES);

        let pos = self.entries.iter().rposition(|e| e.score == score);
        if let Some(pos) = pos {
            log::info!("High score {} entered at position {}", score, pos + 1);
        }
        pos
    }

    /// Position of some entry with exactly `score`
    pub fn find(&self, score: u64) -> Option<usize> {
        // Descending order: an entry "comes before" the target when it is larger
        self.entries
            .binary_search_by(|e| score.cmp(&e.score))
            .ok()
    }

    /// Look up a score typed by the user; unparseable input is simply not found
    pub fn lookup(&self, query: &str) -> Option<usize> {
        query.trim().parse::<u64>().ok().and_then(|s| self.find(s))
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Export for display
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_descending(table: &ScoreTable) -> bool {
        table.entries().windows(2).all(|w| w[0].score >= w[1].score)
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut table = ScoreTable::new();
        assert_eq!(table.insert_and_resort(ScoreEntry::new(100, "ann")), Some(0));
        assert_eq!(table.insert_and_resort(ScoreEntry::new(300, "bob")), Some(0));
        assert_eq!(table.insert_and_resort(ScoreEntry::new(200, "cy")), Some(1));
        let scores: Vec<u64> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(table.top_score(), Some(300));
    }

    #[test]
    fn test_full_table_overwrites_lowest() {
        let mut table = ScoreTable::new();
        for i in 0..MAX_HIGH_SCORES as u64 {
            table.insert_and_resort(ScoreEntry::new((i + 1) * 10, "p"));
        }
        assert_eq!(table.len(), MAX_HIGH_SCORES);
        assert!(!table.qualifies(10));
        assert_eq!(table.insert_and_resort(ScoreEntry::new(5, "low")), None);

        assert_eq!(table.insert_and_resort(ScoreEntry::new(15, "mid")), Some(MAX_HIGH_SCORES - 1));
        assert_eq!(table.len(), MAX_HIGH_SCORES);
        assert_eq!(table.find(10), None);
        assert!(is_descending(&table));
    }

    #[test]
    fn test_find_and_lookup() {
        let mut table = ScoreTable::new();
        for s in [50, 400, 120, 120, 9000] {
            table.insert_and_resort(ScoreEntry::new(s, "x"));
        }
        assert_eq!(table.find(9000), Some(0));
        assert_eq!(table.find(50), Some(4));
        let pos = table.find(120).unwrap();
        assert_eq!(table.entries()[pos].score, 120);
        assert_eq!(table.find(121), None);

        assert_eq!(table.lookup(" 400 "), Some(1));
        assert_eq!(table.lookup("four hundred"), None);
        assert_eq!(table.lookup("-3"), None);
        assert_eq!(table.lookup(""), None);
    }

    #[test]
    fn test_potential_rank() {
        let mut table = ScoreTable::new();
        assert_eq!(table.potential_rank(10), Some(0));
        table.insert_and_resort(ScoreEntry::new(100, "a"));
        table.insert_and_resort(ScoreEntry::new(50, "b"));
        assert_eq!(table.potential_rank(75), Some(1));
        assert_eq!(table.potential_rank(10), Some(2));
    }

    #[test]
    fn test_entry_name_is_trimmed_and_truncated() {
        assert_eq!(ScoreEntry::new(1, "  alexander the great ").name, "alexander ");
        assert_eq!(ScoreEntry::new(1, "   ").name, "???");
    }

    #[test]
    fn test_json_export() {
        let mut table = ScoreTable::new();
        table.insert_and_resort(ScoreEntry::new(250, "zed"));
        let json = table.to_json().unwrap();
        let back: Vec<ScoreEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table.entries());
    }

    proptest! {
        #[test]
        fn table_stays_sorted(scores in proptest::collection::vec(0u64..500, 0..200)) {
            let mut table = ScoreTable::new();
            for s in &scores {
                table.insert_and_resort(ScoreEntry::new(*s, "p"));
                prop_assert!(is_descending(&table));
                prop_assert!(table.len() <= MAX_HIGH_SCORES);
            }
        }

        #[test]
        fn find_misses_iff_absent(
            scores in proptest::collection::vec(0u64..100, 0..120),
            wanted in 0u64..100,
        ) {
            let mut table = ScoreTable::new();
            for s in &scores {
                table.insert_and_resort(ScoreEntry::new(*s, "p"));
            }
            let present = table.entries().iter().any(|e| e.score == wanted);
            match table.find(wanted) {
                Some(pos) => prop_assert_eq!(table.entries()[pos].score, wanted),
                None => prop_assert!(!present),
            }
        }
    }
}
