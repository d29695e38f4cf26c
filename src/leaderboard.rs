//! Score persistence and the leaderboard
//!
//! The game talks to score storage through two narrow traits: `ScoreSink`
//! for submitting a finished run and `LeaderboardSource` for reading the
//! board. `LocalLeaderboard` implements both over a top-10 vec persisted to
//! LocalStorage on wasm32, standing in for the hosted backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of entries the local board keeps
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
    /// Level reached when the run ended
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Acknowledgement of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// The sink recorded the score; rank is 1-indexed when known
    Recorded { rank: Option<usize> },
    /// The sink answers later via `GameSession::complete_submission`
    Pending,
}

/// Why a submission failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Backend or storage unreachable
    Unavailable(String),
    /// The sink refused the submission
    Rejected(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Unavailable(why) => write!(f, "score storage unavailable: {why}"),
            SubmitError::Rejected(why) => write!(f, "score rejected: {why}"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Accepts the final (score, level) of a completed run
pub trait ScoreSink {
    fn submit(&mut self, score: u32, level: u32) -> Result<Ack, SubmitError>;
}

/// Read side of the leaderboard
pub trait LeaderboardSource {
    /// Top `n` entries, best score first
    fn list_top(&self, n: usize) -> Vec<ScoreEntry>;
    /// 1-indexed rank a score would hold: one plus the count of strictly
    /// greater scores. None when the board is empty.
    fn rank_of(&self, score: u32) -> Option<usize>;
}

/// Local leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalLeaderboard {
    pub entries: Vec<ScoreEntry>,
    /// Name stamped on submitted entries
    player: String,
}

impl LocalLeaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyshot_leaderboard";

    /// Create an empty board for the given player
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            player: player.into(),
        }
    }

    /// Check if a score makes the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score if it qualifies, returning the rank achieved
    pub fn add_score(&mut self, score: u32, level: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry {
            username: self.player.clone(),
            score,
            level,
            timestamp,
        };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the board from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(player: impl Into<String>) -> Self {
        let player = player.into();
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(mut board) = serde_json::from_str::<LocalLeaderboard>(&json) {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    board.player = player;
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new(player)
    }

    /// Save the board to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(player: impl Into<String>) -> Self {
        Self::new(player)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl ScoreSink for LocalLeaderboard {
    fn submit(&mut self, score: u32, level: u32) -> Result<Ack, SubmitError> {
        let rank = self.add_score(score, level, now_ms());
        self.save();
        Ok(Ack::Recorded { rank })
    }
}

impl LeaderboardSource for LocalLeaderboard {
    fn list_top(&self, n: usize) -> Vec<ScoreEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    fn rank_of(&self, score: u32) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.iter().filter(|e| e.score > score).count() + 1)
    }
}

/// Current time in Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(scores: &[u32]) -> LocalLeaderboard {
        let mut board = LocalLeaderboard::new("tester");
        for &score in scores {
            board.add_score(score, 1, 0.0);
        }
        board
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let board = LocalLeaderboard::new("tester");
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));
    }

    #[test]
    fn test_entries_stay_sorted_descending() {
        let board = board_with(&[100, 300, 200]);
        let scores: Vec<u32> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn test_board_truncates_to_max() {
        let scores: Vec<u32> = (1..=15).map(|i| i * 10).collect();
        let board = board_with(&scores);
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        // The weakest five fell off
        assert_eq!(board.entries.last().unwrap().score, 60);
        assert_eq!(board.top_score(), Some(150));
    }

    #[test]
    fn test_submit_then_list_top_round_trip() {
        let mut board = LocalLeaderboard::new("tester");
        let ack = board.submit(420, 3).unwrap();
        assert_eq!(ack, Ack::Recorded { rank: Some(1) });

        let top = board.list_top(10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].score, 420);
        assert_eq!(top[0].level, 3);
        assert_eq!(top[0].username, "tester");
    }

    #[test]
    fn test_rank_counts_strictly_greater() {
        let board = board_with(&[300, 200, 100]);
        assert_eq!(board.rank_of(400), Some(1));
        assert_eq!(board.rank_of(250), Some(2));
        assert_eq!(board.rank_of(200), Some(2));
        assert_eq!(board.rank_of(50), Some(4));
    }

    #[test]
    fn test_rank_on_empty_board() {
        let board = LocalLeaderboard::new("tester");
        assert_eq!(board.rank_of(100), None);
    }

    #[test]
    fn test_non_qualifying_submit_still_acks() {
        let scores: Vec<u32> = (1..=10).map(|i| i * 100).collect();
        let mut board = board_with(&scores);
        let ack = board.submit(5, 1).unwrap();
        assert_eq!(ack, Ack::Recorded { rank: None });
        assert_eq!(board.entries.len(), MAX_ENTRIES);
    }
}
