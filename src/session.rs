use serde::{Deserialize, Serialize};

/// A single focus-score sample taken while a session is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSample {
    /// Epoch milliseconds at sampling time
    pub time: u64,
    /// Score in [0, 100]
    pub value: u8,
}

/// A completed focus session. Immutable once appended to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Creation timestamp in epoch milliseconds, doubles as a unique id
    pub id: u64,
    /// Epoch milliseconds when the session started
    pub start_time: u64,
    /// Milliseconds elapsed at stop time; meaningful only once stopped
    pub duration: u64,
    /// Score samples in sampling order; never empty after being stored
    pub focus_scores: Vec<FocusSample>,
    /// Latest/final score, derived from duration
    pub current_score: u8,
}

impl Session {
    /// Open a fresh in-flight session with an empty score history
    pub fn open(id: u64, start_time: u64) -> Self {
        Self {
            id,
            start_time,
            duration: 0,
            focus_scores: Vec::new(),
            current_score: 0,
        }
    }
}
