use chrono::{DateTime, Utc};
use std::fmt;

/// Number of correct answers out of the bank size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {}", self.correct, self.total)
    }
}

/// Why a session reached `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The last question was answered and advanced past.
    Completed,
    /// The countdown reached zero.
    Expired,
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: Score,
    pub reason: FinishReason,
    pub finished_at: DateTime<Utc>,
}
