use crate::model::AnswerRecord;

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Questions may be loaded but the quiz has not been shown yet.
    NotStarted,
    /// Quiz visible and countdown running.
    InProgress,
    /// Quiz hidden behind the fullscreen prompt; countdown stopped.
    Suspended,
    /// Terminal. Either all questions were answered or time ran out.
    Finished,
}

impl SessionPhase {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::InProgress | Self::Suspended)
    }
}

/// Position, remaining time and answers of a session.
///
/// `current_question_index` equal to the question count denotes a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current_question_index: usize,
    time_left_seconds: u32,
    answers: AnswerRecord,
}

impl SessionState {
    /// Fresh state at the first question with the full time limit.
    #[must_use]
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            current_question_index: 0,
            time_left_seconds: time_limit_secs,
            answers: AnswerRecord::new(),
        }
    }

    /// Rehydrate state from persisted parts. Bounds are checked by the caller.
    #[must_use]
    pub fn from_parts(
        current_question_index: usize,
        time_left_seconds: u32,
        answers: AnswerRecord,
    ) -> Self {
        Self {
            current_question_index,
            time_left_seconds,
            answers,
        }
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    #[must_use]
    pub fn time_left_seconds(&self) -> u32 {
        self.time_left_seconds
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn record_answer(&mut self, question: usize, option: usize) -> Option<usize> {
        self.answers.select(question, option)
    }

    /// Move to the next question without going past `question_count`.
    pub fn advance_index(&mut self, question_count: usize) -> usize {
        if self.current_question_index < question_count {
            self.current_question_index += 1;
        }
        self.current_question_index
    }

    /// Jump to the end-of-quiz position.
    pub fn mark_finished(&mut self, question_count: usize) {
        self.current_question_index = question_count;
    }

    /// Decrement the countdown by one second, saturating at zero.
    pub fn decrement_time(&mut self) -> u32 {
        self.time_left_seconds = self.time_left_seconds.saturating_sub(1);
        self.time_left_seconds
    }
}
