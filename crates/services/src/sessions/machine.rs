use chrono::{DateTime, Utc};
use quiz_core::model::{
    FinishReason, Question, QuestionBank, QuizOutcome, QuizSettings, Score, SessionPhase,
    SessionState,
};

use crate::error::QuizError;

//
// ─── TRANSITION RESULTS ────────────────────────────────────────────────────────
//

/// Result of a successful `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Next(usize),
    /// Advanced past the last question.
    Finished(QuizOutcome),
}

/// Result of a `tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Session not in progress; nothing changed.
    Ignored,
    /// One second elapsed; this many remain.
    Running(u32),
    /// Countdown reached zero and the session finished.
    Expired(QuizOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz attempt.
///
/// Pure with respect to I/O: persistence, rendering and timers are driven by
/// `QuizController` based on the values returned here.
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: QuestionBank,
    state: SessionState,
    phase: SessionPhase,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    /// Fresh session at the first question with the configured time limit.
    #[must_use]
    pub fn new(bank: QuestionBank, settings: &QuizSettings) -> Self {
        Self::restore(bank, SessionState::new(settings.time_limit_secs()))
    }

    /// Session resuming from previously persisted state.
    #[must_use]
    pub fn restore(bank: QuestionBank, state: SessionState) -> Self {
        Self {
            bank,
            state,
            phase: SessionPhase::NotStarted,
            outcome: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_question_index()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.current_index())
    }

    #[must_use]
    pub fn selected_for(&self, question: usize) -> Option<usize> {
        self.state.answers().selected(question)
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.state.time_left_seconds()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Enter `InProgress` from `NotStarted` or `Suspended`.
    ///
    /// Returns `false` if the session was already in progress.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` once the session has ended.
    pub fn start(&mut self) -> Result<bool, QuizError> {
        match self.phase {
            SessionPhase::Finished => Err(QuizError::Finished),
            SessionPhase::InProgress => Ok(false),
            SessionPhase::NotStarted | SessionPhase::Suspended => {
                self.phase = SessionPhase::InProgress;
                Ok(true)
            }
        }
    }

    /// Leave `InProgress` without touching state. Returns whether anything changed.
    pub fn suspend(&mut self) -> bool {
        if self.phase == SessionPhase::InProgress {
            self.phase = SessionPhase::Suspended;
            true
        } else {
            false
        }
    }

    /// Record `option` for `question`, overwriting a prior selection.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInProgress` unless the quiz is running, and
    /// `QuestionOutOfRange` / `InvalidOption` for bad indices.
    pub fn select_option(
        &mut self,
        question: usize,
        option: usize,
    ) -> Result<Option<usize>, QuizError> {
        self.ensure_in_progress()?;
        let available = self
            .bank
            .get(question)
            .ok_or(QuizError::QuestionOutOfRange { question })?
            .option_count();
        if option >= available {
            return Err(QuizError::InvalidOption {
                question,
                option,
                available,
            });
        }
        Ok(self.state.record_answer(question, option))
    }

    /// Move past the current question, finishing after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` if the current question has no
    /// selection, leaving the state unchanged.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, QuizError> {
        self.ensure_in_progress()?;
        if !self.state.answers().is_answered(self.current_index()) {
            return Err(QuizError::NoSelection);
        }

        let next = self.state.advance_index(self.bank.len());
        if next >= self.bank.len() {
            Ok(Advance::Finished(self.finish(FinishReason::Completed, now)))
        } else {
            Ok(Advance::Next(next))
        }
    }

    /// Consume one second of the countdown.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        if self.phase != SessionPhase::InProgress {
            return Tick::Ignored;
        }
        let left = self.state.decrement_time();
        if left == 0 {
            Tick::Expired(self.finish(FinishReason::Expired, now))
        } else {
            Tick::Running(left)
        }
    }

    /// Transition to `Finished`. Later calls return the first outcome unchanged.
    pub fn finish(&mut self, reason: FinishReason, now: DateTime<Utc>) -> QuizOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        self.state.mark_finished(self.bank.len());
        self.phase = SessionPhase::Finished;
        let outcome = QuizOutcome {
            score: self.compute_score(),
            reason,
            finished_at: now,
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    #[must_use]
    pub fn compute_score(&self) -> Score {
        self.bank.compute_score(self.state.answers())
    }

    fn ensure_in_progress(&self) -> Result<(), QuizError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::Finished => Err(QuizError::Finished),
            SessionPhase::NotStarted | SessionPhase::Suspended => Err(QuizError::NotInProgress),
        }
    }
}
