use std::ops::ControlFlow;

use quiz_core::model::{
    FinishReason, QuestionBank, QuestionRecord, QuizOutcome, QuizSettings, Score, SessionPhase,
};
use quiz_core::time::format_time_left;
use quiz_core::Clock;
use storage::SnapshotStore;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use super::machine::{Advance, QuizSession, Tick};
use crate::error::QuizError;
use crate::events::QuizEvent;
use crate::gate::{FullscreenGate, GateChange};
use crate::render::{Notice, Presenter, QuestionView};
use crate::source::QuestionSource;
use crate::timer::{TimerDriver, TimerHandle};

/// Owns the single quiz session and drives it from events.
///
/// Every mutating transition writes a snapshot; every exit from
/// `InProgress` cancels the running tick sequence.
pub struct QuizController {
    settings: QuizSettings,
    clock: Clock,
    snapshots: SnapshotStore,
    presenter: Box<dyn Presenter>,
    driver: TimerDriver,
    timer: Option<TimerHandle>,
    generation: u64,
    gate: FullscreenGate,
    session: Option<QuizSession>,
}

impl QuizController {
    #[must_use]
    pub fn new(
        settings: QuizSettings,
        clock: Clock,
        snapshots: SnapshotStore,
        presenter: Box<dyn Presenter>,
        events: UnboundedSender<QuizEvent>,
    ) -> Self {
        let driver = TimerDriver::new(settings.tick_interval(), events);
        Self {
            settings,
            clock,
            snapshots,
            presenter,
            driver,
            timer: None,
            generation: 0,
            gate: FullscreenGate::new(),
            session: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::NotStarted, QuizSession::phase)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.session.as_ref().and_then(QuizSession::outcome)
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Current score, if questions are loaded.
    #[must_use]
    pub fn compute_score(&self) -> Option<Score> {
        self.session.as_ref().map(QuizSession::compute_score)
    }

    /// Fetch questions from `source` and initialize. Failures are logged and
    /// leave the controller in `NotStarted`.
    pub async fn load(&mut self, source: &dyn QuestionSource) -> bool {
        match source.load().await {
            Ok(records) => {
                log::info!("loaded {} questions from {}", records.len(), source.describe());
                self.initialize(records).await
            }
            Err(err) => {
                log::error!("error loading questions from {}: {err}", source.describe());
                false
            }
        }
    }

    /// Validate the question records and restore any prior snapshot.
    ///
    /// Starts right away if fullscreen was granted before the questions
    /// arrived. Returns `false` (and does nothing else) when there are no
    /// usable questions.
    pub async fn initialize(&mut self, records: Vec<QuestionRecord>) -> bool {
        let bank = match QuestionBank::from_records(records) {
            Ok(bank) => bank,
            Err(err) => {
                log::error!("cannot initialize quiz: {err}");
                return false;
            }
        };

        let session = match self.snapshots.load(&bank).await {
            Some(state) => QuizSession::restore(bank, state),
            None => QuizSession::new(bank, &self.settings),
        };
        self.cancel_timer();
        self.session = Some(session);
        if self.gate.is_open() {
            self.start().await;
        }
        true
    }

    /// Show the current question and start the countdown.
    pub async fn start(&mut self) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("no questions available to start the quiz");
            return;
        };

        match session.start() {
            Ok(false) => {
                log::debug!("start ignored; quiz already in progress");
                return;
            }
            Ok(true) => {}
            Err(QuizError::Finished) => {
                let score = session.compute_score();
                self.presenter.show_fullscreen_prompt(false);
                self.presenter.show_finished(score);
                return;
            }
            Err(err) => {
                log::warn!("cannot start quiz: {err}");
                return;
            }
        }

        log::info!(
            "quiz started at question {} with {}s left",
            session.current_index(),
            session.time_left()
        );
        self.presenter.show_fullscreen_prompt(false);
        self.render_current();
        self.render_time_left();
        self.start_timer();
        self.persist().await;
    }

    /// React to the fullscreen signal.
    pub async fn on_fullscreen_change(&mut self, is_fullscreen: bool) {
        match self.gate.observe(is_fullscreen) {
            GateChange::Unchanged => {}
            GateChange::Entered => {
                log::info!("entered fullscreen mode");
                if self.session.is_some() {
                    self.start().await;
                } else {
                    log::warn!("no questions loaded yet");
                }
            }
            GateChange::Exited => {
                log::info!("exited fullscreen mode");
                self.cancel_timer();
                if let Some(session) = self.session.as_mut() {
                    session.suspend();
                }
                self.presenter.show_fullscreen_prompt(true);
            }
        }
    }

    /// Select `option` for the question currently displayed.
    ///
    /// # Errors
    ///
    /// See [`QuizController::select_option_for`].
    pub async fn select_option(&mut self, option: usize) -> Result<(), QuizError> {
        let question = self
            .session
            .as_ref()
            .ok_or(QuizError::NoQuestions)?
            .current_index();
        self.select_option_for(question, option).await
    }

    /// Record `option` for `question` and persist.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when no quiz is running or the indices are invalid.
    /// The state is left untouched in that case.
    pub async fn select_option_for(
        &mut self,
        question: usize,
        option: usize,
    ) -> Result<(), QuizError> {
        let session = self.session.as_mut().ok_or(QuizError::NoQuestions)?;
        if let Err(err) = session.select_option(question, option) {
            log::warn!("selection rejected: {err}");
            return Err(err);
        }
        log::debug!("selected option {option} for question {question}");

        if question == session.current_index() {
            self.render_current();
        }
        self.persist().await;
        Ok(())
    }

    /// Move to the next question, or finish after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` (after telling the user) when the
    /// current question is unanswered.
    pub async fn advance(&mut self) -> Result<(), QuizError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(QuizError::NoQuestions)?;
        match session.advance(now) {
            Ok(Advance::Next(index)) => {
                log::debug!("advanced to question {index}");
                self.render_current();
                self.persist().await;
                Ok(())
            }
            Ok(Advance::Finished(outcome)) => {
                self.conclude(&outcome).await;
                Ok(())
            }
            Err(QuizError::NoSelection) => {
                self.presenter.notify(Notice::SelectionRequired);
                Err(QuizError::NoSelection)
            }
            Err(err) => {
                log::warn!("advance rejected: {err}");
                Err(err)
            }
        }
    }

    /// Consume one second of the countdown. A no-op unless in progress.
    pub async fn tick(&mut self) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.tick(now) {
            Tick::Ignored => log::debug!("tick ignored in phase {:?}", session.phase()),
            Tick::Running(_) => {
                self.render_time_left();
                self.persist().await;
            }
            Tick::Expired(outcome) => {
                self.render_time_left();
                self.conclude(&outcome).await;
            }
        }
    }

    /// Force the session to `Finished`. Safe to call repeatedly.
    pub async fn finish(&mut self, reason: FinishReason) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_finished() {
            return;
        }
        let outcome = session.finish(reason, now);
        self.conclude(&outcome).await;
    }

    /// Apply one event. Breaks on `Shutdown`.
    pub async fn handle(&mut self, event: QuizEvent) -> ControlFlow<()> {
        match event {
            QuizEvent::Tick { generation } => {
                if self.timer.as_ref().map(TimerHandle::generation) == Some(generation) {
                    self.tick().await;
                } else {
                    log::debug!("dropping stale tick from timer {generation}");
                }
            }
            QuizEvent::Fullscreen(is_fullscreen) => {
                self.on_fullscreen_change(is_fullscreen).await;
            }
            QuizEvent::Select(option) => {
                let _ = self.select_option(option).await;
            }
            QuizEvent::SelectFor { question, option } => {
                let _ = self.select_option_for(question, option).await;
            }
            QuizEvent::Advance => {
                let _ = self.advance().await;
            }
            QuizEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Process events until `Shutdown` or until every sender is gone.
    pub async fn run(&mut self, mut events: UnboundedReceiver<QuizEvent>) {
        while let Some(event) = events.recv().await {
            if self.handle(event).await.is_break() {
                break;
            }
        }
        self.shutdown().await;
    }

    /// Stop the countdown, keeping the snapshot for the next launch.
    pub async fn shutdown(&mut self) {
        self.cancel_timer();
        if self.phase().is_active() {
            self.persist().await;
        }
        log::info!("quiz controller stopped");
    }

    async fn conclude(&mut self, outcome: &QuizOutcome) {
        self.cancel_timer();
        let notice = match outcome.reason {
            FinishReason::Completed => Notice::QuizCompleted,
            FinishReason::Expired => Notice::TimeUp,
        };
        self.presenter.notify(notice);
        self.presenter.show_finished(outcome.score);
        self.snapshots.clear().await;
        log::info!(
            "quiz finished ({:?}); score {}",
            outcome.reason,
            outcome.score
        );
    }

    fn start_timer(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        self.timer = Some(self.driver.start(self.generation));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn render_current(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let index = session.current_index();
        if let Some(question) = session.current_question() {
            let view = QuestionView::new(
                index,
                session.question_count(),
                question,
                session.selected_for(index),
            );
            self.presenter.show_question(&view);
        }
    }

    fn render_time_left(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.presenter
                .show_time_left(&format_time_left(session.time_left()));
        }
    }

    async fn persist(&self) {
        if let Some(session) = self.session.as_ref() {
            self.snapshots
                .persist(session.state(), session.question_count())
                .await;
        }
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingPresenter, RenderEvent};
    use quiz_core::time::fixed_clock;
    use std::sync::Arc;
    use storage::{InMemoryStore, KeyValueStore};
    use tokio::sync::mpsc;

    fn records() -> Vec<QuestionRecord> {
        ["B", "A", "C"]
            .iter()
            .enumerate()
            .map(|(i, answer)| QuestionRecord {
                question: format!("Question {i}"),
                options: vec!["A".into(), "B".into(), "C".into()],
                answer: (*answer).into(),
            })
            .collect()
    }

    fn controller(
        kv: &InMemoryStore,
        time_limit: u32,
    ) -> (QuizController, RecordingPresenter, UnboundedReceiver<QuizEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let presenter = RecordingPresenter::new();
        let settings = QuizSettings::default().with_time_limit(time_limit).unwrap();
        let snapshots = SnapshotStore::new(Arc::new(kv.clone()), settings.storage_key());
        let controller = QuizController::new(
            settings,
            fixed_clock(),
            snapshots,
            Box::new(presenter.clone()),
            tx,
        );
        (controller, presenter, rx)
    }

    #[tokio::test]
    async fn empty_bank_leaves_quiz_not_started() {
        let kv = InMemoryStore::new();
        let (mut quiz, presenter, _rx) = controller(&kv, 600);

        assert!(!quiz.initialize(Vec::new()).await);
        quiz.start().await;
        assert_eq!(quiz.phase(), SessionPhase::NotStarted);
        assert!(!quiz.timer_running());
        assert!(presenter.events().is_empty());
    }

    #[tokio::test]
    async fn start_renders_question_and_time() {
        let kv = InMemoryStore::new();
        let (mut quiz, presenter, _rx) = controller(&kv, 600);
        quiz.initialize(records()).await;
        quiz.start().await;

        assert_eq!(quiz.phase(), SessionPhase::InProgress);
        assert!(quiz.timer_running());
        let view = presenter.last_question().unwrap();
        assert_eq!(view.index, 0);
        assert_eq!(view.selected, None);
        assert_eq!(presenter.last_time_left().as_deref(), Some("Time left: 10:00"));
        assert!(kv.get("quizState").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn fullscreen_before_load_starts_once_questions_arrive() {
        let kv = InMemoryStore::new();
        let (mut quiz, presenter, _rx) = controller(&kv, 600);

        quiz.on_fullscreen_change(true).await;
        assert_eq!(quiz.phase(), SessionPhase::NotStarted);

        assert!(quiz.initialize(records()).await);
        assert_eq!(quiz.phase(), SessionPhase::InProgress);
        assert!(quiz.timer_running());
        assert_eq!(presenter.last_question().unwrap().index, 0);

        quiz.on_fullscreen_change(true).await;
        assert_eq!(quiz.phase(), SessionPhase::InProgress);
    }

    #[tokio::test]
    async fn stale_ticks_are_dropped() {
        let kv = InMemoryStore::new();
        let (mut quiz, _presenter, _rx) = controller(&kv, 600);
        quiz.initialize(records()).await;
        quiz.start().await;

        let _ = quiz.handle(QuizEvent::Tick { generation: 99 }).await;
        assert_eq!(quiz.session().unwrap().time_left(), 600);

        let _ = quiz.handle(QuizEvent::Tick { generation: 1 }).await;
        assert_eq!(quiz.session().unwrap().time_left(), 599);
    }

    #[tokio::test]
    async fn advance_without_selection_notifies() {
        let kv = InMemoryStore::new();
        let (mut quiz, presenter, _rx) = controller(&kv, 600);
        quiz.initialize(records()).await;
        quiz.start().await;

        assert_eq!(quiz.advance().await, Err(QuizError::NoSelection));
        assert_eq!(presenter.notices(), vec![Notice::SelectionRequired]);
        assert_eq!(quiz.session().unwrap().current_index(), 0);
    }

    #[tokio::test]
    async fn fullscreen_exit_suspends_and_shows_prompt() {
        let kv = InMemoryStore::new();
        let (mut quiz, presenter, _rx) = controller(&kv, 600);
        quiz.initialize(records()).await;
        quiz.on_fullscreen_change(true).await;
        assert!(quiz.timer_running());

        quiz.on_fullscreen_change(false).await;
        assert_eq!(quiz.phase(), SessionPhase::Suspended);
        assert!(!quiz.timer_running());
        assert_eq!(
            presenter.events().last(),
            Some(&RenderEvent::FullscreenPrompt(true))
        );

        quiz.tick().await;
        assert_eq!(quiz.session().unwrap().time_left(), 600);
    }

    #[tokio::test]
    async fn shutdown_event_breaks_and_keeps_snapshot() {
        let kv = InMemoryStore::new();
        let (mut quiz, _presenter, _rx) = controller(&kv, 600);
        quiz.initialize(records()).await;
        quiz.start().await;

        assert!(quiz.handle(QuizEvent::Shutdown).await.is_break());
        quiz.shutdown().await;
        assert!(!quiz.timer_running());
        assert!(kv.get("quizState").await.unwrap().is_some());
    }
}
