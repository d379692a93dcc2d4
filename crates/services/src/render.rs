//! Render contract between the controller and a presentation layer.

use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::model::{Question, Score};

/// Everything needed to draw one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl QuestionView {
    #[must_use]
    pub fn new(index: usize, total: usize, question: &Question, selected: Option<usize>) -> Self {
        Self {
            index,
            total,
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            selected,
        }
    }
}

/// One-off messages shown to the test-taker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SelectionRequired,
    TimeUp,
    QuizCompleted,
}

impl Notice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Notice::SelectionRequired => "Please select an option.",
            Notice::TimeUp => "Time is up!",
            Notice::QuizCompleted => "Quiz completed!",
        }
    }
}

/// Presentation layer. Implementations draw what they are told and hold no
/// quiz state of their own.
pub trait Presenter: Send + Sync {
    fn show_question(&mut self, view: &QuestionView);
    fn show_finished(&mut self, score: Score);
    fn show_fullscreen_prompt(&mut self, visible: bool);
    fn show_time_left(&mut self, text: &str);
    fn notify(&mut self, notice: Notice);
}

/// A single call made on a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Question(QuestionView),
    Finished(Score),
    FullscreenPrompt(bool),
    TimeLeft(String),
    Notice(Notice),
}

/// Presenter that records every call, for testing and prototyping.
///
/// Clones share the same log, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn last_question(&self) -> Option<QuestionView> {
        self.events().into_iter().rev().find_map(|event| match event {
            RenderEvent::Question(view) => Some(view),
            _ => None,
        })
    }

    #[must_use]
    pub fn last_time_left(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            RenderEvent::TimeLeft(text) => Some(text),
            _ => None,
        })
    }

    #[must_use]
    pub fn finished_screens(&self) -> Vec<Score> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Finished(score) => Some(score),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: RenderEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn show_question(&mut self, view: &QuestionView) {
        self.push(RenderEvent::Question(view.clone()));
    }

    fn show_finished(&mut self, score: Score) {
        self.push(RenderEvent::Finished(score));
    }

    fn show_fullscreen_prompt(&mut self, visible: bool) {
        self.push(RenderEvent::FullscreenPrompt(visible));
    }

    fn show_time_left(&mut self, text: &str) {
        self.push(RenderEvent::TimeLeft(text.to_owned()));
    }

    fn notify(&mut self, notice: Notice) {
        self.push(RenderEvent::Notice(notice));
    }
}
