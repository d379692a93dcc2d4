//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;


/// Errors emitted while fetching the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by the quiz session state machine.
///
/// None of these are fatal; the controller reports them and keeps the session usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available")]
    NoQuestions,
    #[error("please select an option")]
    NoSelection,
    #[error("question {question} does not exist")]
    QuestionOutOfRange { question: usize },
    #[error("option {option} is not valid for question {question} ({available} options)")]
    InvalidOption {
        question: usize,
        option: usize,
        available: usize,
    },
    #[error("quiz is not in progress")]
    NotInProgress,
    #[error("quiz already finished")]
    Finished,
}
