use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("answer {answer:?} does not match any option")]
    AnswerNotInOptions { answer: String },

    #[error("answer {answer:?} matches {matches} options")]
    AmbiguousAnswer { answer: String, matches: usize },
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Raw question shape as delivered by a question source.
///
/// This is the unvalidated wire form; convert it with [`Question::from_record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// The correct answer is stored by value and always matches exactly one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    answer: String,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, there are no options,
    /// or the answer does not match exactly one option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let matches = options.iter().filter(|option| **option == answer).count();
        match matches {
            0 => return Err(QuestionError::AnswerNotInOptions { answer }),
            1 => {}
            _ => return Err(QuestionError::AmbiguousAnswer { answer, matches }),
        }

        Ok(Self {
            prompt,
            options,
            answer,
        })
    }

    /// Validate a raw record into a `Question`.
    ///
    /// # Errors
    ///
    /// See [`Question::new`].
    pub fn from_record(record: QuestionRecord) -> Result<Self, QuestionError> {
        Self::new(record.question, record.options, record.answer)
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Returns true when the option at `index` carries the answer value.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        self.option(index) == Some(self.answer.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    #[test]
    fn accepts_answer_matching_one_option() {
        let q = Question::new("Pick B", abc(), "B").unwrap();
        assert_eq!(q.option_count(), 3);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert!(!q.is_correct(9));
    }

    #[test]
    fn rejects_missing_answer() {
        let err = Question::new("Pick D", abc(), "D").unwrap_err();
        assert_eq!(
            err,
            QuestionError::AnswerNotInOptions {
                answer: "D".into()
            }
        );
    }

    #[test]
    fn rejects_duplicate_answer_options() {
        let options = vec!["A".into(), "A".into()];
        let err = Question::new("Pick A", options, "A").unwrap_err();
        assert!(matches!(err, QuestionError::AmbiguousAnswer { matches: 2, .. }));
    }

    #[test]
    fn rejects_blank_prompt_and_empty_options() {
        assert_eq!(
            Question::new("  ", abc(), "A").unwrap_err(),
            QuestionError::EmptyPrompt
        );
        assert_eq!(
            Question::new("Q", Vec::new(), "A").unwrap_err(),
            QuestionError::NoOptions
        );
    }

    #[test]
    fn record_uses_wire_field_names() {
        let raw = r#"{"question":"Pick B","options":["A","B","C"],"answer":"B"}"#;
        let record: QuestionRecord = serde_json::from_str(raw).unwrap();
        let q = Question::from_record(record).unwrap();
        assert_eq!(q, Question::new("Pick B", abc(), "B").unwrap());
    }
}
