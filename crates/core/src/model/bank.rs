use thiserror::Error;

use crate::model::{AnswerRecord, Question, QuestionError, QuestionRecord, Score};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("no questions available")]
    Empty,

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Ordered, non-empty set of questions for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a bank from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { questions })
    }

    /// Validate raw records in order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidQuestion` for the first malformed record,
    /// or `BankError::Empty` if there are none.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, BankError> {
        let questions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Question::from_record(record)
                    .map_err(|source| BankError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns true when `option` is a valid index for question `question`.
    #[must_use]
    pub fn accepts(&self, question: usize, option: usize) -> bool {
        self.get(question).is_some_and(|q| option < q.option_count())
    }

    /// Count questions whose selected option value equals the answer value.
    #[must_use]
    pub fn compute_score(&self, answers: &AnswerRecord) -> Score {
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                answers
                    .selected(*index)
                    .is_some_and(|option| question.is_correct(option))
            })
            .count();

        Score {
            correct,
            total: self.questions.len(),
        }
    }
}
