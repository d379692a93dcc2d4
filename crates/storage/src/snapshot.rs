use std::sync::Arc;

use quiz_core::model::{AnswerRecord, QuestionBank, SessionState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::{KeyValueStore, StorageError};

/// Reasons a stored snapshot cannot be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("question index {index} is outside a bank of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("snapshot belongs to a finished quiz")]
    Finished,

    #[error("snapshot has no time left")]
    Expired,

    #[error("{count} selections recorded for a bank of {len}")]
    TooManySelections { count: usize, len: usize },

    #[error("option {option} is not valid for question {question}")]
    InvalidOption { question: usize, option: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Serialized projection of a session.
///
/// `selectedOptions` is dense and uses `null` for unanswered questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub current_question_index: usize,
    #[serde(rename = "timeLeft")]
    pub time_left: u32,
    #[serde(default)]
    pub selected_options: Vec<Option<usize>>,
}

impl PersistedSnapshot {
    #[must_use]
    pub fn from_state(state: &SessionState, question_count: usize) -> Self {
        Self {
            current_question_index: state.current_question_index(),
            time_left: state.time_left_seconds(),
            selected_options: state.answers().to_dense(question_count),
        }
    }

    /// Encode to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Malformed` if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored blob without checking it against a bank.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Malformed` for unparsable input or missing fields.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Check the snapshot against `bank` and rebuild the session state.
    ///
    /// A snapshot sitting at the end of the bank or with no time left belongs
    /// to a session that already ended and is rejected.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` describing the first inconsistency found.
    pub fn restore(self, bank: &QuestionBank) -> Result<SessionState, SnapshotError> {
        let len = bank.len();
        if self.current_question_index > len {
            return Err(SnapshotError::IndexOutOfRange {
                index: self.current_question_index,
                len,
            });
        }
        if self.current_question_index == len {
            return Err(SnapshotError::Finished);
        }
        if self.time_left == 0 {
            return Err(SnapshotError::Expired);
        }
        if self.selected_options.len() > len {
            return Err(SnapshotError::TooManySelections {
                count: self.selected_options.len(),
                len,
            });
        }

        let answers = AnswerRecord::from_dense(&self.selected_options);
        if let Some((question, option)) = answers.iter().find(|(q, o)| !bank.accepts(*q, *o)) {
            return Err(SnapshotError::InvalidOption { question, option });
        }

        Ok(SessionState::from_parts(
            self.current_question_index,
            self.time_left,
            answers,
        ))
    }
}

/// Reads and writes the session snapshot under a single fixed key.
#[derive(Clone)]
pub struct SnapshotStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Read the raw snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` for backend failures or undecodable blobs.
    pub async fn read(&self) -> Result<Option<PersistedSnapshot>, SnapshotError> {
        self.kv
            .get(&self.key)
            .await?
            .map(|raw| PersistedSnapshot::decode(&raw))
            .transpose()
    }

    /// Write `state` as the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if encoding or the backend write fails.
    pub async fn write(
        &self,
        state: &SessionState,
        question_count: usize,
    ) -> Result<(), SnapshotError> {
        let raw = PersistedSnapshot::from_state(state, question_count).encode()?;
        self.kv.set(&self.key, &raw).await?;
        Ok(())
    }

    /// Restore a prior session for `bank`.
    ///
    /// Absent, corrupt, or stale snapshots all yield `None`; the reason is logged.
    pub async fn load(&self, bank: &QuestionBank) -> Option<SessionState> {
        let snapshot = match self.read().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("ignoring stored snapshot {:?}: {err}", self.key);
                return None;
            }
        };

        match snapshot.restore(bank) {
            Ok(state) => {
                log::info!(
                    "restored snapshot at question {} with {}s left",
                    state.current_question_index(),
                    state.time_left_seconds()
                );
                Some(state)
            }
            Err(err) => {
                log::warn!("discarding stored snapshot {:?}: {err}", self.key);
                None
            }
        }
    }

    /// Write `state`, logging instead of failing.
    pub async fn persist(&self, state: &SessionState, question_count: usize) {
        match self.write(state, question_count).await {
            Ok(()) => log::debug!(
                "snapshot saved: question {} time_left {}s answers {}",
                state.current_question_index(),
                state.time_left_seconds(),
                state.answers().len()
            ),
            Err(err) => log::error!("failed to save snapshot {:?}: {err}", self.key),
        }
    }

    /// Remove the snapshot, logging instead of failing.
    pub async fn clear(&self) {
        if let Err(err) = self.kv.remove(&self.key).await {
            log::error!("failed to clear snapshot {:?}: {err}", self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, KeyValueStore};
    use quiz_core::model::QuestionRecord;

    fn bank(len: usize) -> QuestionBank {
        let records = (0..len)
            .map(|i| QuestionRecord {
                question: format!("Q{i}"),
                options: vec!["A".into(), "B".into(), "C".into()],
                answer: "A".into(),
            })
            .collect();
        QuestionBank::from_records(records).unwrap()
    }

    #[test]
    fn decodes_reference_layout() {
        let raw = r#"{"currentQuestionIndex":1,"timeLeft":450,"selectedOptions":[2,null]}"#;
        let snapshot = PersistedSnapshot::decode(raw).unwrap();
        assert_eq!(snapshot.current_question_index, 1);
        assert_eq!(snapshot.time_left, 450);

        let state = snapshot.restore(&bank(3)).unwrap();
        assert_eq!(state.current_question_index(), 1);
        assert_eq!(state.time_left_seconds(), 450);
        assert_eq!(state.answers().selected(0), Some(2));
        assert_eq!(state.answers().selected(1), None);
    }

    #[test]
    fn missing_selected_options_means_no_answers() {
        let raw = r#"{"currentQuestionIndex":0,"timeLeft":12}"#;
        let state = PersistedSnapshot::decode(raw)
            .unwrap()
            .restore(&bank(2))
            .unwrap();
        assert!(state.answers().is_empty());
    }

    #[test]
    fn encodes_gaps_as_null() {
        let mut answers = AnswerRecord::new();
        answers.select(1, 0);
        let state = SessionState::from_parts(2, 30, answers);
        let raw = PersistedSnapshot::from_state(&state, 3).encode().unwrap();
        assert_eq!(
            raw,
            r#"{"currentQuestionIndex":2,"timeLeft":30,"selectedOptions":[null,0,null]}"#
        );
    }

    #[test]
    fn rejects_inconsistent_snapshots() {
        let bank = bank(2);
        let cases = [
            (r#"{"currentQuestionIndex":5,"timeLeft":10}"#, "range"),
            (r#"{"currentQuestionIndex":2,"timeLeft":10}"#, "finished"),
            (r#"{"currentQuestionIndex":0,"timeLeft":0}"#, "expired"),
            (
                r#"{"currentQuestionIndex":0,"timeLeft":10,"selectedOptions":[0,0,0]}"#,
                "too many",
            ),
            (
                r#"{"currentQuestionIndex":0,"timeLeft":10,"selectedOptions":[9]}"#,
                "option",
            ),
        ];
        for (raw, label) in cases {
            let result = PersistedSnapshot::decode(raw).unwrap().restore(&bank);
            assert!(result.is_err(), "{label} should be rejected");
        }
    }

    #[tokio::test]
    async fn load_treats_garbage_as_absent() {
        let kv = InMemoryStore::new();
        kv.set("quizState", "{not json").await.unwrap();
        let store = SnapshotStore::new(Arc::new(kv.clone()), "quizState");
        assert!(store.load(&bank(2)).await.is_none());

        kv.set("quizState", r#"{"timeLeft":10}"#).await.unwrap();
        assert!(store.load(&bank(2)).await.is_none());
    }

    #[tokio::test]
    async fn persist_then_load_round_trips_answers() {
        let store = SnapshotStore::new(Arc::new(InMemoryStore::new()), "quizState");
        let bank = bank(3);
        let mut state = SessionState::new(600);
        state.record_answer(0, 1);
        state.record_answer(2, 2);
        state.advance_index(bank.len());

        store.persist(&state, bank.len()).await;
        assert_eq!(store.load(&bank).await, Some(state));

        store.clear().await;
        assert!(store.read().await.unwrap().is_none());
    }
}
