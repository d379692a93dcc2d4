use std::collections::BTreeMap;

/// Sparse mapping from question index to the selected option index.
///
/// A missing entry means the question is unanswered, which is distinct from
/// having selected option `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    selections: BTreeMap<usize, usize>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option` for `question`, returning the previous selection.
    pub fn select(&mut self, question: usize, option: usize) -> Option<usize> {
        self.selections.insert(question, option)
    }

    #[must_use]
    pub fn selected(&self, question: usize) -> Option<usize> {
        self.selections.get(&question).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.selections.contains_key(&question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Iterate `(question, option)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.selections.iter().map(|(q, o)| (*q, *o))
    }

    /// Dense projection with `None` for unanswered questions, sized to `len`.
    ///
    /// Entries at or beyond `len` are dropped.
    #[must_use]
    pub fn to_dense(&self, len: usize) -> Vec<Option<usize>> {
        let mut dense = vec![None; len];
        for (question, option) in self.iter() {
            if let Some(slot) = dense.get_mut(question) {
                *slot = Some(option);
            }
        }
        dense
    }

    /// Build a record from a dense projection, skipping `None` slots.
    #[must_use]
    pub fn from_dense(dense: &[Option<usize>]) -> Self {
        let selections = dense
            .iter()
            .enumerate()
            .filter_map(|(question, option)| option.map(|o| (question, o)))
            .collect();
        Self { selections }
    }
}
