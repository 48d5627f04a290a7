use serde::Serialize;

use crate::types::{Arrow, ErrorKind, LabelSet};

pub fn classify(arrow: &Arrow) -> ErrorKind {
    match (arrow.reference.is_empty(), arrow.hypothesis.is_empty()) {
        (true, _) => ErrorKind::Insertion,
        (false, true) => ErrorKind::Deletion,
        (false, false) if arrow.reference == arrow.hypothesis => ErrorKind::Correct,
        (false, false) => ErrorKind::Substitution,
    }
}

/// Keeps only tokens present in `labels`, in order. `None` or an empty set
/// keeps everything.
///
/// Applied before alignment when a label-restricted rate is wanted, so edit
/// costs are computed over the tokens of interest only.
pub fn filter_to_labels<S: AsRef<str>>(sequence: &[S], labels: Option<&LabelSet>) -> Vec<String> {
    let labels = labels.filter(|set| !set.is_empty());
    sequence
        .iter()
        .map(|token| token.as_ref())
        .filter(|token| labels.map_or(true, |set| set.contains(token)))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditCounts {
    pub correct: usize,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl EditCounts {
    pub fn from_alignment(alignment: &[Arrow]) -> Self {
        let mut counts = Self::default();
        for arrow in alignment {
            counts.record(classify(arrow));
        }
        counts
    }

    pub fn record(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Correct => self.correct += 1,
            ErrorKind::Substitution => self.substitutions += 1,
            ErrorKind::Insertion => self.insertions += 1,
            ErrorKind::Deletion => self.deletions += 1,
        }
    }

    /// Substitutions + insertions + deletions.
    pub fn errors(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }

    /// Tokens on the reference side (every kind except insertion).
    pub fn reference_len(&self) -> usize {
        self.correct + self.substitutions + self.deletions
    }

    pub fn merge(&mut self, other: &Self) {
        self.correct += other.correct;
        self.substitutions += other.substitutions;
        self.insertions += other.insertions;
        self.deletions += other.deletions;
    }
}
