use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// One utterance's alignment, left to right.
pub type Alignment = Vec<Arrow>;

/// One aligned position. An empty side means "no token" at this position;
/// the two sides are never both empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Arrow {
    pub reference: String,
    pub hypothesis: String,
}

impl Arrow {
    pub fn new(
        reference: impl Into<String>,
        hypothesis: impl Into<String>,
    ) -> Result<Self, EvalError> {
        let arrow = Self::pair(reference, hypothesis);
        if arrow.reference.is_empty() && arrow.hypothesis.is_empty() {
            return Err(EvalError::invalid_input(
                "an arrow needs at least one non-empty side",
            ));
        }
        Ok(arrow)
    }

    pub(crate) fn pair(reference: impl Into<String>, hypothesis: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            hypothesis: hypothesis.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        crate::alignment::classify::classify(self)
    }

    pub fn is_correct(&self) -> bool {
        self.kind() == ErrorKind::Correct
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.reference, self.hypothesis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Correct,
    Substitution,
    Insertion,
    Deletion,
}

/// A contiguous run of elementary edits treated as one error, or a correct
/// arrow passed through unchanged (`edits == 0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCluster {
    pub reference: Vec<String>,
    pub hypothesis: Vec<String>,
    /// Number of elementary substitutions/insertions/deletions merged here.
    pub edits: usize,
}

impl ErrorCluster {
    /// Shape-derived kind: an empty reference side is an insertion, an empty
    /// hypothesis side a deletion, anything else with edits a substitution.
    pub fn kind(&self) -> ErrorKind {
        if self.edits == 0 {
            ErrorKind::Correct
        } else if self.reference.is_empty() {
            ErrorKind::Insertion
        } else if self.hypothesis.is_empty() {
            ErrorKind::Deletion
        } else {
            ErrorKind::Substitution
        }
    }

    pub fn is_correct(&self) -> bool {
        self.edits == 0
    }
}

impl From<&Arrow> for ErrorCluster {
    fn from(arrow: &Arrow) -> Self {
        let side = |token: &str| {
            if token.is_empty() {
                Vec::new()
            } else {
                vec![token.to_string()]
            }
        };
        Self {
            reference: side(&arrow.reference),
            hypothesis: side(&arrow.hypothesis),
            edits: usize::from(!arrow.is_correct()),
        }
    }
}

impl fmt::Display for ErrorCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:?}, {:?})",
            self.reference.join(" "),
            self.hypothesis.join(" ")
        )
    }
}

/// Ordered token inventory (phones, tones, ...) with constant-time membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet {
    labels: Vec<String>,
    index: HashSet<String>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels = Vec::new();
        let mut index = HashSet::new();
        for label in iter {
            let label = label.into();
            // First occurrence fixes the rendering order.
            if index.insert(label.clone()) {
                labels.push(label);
            }
        }
        Self { labels, index }
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        labels.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.labels
    }
}
