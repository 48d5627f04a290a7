use std::collections::HashMap;

use crate::error::EvalError;
use crate::types::{Alignment, Arrow, LabelSet};

/// Frequency mapping keyed by the exact `(reference, hypothesis)` pair.
/// Lookups of unseen pairs read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    counts: HashMap<(String, String), usize>,
}

impl ConfusionCounts {
    pub fn record(&mut self, arrow: &Arrow) {
        *self
            .counts
            .entry((arrow.reference.clone(), arrow.hypothesis.clone()))
            .or_insert(0) += 1;
    }

    pub fn count(&self, reference: &str, hypothesis: &str) -> usize {
        self.counts
            .get(&(reference.to_string(), hypothesis.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.counts
            .iter()
            .map(|((reference, hypothesis), count)| (reference.as_str(), hypothesis.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionRow {
    pub label: String,
    pub total: usize,
    /// Percentages in the column order of [`ConfusionMatrix::reliable_labels`].
    pub percentages: Vec<f64>,
}

/// How often each reference label was realized as each hypothesis token.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: ConfusionCounts,
    row_totals: HashMap<String, usize>,
    min_count: usize,
}

impl ConfusionMatrix {
    /// Raw tally; pairs never seen read as zero.
    pub fn count(&self, reference: &str, hypothesis: &str) -> usize {
        self.counts.count(reference, hypothesis)
    }

    pub fn counts(&self) -> &ConfusionCounts {
        &self.counts
    }

    /// Occurrences of `label` on the reference side, whatever the hypothesis
    /// (correct, substituted or deleted).
    pub fn row_total(&self, label: &str) -> usize {
        self.row_totals.get(label).copied().unwrap_or(0)
    }

    /// Inventory order, including labels that never occurred.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// `100 * count(reference, hypothesis) / row_total(reference)`.
    pub fn percentage(&self, reference: &str, hypothesis: &str) -> Result<f64, EvalError> {
        let total = self.row_total(reference);
        if total == 0 {
            return Err(EvalError::undefined_rate(
                "confusion_percentage",
                format!("label '{reference}' never occurs as a reference token"),
            ));
        }
        Ok(100.0 * self.count(reference, hypothesis) as f64 / total as f64)
    }

    /// Labels with more than `min_count` reference occurrences, in inventory
    /// order. Rows at or below the threshold stay in the raw counts only.
    pub fn reliable_labels(&self) -> Vec<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|label| self.row_total(label) > self.min_count)
            .collect()
    }

    /// Rendered matrix: one row per reliable label, one column per reliable label.
    pub fn rows(&self) -> Vec<ConfusionRow> {
        let columns = self.reliable_labels();
        columns
            .iter()
            .map(|label| {
                let total = self.row_total(label);
                ConfusionRow {
                    label: label.to_string(),
                    total,
                    percentages: columns
                        .iter()
                        .map(|hyp| 100.0 * self.count(label, hyp) as f64 / total as f64)
                        .collect(),
                }
            })
            .collect()
    }
}

/// Tallies every arrow whose reference side is in `labels`.
pub fn confusion_matrix(
    alignments: &[Alignment],
    labels: &LabelSet,
    min_count: usize,
) -> ConfusionMatrix {
    let mut counts = ConfusionCounts::default();
    let mut row_totals: HashMap<String, usize> = HashMap::new();
    for arrow in alignments.iter().flatten() {
        if !labels.contains(&arrow.reference) {
            continue;
        }
        counts.record(arrow);
        *row_totals.entry(arrow.reference.clone()).or_insert(0) += 1;
    }

    let matrix = ConfusionMatrix {
        labels: labels.iter().map(str::to_string).collect(),
        counts,
        row_totals,
        min_count,
    };
    let excluded = matrix.labels.len() - matrix.reliable_labels().len();
    if excluded > 0 {
        tracing::debug!(
            excluded,
            min_count,
            "confusion rows at or below the occurrence threshold are not rendered"
        );
    }
    matrix
}
