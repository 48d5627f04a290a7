use serde::Serialize;

use crate::alignment::classify::{filter_to_labels, EditCounts};
use crate::alignment::edit_distance::{align, ensure_same_utterance_count};
use crate::error::EvalError;
use crate::types::{Alignment, LabelSet};

/// Value handed to renderers when every hypothesis is empty after filtering.
pub const EMPTY_AFTER_FILTER_SENTINEL: f64 = -1.0;

/// Token error rate over a whole batch.
///
/// Each hypothesis/reference pair is filtered to `labels`, then aligned on
/// its own. Edits are summed across the batch and divided by the total
/// number of reference tokens; this is not the mean of per-utterance rates.
///
/// Errors:
/// - `InvalidInput` when the batches hold different utterance counts.
/// - `EmptyAfterFilter` when every hypothesis is empty after filtering.
/// - `UndefinedRate` when no reference token survives filtering.
pub fn batch_error_rate<H, R>(
    hyps: &[Vec<H>],
    refs: &[Vec<R>],
    labels: Option<&LabelSet>,
) -> Result<f64, EvalError>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    let counts = batch_edit_counts(hyps, refs, labels)?;
    error_rate_from_counts(&counts)
}

/// Elementary edit counts behind [`batch_error_rate`], with the same
/// filtering and the same `InvalidInput` / `EmptyAfterFilter` conditions.
pub fn batch_edit_counts<H, R>(
    hyps: &[Vec<H>],
    refs: &[Vec<R>],
    labels: Option<&LabelSet>,
) -> Result<EditCounts, EvalError>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    batch_edit_counts_with(hyps, refs, labels, |reference, hypothesis| {
        align(reference, hypothesis)
    })
}

/// [`batch_edit_counts`] with a caller-supplied aligner.
pub(crate) fn batch_edit_counts_with<H, R, F>(
    hyps: &[Vec<H>],
    refs: &[Vec<R>],
    labels: Option<&LabelSet>,
    align_pair: F,
) -> Result<EditCounts, EvalError>
where
    H: AsRef<str>,
    R: AsRef<str>,
    F: Fn(&[String], &[String]) -> Result<Alignment, EvalError>,
{
    ensure_same_utterance_count(refs.len(), hyps.len())?;
    let hyps: Vec<Vec<String>> = hyps
        .iter()
        .map(|hyp| filter_to_labels(hyp, labels))
        .collect();
    let refs: Vec<Vec<String>> = refs
        .iter()
        .map(|reference| filter_to_labels(reference, labels))
        .collect();

    if hyps.iter().all(Vec::is_empty) {
        tracing::warn!(
            utterances = hyps.len(),
            "every hypothesis is empty after label filtering"
        );
        return Err(EvalError::EmptyAfterFilter {
            utterances: hyps.len(),
        });
    }

    let mut counts = EditCounts::default();
    for (reference, hypothesis) in refs.iter().zip(hyps.iter()) {
        counts.merge(&EditCounts::from_alignment(&align_pair(reference, hypothesis)?));
    }
    tracing::debug!(
        utterances = refs.len(),
        reference_tokens = counts.reference_len(),
        substitutions = counts.substitutions,
        insertions = counts.insertions,
        deletions = counts.deletions,
        "batch edit counts"
    );
    Ok(counts)
}

/// `errors / reference tokens`; `UndefinedRate` when there is no reference token.
pub fn error_rate_from_counts(counts: &EditCounts) -> Result<f64, EvalError> {
    metric_rate_from_counts("batch_error_rate", counts)
}

/// [`error_rate_from_counts`] reporting an undefined rate under `metric`.
pub(crate) fn metric_rate_from_counts(
    metric: &'static str,
    counts: &EditCounts,
) -> Result<f64, EvalError> {
    let reference_tokens = counts.reference_len();
    if reference_tokens == 0 {
        return Err(EvalError::undefined_rate(
            metric,
            format!("no reference tokens ({} insertions only)", counts.insertions),
        ));
    }
    Ok(counts.errors() as f64 / reference_tokens as f64)
}

/// Maps `EmptyAfterFilter` to [`EMPTY_AFTER_FILTER_SENTINEL`], passes every
/// other outcome through.
pub fn rate_or_sentinel(rate: Result<f64, EvalError>) -> Result<f64, EvalError> {
    match rate {
        Err(EvalError::EmptyAfterFilter { .. }) => Ok(EMPTY_AFTER_FILTER_SENTINEL),
        other => other,
    }
}

/// Keeps a defined rate (or the sentinel), records an `UndefinedRate` in
/// `notes` as `None`, and passes every other error through.
pub(crate) fn rate_or_note(
    rate: Result<f64, EvalError>,
    notes: &mut Vec<String>,
) -> Result<Option<f64>, EvalError> {
    match rate_or_sentinel(rate) {
        Ok(value) => Ok(Some(value)),
        Err(err @ EvalError::UndefinedRate { .. }) => {
            tracing::warn!(%err, "rate left out of the summary");
            notes.push(err.to_string());
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// LER/PER/TER for one batch. A rate whose hypotheses are all empty after
/// filtering holds [`EMPTY_AFTER_FILTER_SENTINEL`]; a rate with no reference
/// token is `None`, with the reason in `notes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSummary {
    pub label_error_rate: Option<f64>,
    pub phone_error_rate: Option<f64>,
    pub tone_error_rate: Option<f64>,
    pub notes: Vec<String>,
}

/// Arrow tallies for one symbol of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolCounts {
    pub symbol: String,
    /// Reference and hypothesis are both the symbol.
    pub correct: usize,
    /// Reference is the symbol, hypothesis is empty.
    pub deletions: usize,
    /// Reference is empty, hypothesis is the symbol.
    pub insertions: usize,
    /// Reference is the symbol, hypothesis is another token.
    pub deletion_substitutions: usize,
    /// Hypothesis is the symbol, reference is another token.
    pub insertion_substitutions: usize,
    pub total_reference: usize,
    pub total_hypothesis: usize,
}

impl SymbolCounts {
    pub fn error_rate(&self) -> Result<f64, EvalError> {
        let errors = self.deletions
            + self.insertions
            + self.deletion_substitutions
            + self.insertion_substitutions;
        self.ratio("error_rate", errors, self.correct + errors)
    }

    pub fn deletion_rate(&self) -> Result<f64, EvalError> {
        let errors = self.deletions + self.deletion_substitutions;
        self.ratio("deletion_rate", errors, self.correct + errors)
    }

    pub fn insertion_rate(&self) -> Result<f64, EvalError> {
        let errors = self.insertions + self.insertion_substitutions;
        self.ratio("insertion_rate", errors, self.correct + errors)
    }

    fn ratio(
        &self,
        metric: &'static str,
        numerator: usize,
        denominator: usize,
    ) -> Result<f64, EvalError> {
        if denominator == 0 {
            return Err(EvalError::undefined_rate(
                metric,
                format!("symbol '{}' never occurs in the relevant arrows", self.symbol),
            ));
        }
        Ok(numerator as f64 / denominator as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymbolRates {
    pub error_rate: f64,
    pub deletion_rate: f64,
    pub insertion_rate: f64,
}

pub fn symbol_counts(alignments: &[Alignment], symbol: &str) -> SymbolCounts {
    let mut counts = SymbolCounts {
        symbol: symbol.to_string(),
        ..SymbolCounts::default()
    };
    for arrow in alignments.iter().flatten() {
        let reference = arrow.reference.as_str();
        let hypothesis = arrow.hypothesis.as_str();
        if reference == symbol && hypothesis == symbol {
            counts.correct += 1;
        } else if reference == symbol && hypothesis.is_empty() {
            counts.deletions += 1;
        } else if reference.is_empty() && hypothesis == symbol {
            counts.insertions += 1;
        } else if hypothesis == symbol {
            counts.insertion_substitutions += 1;
        } else if reference == symbol {
            counts.deletion_substitutions += 1;
        }

        if hypothesis == symbol {
            counts.total_hypothesis += 1;
        }
        if reference == symbol {
            counts.total_reference += 1;
        }
    }
    counts
}

/// Error, deletion and insertion rates restricted to arrows touching `symbol`.
/// The first undefined rate (zero denominator) is returned as `UndefinedRate`;
/// use [`symbol_counts`] for partial access.
pub fn symbol_rates(alignments: &[Alignment], symbol: &str) -> Result<SymbolRates, EvalError> {
    let counts = symbol_counts(alignments, symbol);
    Ok(SymbolRates {
        error_rate: counts.error_rate()?,
        deletion_rate: counts.deletion_rate()?,
        insertion_rate: counts.insertion_rate()?,
    })
}
