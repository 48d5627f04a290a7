use crate::aggregate::confusion::{confusion_matrix, ConfusionMatrix};
use crate::aggregate::error_types::{error_histogram, summarize_clusters, ErrorTypeSummary};
use crate::aggregate::rates::{
    batch_edit_counts_with, metric_rate_from_counts, rate_or_note, symbol_counts, symbol_rates,
    RateSummary, SymbolCounts, SymbolRates,
};
use crate::alignment::classify::{filter_to_labels, EditCounts};
use crate::alignment::edit_distance::ensure_same_utterance_count;
use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::pipeline::traits::{ErrorClusterer, SequenceAligner};
use crate::types::{Alignment, Arrow, LabelSet};

/// Batch evaluation bound to one dataset's inventories.
///
/// Every entry point takes hypotheses first and references second, paired by
/// position.
pub struct Evaluator {
    config: EvalConfig,
    sequence_aligner: Box<dyn SequenceAligner>,
    error_clusterer: Box<dyn ErrorClusterer>,
}

pub(crate) struct EvaluatorParts {
    pub config: EvalConfig,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub error_clusterer: Box<dyn ErrorClusterer>,
}

impl Evaluator {
    pub(crate) fn from_parts(parts: EvaluatorParts) -> Self {
        Self {
            config: parts.config,
            sequence_aligner: parts.sequence_aligner,
            error_clusterer: parts.error_clusterer,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn align(&self, reference: &[String], hypothesis: &[String]) -> Result<Alignment, EvalError> {
        self.sequence_aligner.align(reference, hypothesis)
    }

    /// Filters both sides to `labels` (all tokens when `None`) and aligns each pair.
    pub fn alignments<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        labels: Option<&LabelSet>,
    ) -> Result<Vec<Alignment>, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        ensure_same_utterance_count(refs.len(), hyps.len())?;
        refs.iter()
            .zip(hyps.iter())
            .map(|(reference, hypothesis)| {
                self.align(
                    &filter_to_labels(reference, labels),
                    &filter_to_labels(hypothesis, labels),
                )
            })
            .collect()
    }

    pub fn edit_counts<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        labels: Option<&LabelSet>,
    ) -> Result<EditCounts, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        batch_edit_counts_with(hyps, refs, labels, |reference, hypothesis| {
            self.align(reference, hypothesis)
        })
    }

    /// Batch error rate restricted to `labels`; see
    /// [`batch_error_rate`](crate::aggregate::rates::batch_error_rate).
    pub fn error_rate<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        labels: Option<&LabelSet>,
    ) -> Result<f64, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        self.metric_error_rate("batch_error_rate", hyps, refs, labels)
    }

    fn metric_error_rate<H, R>(
        &self,
        metric: &'static str,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        labels: Option<&LabelSet>,
    ) -> Result<f64, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let counts = self.edit_counts(hyps, refs, labels)?;
        metric_rate_from_counts(metric, &counts)
    }

    /// Error rate over every token (LER).
    pub fn label_error_rate<H, R>(&self, hyps: &[Vec<H>], refs: &[Vec<R>]) -> Result<f64, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        self.metric_error_rate("label_error_rate", hyps, refs, None)
    }

    /// Error rate over the configured phone inventory (PER).
    pub fn phone_error_rate<H, R>(&self, hyps: &[Vec<H>], refs: &[Vec<R>]) -> Result<f64, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        self.metric_error_rate("phone_error_rate", hyps, refs, Some(&self.config.phones))
    }

    /// Error rate over the configured tone inventory (TER).
    pub fn tone_error_rate<H, R>(&self, hyps: &[Vec<H>], refs: &[Vec<R>]) -> Result<f64, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        self.metric_error_rate("tone_error_rate", hyps, refs, Some(&self.config.tones))
    }

    /// LER, PER and TER in one pass, with the empty-after-filter sentinel in
    /// place of rates that have nothing left to compare. A rate without
    /// reference tokens is `None` and noted; only invalid input fails.
    pub fn summarize<H, R>(&self, hyps: &[Vec<H>], refs: &[Vec<R>]) -> Result<RateSummary, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let mut notes = Vec::new();
        let label_error_rate = rate_or_note(self.label_error_rate(hyps, refs), &mut notes)?;
        let phone_error_rate = rate_or_note(self.phone_error_rate(hyps, refs), &mut notes)?;
        let tone_error_rate = rate_or_note(self.tone_error_rate(hyps, refs), &mut notes)?;
        Ok(RateSummary {
            label_error_rate,
            phone_error_rate,
            tone_error_rate,
            notes,
        })
    }

    /// Counts for `symbol` over unfiltered alignments.
    pub fn symbol_counts<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        symbol: &str,
    ) -> Result<SymbolCounts, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let alignments = self.alignments(hyps, refs, None)?;
        Ok(symbol_counts(&alignments, symbol))
    }

    pub fn symbol_rates<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        symbol: &str,
    ) -> Result<SymbolRates, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        symbol_rates(&self.alignments(hyps, refs, None)?, symbol)
    }

    /// Clustered error histogram over alignments filtered to `labels`.
    pub fn error_types<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        labels: Option<&LabelSet>,
    ) -> Result<ErrorTypeSummary, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let alignments = self.alignments(hyps, refs, labels)?;
        Ok(summarize_clusters(
            alignments
                .iter()
                .flat_map(|alignment| self.error_clusterer.cluster(alignment)),
        ))
    }

    /// Unclustered error histogram over unfiltered alignments.
    pub fn error_histogram<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
    ) -> Result<Vec<(Arrow, usize)>, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let alignments = self.alignments(hyps, refs, None)?;
        Ok(error_histogram(&alignments))
    }

    /// Confusion statistics for `labels` over unfiltered alignments, so
    /// deletions and substitutions by non-label tokens stay visible.
    pub fn confusion_matrix<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
        labels: &LabelSet,
    ) -> Result<ConfusionMatrix, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let alignments = self.alignments(hyps, refs, None)?;
        Ok(confusion_matrix(
            &alignments,
            labels,
            self.config.confusion_min_count,
        ))
    }

    pub fn tone_confusion<H, R>(
        &self,
        hyps: &[Vec<H>],
        refs: &[Vec<R>],
    ) -> Result<ConfusionMatrix, EvalError>
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        self.confusion_matrix(hyps, refs, &self.config.tones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::rates::EMPTY_AFTER_FILTER_SENTINEL;
    use crate::pipeline::builder::EvaluatorBuilder;
    use crate::types::ErrorKind;

    fn batch(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn evaluator() -> Evaluator {
        let config = EvalConfig::new(
            LabelSet::new(["t", "a", "m", "o", "i"]),
            LabelSet::new(["1", "2", "3"]),
        );
        EvaluatorBuilder::new(config).build()
    }

    #[test]
    fn summarize_reports_all_three_rates() {
        let refs = batch(&["t a 1 m a 3", "m i 2"]);
        let hyps = batch(&["t o 1 m a 2", "m i 2"]);
        let summary = evaluator().summarize(&hyps, &refs).unwrap();

        assert!((summary.label_error_rate.unwrap() - 2.0 / 9.0).abs() < 1e-12);
        assert!((summary.phone_error_rate.unwrap() - 1.0 / 6.0).abs() < 1e-12);
        assert!((summary.tone_error_rate.unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!(summary.notes.is_empty());
    }

    #[test]
    fn summarize_uses_sentinel_for_missing_tones() {
        let refs = batch(&["t a 1"]);
        let hyps = batch(&["t a"]);
        let summary = evaluator().summarize(&hyps, &refs).unwrap();
        assert_eq!(summary.tone_error_rate, Some(EMPTY_AFTER_FILTER_SENTINEL));
        assert!(summary.phone_error_rate.unwrap().abs() < 1e-12);
    }

    #[test]
    fn summarize_keeps_defined_rates_when_one_is_undefined() {
        let evaluator = EvaluatorBuilder::new(EvalConfig::new(
            LabelSet::new(["a"]),
            LabelSet::new(["1"]),
        ))
        .build();
        // Phone "a" only appears on the hypothesis side.
        let refs = batch(&["1"]);
        let hyps = batch(&["a 1"]);
        let summary = evaluator.summarize(&hyps, &refs).unwrap();

        assert_eq!(summary.label_error_rate, Some(1.0));
        assert_eq!(summary.phone_error_rate, None);
        assert_eq!(summary.tone_error_rate, Some(0.0));
        assert_eq!(summary.notes.len(), 1);
        assert!(summary.notes[0].contains("phone_error_rate"));
    }

    #[test]
    fn undefined_rates_name_their_metric() {
        let evaluator = evaluator();
        let refs = batch(&["1"]);
        let hyps = batch(&["a 1"]);
        assert!(matches!(
            evaluator.phone_error_rate(&hyps, &refs),
            Err(EvalError::UndefinedRate {
                metric: "phone_error_rate",
                ..
            })
        ));
        assert!(matches!(
            evaluator.label_error_rate(&batch(&["a"]), &batch(&[""])),
            Err(EvalError::UndefinedRate {
                metric: "label_error_rate",
                ..
            })
        ));
        assert!(matches!(
            evaluator.error_rate(&batch(&["a"]), &batch(&[""]), None),
            Err(EvalError::UndefinedRate {
                metric: "batch_error_rate",
                ..
            })
        ));
    }

    #[test]
    fn tone_error_rate_surfaces_empty_after_filter() {
        let result = evaluator().tone_error_rate(&batch(&["t a"]), &batch(&["t a 1"]));
        assert!(matches!(result, Err(EvalError::EmptyAfterFilter { .. })));
    }

    #[test]
    fn alignments_filter_before_aligning() {
        let tones = LabelSet::new(["1", "2", "3"]);
        let alignments = evaluator()
            .alignments(&batch(&["t o 1 m a 2"]), &batch(&["t a 1 m a 3"]), Some(&tones))
            .unwrap();
        assert_eq!(
            alignments,
            vec![vec![Arrow::pair("1", "1"), Arrow::pair("3", "2")]]
        );
    }

    #[test]
    fn symbol_rates_over_unfiltered_alignments() {
        let refs = batch(&["a 1 b 1", "1"]);
        let hyps = batch(&["a 1 b 2", "1"]);
        let rates = evaluator().symbol_rates(&hyps, &refs, "1").unwrap();
        assert!((rates.error_rate - 1.0 / 3.0).abs() < 1e-12);
        assert!((rates.deletion_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(rates.insertion_rate, 0.0);
    }

    #[test]
    fn error_types_use_configured_clusterer() {
        let refs = batch(&["t a 1 m a 3"]);
        let hyps = batch(&["t o m o 3"]);
        let summary = evaluator().error_types(&hyps, &refs, None).unwrap();
        assert_eq!(summary.ranked.len(), 2);
        assert_eq!(summary.ranked[0].cluster.kind(), ErrorKind::Substitution);
        assert_eq!(summary.ranked[0].cluster.edits, 2);
    }

    #[test]
    fn tone_confusion_uses_tone_inventory() {
        let refs = batch(&["1 2 3"; 5]);
        let hyps = batch(&["1 2 2"; 5]);
        let matrix = evaluator().tone_confusion(&hyps, &refs).unwrap();
        assert_eq!(matrix.reliable_labels(), vec!["1", "2", "3"]);
        assert_eq!(matrix.count("3", "2"), 5);
        assert_eq!(matrix.percentage("3", "2").unwrap(), 100.0);
    }

    #[test]
    fn mismatched_batches_are_rejected_everywhere() {
        let refs = batch(&["a", "b"]);
        let hyps = batch(&["a"]);
        let evaluator = evaluator();
        assert!(matches!(
            evaluator.label_error_rate(&hyps, &refs),
            Err(EvalError::InvalidInput { .. })
        ));
        assert!(matches!(
            evaluator.error_histogram(&hyps, &refs),
            Err(EvalError::InvalidInput { .. })
        ));
        assert!(matches!(
            evaluator.summarize(&hyps, &refs),
            Err(EvalError::InvalidInput { .. })
        ));
    }
}
