use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::alignment::clustering::cluster_errors;
use crate::types::{Alignment, Arrow, ErrorCluster, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorTypeCount {
    pub cluster: ErrorCluster,
    pub count: usize,
}

/// Histogram of clustered errors plus per-kind totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorTypeSummary {
    /// Ascending by count; equal counts keep first-seen order.
    pub ranked: Vec<ErrorTypeCount>,
    /// Distinct substitution-shaped cluster types.
    pub substitutions: usize,
    /// Distinct insertion-shaped cluster types.
    pub insertions: usize,
    /// Distinct deletion-shaped cluster types.
    pub deletions: usize,
}

pub fn error_types(alignments: &[Alignment]) -> ErrorTypeSummary {
    summarize_clusters(
        alignments
            .iter()
            .flat_map(|alignment| cluster_errors(alignment)),
    )
}

/// Builds the summary from clusters of any origin; correct clusters are skipped.
pub(crate) fn summarize_clusters(
    clusters: impl Iterator<Item = ErrorCluster>,
) -> ErrorTypeSummary {
    let clusters = clusters.filter(|cluster| !cluster.is_correct());

    let mut summary = ErrorTypeSummary::default();
    for (cluster, count) in ranked_histogram(clusters) {
        match cluster.kind() {
            ErrorKind::Substitution => summary.substitutions += 1,
            ErrorKind::Insertion => summary.insertions += 1,
            ErrorKind::Deletion => summary.deletions += 1,
            ErrorKind::Correct => {}
        }
        summary.ranked.push(ErrorTypeCount { cluster, count });
    }

    tracing::debug!(
        distinct = summary.ranked.len(),
        substitutions = summary.substitutions,
        insertions = summary.insertions,
        deletions = summary.deletions,
        "error types"
    );
    summary
}

/// Histogram of elementary (unclustered) error arrows, ranked like
/// [`error_types`].
pub fn error_histogram(alignments: &[Alignment]) -> Vec<(Arrow, usize)> {
    ranked_histogram(
        alignments
            .iter()
            .flatten()
            .filter(|arrow| !arrow.is_correct())
            .cloned(),
    )
}

fn ranked_histogram<T: Eq + Hash + Clone>(items: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut entries: Vec<(T, usize)> = Vec::new();
    for item in items {
        match slots.get(&item) {
            Some(&slot) => entries[slot].1 += 1,
            None => {
                slots.insert(item.clone(), entries.len());
                entries.push((item, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    entries.sort_by_key(|(_, count)| *count);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::edit_distance::align_batch;

    fn batch(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn sides(cluster: &ErrorCluster) -> (String, String) {
        (cluster.reference.join(" "), cluster.hypothesis.join(" "))
    }

    #[test]
    fn ranked_ascending_with_first_seen_ties() {
        let refs = batch(&["a b c", "a b c", "d e"]);
        let hyps = batch(&["a x c", "a x c", "d"]);
        let alignments = align_batch(&refs, &hyps).unwrap();
        let summary = error_types(&alignments);

        assert_eq!(summary.ranked.len(), 2);
        assert_eq!(sides(&summary.ranked[0].cluster), ("e".into(), "".into()));
        assert_eq!(summary.ranked[0].count, 1);
        assert_eq!(sides(&summary.ranked[1].cluster), ("b".into(), "x".into()));
        assert_eq!(summary.ranked[1].count, 2);
        assert_eq!(summary.substitutions, 1);
        assert_eq!(summary.deletions, 1);
        assert_eq!(summary.insertions, 0);
    }

    #[test]
    fn adjacent_edits_count_as_one_type() {
        let alignments = vec![vec![
            Arrow::pair("a", "a"),
            Arrow::pair("b", ""),
            Arrow::pair("c", "x"),
            Arrow::pair("d", "d"),
            Arrow::pair("", "y"),
        ]];
        let summary = error_types(&alignments);
        assert_eq!(summary.ranked.len(), 2);
        assert_eq!(sides(&summary.ranked[0].cluster), ("b c".into(), "x".into()));
        assert_eq!(summary.substitutions, 1);
        assert_eq!(summary.insertions, 1);
        assert_eq!(summary.deletions, 0);
    }

    #[test]
    fn perfect_batch_has_no_error_types() {
        let lines = batch(&["a b", "c"]);
        let alignments = align_batch(&lines, &lines).unwrap();
        assert_eq!(error_types(&alignments), ErrorTypeSummary::default());
        assert!(error_histogram(&alignments).is_empty());
    }

    #[test]
    fn histogram_keeps_elementary_edits_apart() {
        let alignments = vec![vec![
            Arrow::pair("b", ""),
            Arrow::pair("c", "x"),
            Arrow::pair("c", "x"),
        ]];
        let histogram = error_histogram(&alignments);
        assert_eq!(
            histogram,
            vec![(Arrow::pair("b", ""), 1), (Arrow::pair("c", "x"), 2)]
        );
    }
}
