use crate::types::{Arrow, ErrorCluster};

/// Merges every maximal run of adjacent non-correct arrows into one cluster.
///
/// A single mispronunciation often surfaces as several neighbouring edits
/// (say a deletion next to a substitution); clustering counts it once.
/// Correct arrows pass through as singleton clusters and always end a run.
pub fn cluster_errors(alignment: &[Arrow]) -> Vec<ErrorCluster> {
    merge_runs(alignment.iter().map(ErrorCluster::from))
}

/// Same merge over clusters. `merge_clusters(&cluster_errors(a)) == cluster_errors(a)`.
pub fn merge_clusters(clusters: &[ErrorCluster]) -> Vec<ErrorCluster> {
    merge_runs(clusters.iter().cloned())
}

fn merge_runs(items: impl Iterator<Item = ErrorCluster>) -> Vec<ErrorCluster> {
    let mut out = Vec::new();
    let mut run: Option<ErrorCluster> = None;

    for item in items {
        if item.is_correct() {
            out.extend(run.take());
            out.push(item);
            continue;
        }
        match run.as_mut() {
            Some(open) => {
                open.reference.extend(item.reference);
                open.hypothesis.extend(item.hypothesis);
                open.edits += item.edits;
            }
            None => run = Some(item),
        }
    }
    out.extend(run);
    out
}
