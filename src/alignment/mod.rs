pub mod classify;
pub mod clustering;
pub mod edit_distance;

pub use classify::{classify, filter_to_labels, EditCounts};
pub use clustering::{cluster_errors, merge_clusters};
pub use edit_distance::{align, align_batch, edit_distance};
