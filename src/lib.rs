pub mod aggregate;
pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod types;

pub use aggregate::{
    batch_error_rate, confusion_matrix, error_histogram, error_types, rate_or_sentinel,
    symbol_rates, ConfusionMatrix, ErrorTypeSummary, RateSummary, SymbolCounts, SymbolRates,
    EMPTY_AFTER_FILTER_SENTINEL,
};
pub use alignment::{align, align_batch, classify, cluster_errors, merge_clusters, EditCounts};
pub use config::EvalConfig;
pub use error::EvalError;
pub use pipeline::builder::EvaluatorBuilder;
pub use pipeline::evaluator::Evaluator;
pub use pipeline::traits::{ErrorClusterer, SequenceAligner};
pub use report::{build_report, EvaluationReport, ReportOptions};
pub use types::{Alignment, Arrow, ErrorCluster, ErrorKind, LabelSet};
