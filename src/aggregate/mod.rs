pub mod confusion;
pub mod error_types;
pub mod rates;

pub use confusion::{confusion_matrix, ConfusionCounts, ConfusionMatrix, ConfusionRow};
pub use error_types::{error_histogram, error_types, ErrorTypeCount, ErrorTypeSummary};
pub use rates::{
    batch_edit_counts, batch_error_rate, error_rate_from_counts, rate_or_sentinel, symbol_counts,
    symbol_rates, RateSummary, SymbolCounts, SymbolRates, EMPTY_AFTER_FILTER_SENTINEL,
};
