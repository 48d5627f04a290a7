use serde::Serialize;

use crate::aggregate::confusion::ConfusionMatrix;
use crate::aggregate::error_types::ErrorTypeSummary;
use crate::aggregate::rates::{symbol_counts, RateSummary, SymbolCounts};
use crate::alignment::classify::EditCounts;
use crate::error::EvalError;
use crate::pipeline::evaluator::Evaluator;
use crate::types::{Alignment, LabelSet};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub schema_version: u32,
    pub meta: Meta,
    pub rates: RateSummary,
    pub edit_counts: EditCounts,
    pub symbols: Vec<SymbolReport>,
    pub error_types: ErrorTypeSummary,
    pub tone_confusion: ConfusionReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub utterance_count: usize,
    pub reference_token_count: usize,
    pub hypothesis_token_count: usize,
    pub phone_inventory_size: usize,
    pub tone_inventory_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub counts: SymbolCounts,
    /// `None` when the rate's denominator is zero; see `notes`.
    pub error_rate: Option<f64>,
    pub deletion_rate: Option<f64>,
    pub insertion_rate: Option<f64>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfusionReport {
    pub min_count: usize,
    /// Rows and columns of `rows`, in inventory order.
    pub labels: Vec<String>,
    pub rows: Vec<ConfusionRowReport>,
    /// Every inventory label, rendered or not.
    pub row_totals: Vec<LabelTotal>,
    pub counts: Vec<ConfusionEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfusionRowReport {
    pub label: String,
    pub total: usize,
    pub percentages: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelTotal {
    pub label: String,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfusionEntry {
    pub reference: String,
    pub hypothesis: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Symbols to report per-symbol rates for.
    pub symbols: Vec<String>,
    /// Restricts the error-type histogram to these labels; `None` keeps all tokens.
    pub error_type_labels: Option<LabelSet>,
}

pub fn build_report<H, R>(
    evaluator: &Evaluator,
    hyps: &[Vec<H>],
    refs: &[Vec<R>],
    options: &ReportOptions,
) -> Result<EvaluationReport, EvalError>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    let alignments = evaluator.alignments(hyps, refs, None)?;
    let edit_counts = alignments
        .iter()
        .fold(EditCounts::default(), |mut total, alignment| {
            total.merge(&EditCounts::from_alignment(alignment));
            total
        });

    let rates = evaluator.summarize(hyps, refs)?;
    let symbols = options
        .symbols
        .iter()
        .map(|symbol| symbol_report(&alignments, symbol))
        .collect();
    let error_types = evaluator.error_types(hyps, refs, options.error_type_labels.as_ref())?;
    let tone_confusion = confusion_report(&evaluator.tone_confusion(hyps, refs)?);

    let config = evaluator.config();
    Ok(EvaluationReport {
        schema_version: SCHEMA_VERSION,
        meta: Meta {
            generated_at: chrono::Utc::now().to_rfc3339(),
            utterance_count: refs.len(),
            reference_token_count: refs.iter().map(Vec::len).sum(),
            hypothesis_token_count: hyps.iter().map(Vec::len).sum(),
            phone_inventory_size: config.phones.len(),
            tone_inventory_size: config.tones.len(),
        },
        rates,
        edit_counts,
        symbols,
        error_types,
        tone_confusion,
    })
}

fn symbol_report(alignments: &[Alignment], symbol: &str) -> SymbolReport {
    let counts = symbol_counts(alignments, symbol);
    let mut notes = Vec::new();
    let mut defined = |rate: Result<f64, EvalError>| match rate {
        Ok(value) => Some(value),
        Err(err) => {
            notes.push(err.to_string());
            None
        }
    };
    let error_rate = defined(counts.error_rate());
    let deletion_rate = defined(counts.deletion_rate());
    let insertion_rate = defined(counts.insertion_rate());

    SymbolReport {
        counts,
        error_rate,
        deletion_rate,
        insertion_rate,
        notes,
    }
}

pub fn confusion_report(matrix: &ConfusionMatrix) -> ConfusionReport {
    let mut counts: Vec<ConfusionEntry> = matrix
        .counts()
        .iter()
        .map(|(reference, hypothesis, count)| ConfusionEntry {
            reference: reference.to_string(),
            hypothesis: hypothesis.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| {
        a.reference
            .cmp(&b.reference)
            .then_with(|| a.hypothesis.cmp(&b.hypothesis))
    });

    ConfusionReport {
        min_count: matrix.min_count(),
        labels: matrix
            .reliable_labels()
            .into_iter()
            .map(str::to_string)
            .collect(),
        rows: matrix
            .rows()
            .into_iter()
            .map(|row| ConfusionRowReport {
                label: row.label,
                total: row.total,
                percentages: row.percentages,
            })
            .collect(),
        row_totals: matrix
            .labels()
            .iter()
            .map(|label| LabelTotal {
                label: label.clone(),
                total: matrix.row_total(label),
            })
            .collect(),
        counts,
    }
}
