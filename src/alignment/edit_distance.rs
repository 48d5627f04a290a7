use crate::error::EvalError;
use crate::types::{Alignment, Arrow};

/// Minimum-edit-distance alignment of `reference` against `hypothesis`.
///
/// Costs: match 0, substitution/insertion/deletion 1. Several paths can share
/// the optimal cost, so the backtrace resolves ties in a fixed order at every
/// cell:
/// 1. diagonal (match or substitution)
/// 2. deletion (move up: reference token against an empty hypothesis side)
/// 3. insertion (move left)
///
/// Tokens must be non-empty; `""` is reserved for the missing side of an arrow.
pub fn align<R, H>(reference: &[R], hypothesis: &[H]) -> Result<Alignment, EvalError>
where
    R: AsRef<str>,
    H: AsRef<str>,
{
    reject_empty_tokens("reference", reference)?;
    reject_empty_tokens("hypothesis", hypothesis)?;

    let table = cost_table(reference, hypothesis);
    let cols = hypothesis.len() + 1;
    let cell = |i: usize, j: usize| table[i * cols + j];

    let (mut i, mut j) = (reference.len(), hypothesis.len());
    let mut arrows = Vec::with_capacity(i.max(j));
    while i > 0 || j > 0 {
        let cost = cell(i, j);
        if i > 0 && j > 0 {
            let r = reference[i - 1].as_ref();
            let h = hypothesis[j - 1].as_ref();
            if cost == cell(i - 1, j - 1) + usize::from(r != h) {
                arrows.push(Arrow::pair(r, h));
                i -= 1;
                j -= 1;
                continue;
            }
        }
        // With j == 0 only the deletion move exists and cell(i, 0) == i keeps it optimal.
        if i > 0 && cost == cell(i - 1, j) + 1 {
            arrows.push(Arrow::pair(reference[i - 1].as_ref(), ""));
            i -= 1;
        } else {
            arrows.push(Arrow::pair("", hypothesis[j - 1].as_ref()));
            j -= 1;
        }
    }

    arrows.reverse();
    Ok(arrows)
}

/// Aligns each reference/hypothesis pair independently. Pairs are matched by
/// position, so both batches must hold the same number of utterances.
pub fn align_batch<R, H>(
    references: &[Vec<R>],
    hypotheses: &[Vec<H>],
) -> Result<Vec<Alignment>, EvalError>
where
    R: AsRef<str>,
    H: AsRef<str>,
{
    ensure_same_utterance_count(references.len(), hypotheses.len())?;
    let alignments = references
        .iter()
        .zip(hypotheses.iter())
        .map(|(reference, hypothesis)| align(reference, hypothesis))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(utterances = alignments.len(), "aligned batch");
    Ok(alignments)
}

/// Levenshtein distance between the two token sequences.
pub fn edit_distance<R, H>(reference: &[R], hypothesis: &[H]) -> usize
where
    R: AsRef<str>,
    H: AsRef<str>,
{
    let table = cost_table(reference, hypothesis);
    table[table.len() - 1]
}

pub(crate) fn ensure_same_utterance_count(
    references: usize,
    hypotheses: usize,
) -> Result<(), EvalError> {
    if references != hypotheses {
        return Err(EvalError::invalid_input(format!(
            "utterance count mismatch: {references} references vs {hypotheses} hypotheses"
        )));
    }
    Ok(())
}

fn reject_empty_tokens<S: AsRef<str>>(side: &str, sequence: &[S]) -> Result<(), EvalError> {
    if let Some(pos) = sequence.iter().position(|token| token.as_ref().is_empty()) {
        return Err(EvalError::invalid_input(format!(
            "{side} token at index {pos} is empty"
        )));
    }
    Ok(())
}

/// Row-major `(|reference|+1) x (|hypothesis|+1)` table of prefix edit costs.
fn cost_table<R, H>(reference: &[R], hypothesis: &[H]) -> Vec<usize>
where
    R: AsRef<str>,
    H: AsRef<str>,
{
    let rows = reference.len() + 1;
    let cols = hypothesis.len() + 1;
    let mut table = vec![0usize; rows * cols];

    for j in 0..cols {
        table[j] = j;
    }
    for i in 1..rows {
        let row = i * cols;
        let prev_row = (i - 1) * cols;
        table[row] = i;
        let r = reference[i - 1].as_ref();
        for j in 1..cols {
            let substitution = usize::from(r != hypothesis[j - 1].as_ref());
            table[row + j] = (table[prev_row + j - 1] + substitution) // match/substitution
                .min(table[prev_row + j] + 1) // deletion
                .min(table[row + j - 1] + 1); // insertion
        }
    }
    table
}
