use std::path::Path;

use serde::Deserialize;

use crate::error::EvalError;
use crate::types::LabelSet;

/// Inventories and thresholds for one dataset/language. Nothing here is a
/// module-level default: callers pass the inventories of their corpus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvalConfig {
    /// Phone inventory used for the phone error rate.
    #[serde(default)]
    pub phones: LabelSet,
    /// Tone inventory used for the tone error rate and tone confusion matrix.
    #[serde(default)]
    pub tones: LabelSet,
    /// Confusion rows need strictly more occurrences than this to be rendered.
    #[serde(default = "default_confusion_min_count")]
    pub confusion_min_count: usize,
}

impl EvalConfig {
    pub const DEFAULT_CONFUSION_MIN_COUNT: usize = 4;

    pub fn new(phones: LabelSet, tones: LabelSet) -> Self {
        Self {
            phones,
            tones,
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| EvalError::io("read eval config", e))?;
        serde_json::from_str(&data).map_err(|e| EvalError::json("parse eval config", e))
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            phones: LabelSet::default(),
            tones: LabelSet::default(),
            confusion_min_count: Self::DEFAULT_CONFUSION_MIN_COUNT,
        }
    }
}

fn default_confusion_min_count() -> usize {
    EvalConfig::DEFAULT_CONFUSION_MIN_COUNT
}
