use std::path::Path;

use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::pipeline::defaults::{AdjacentErrorClusterer, EditDistanceAligner};
use crate::pipeline::evaluator::{Evaluator, EvaluatorParts};
use crate::pipeline::traits::{ErrorClusterer, SequenceAligner};

pub struct EvaluatorBuilder {
    config: EvalConfig,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    error_clusterer: Option<Box<dyn ErrorClusterer>>,
}

impl EvaluatorBuilder {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            sequence_aligner: None,
            error_clusterer: None,
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, EvalError> {
        Ok(Self::new(EvalConfig::load(path)?))
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn with_error_clusterer(mut self, error_clusterer: Box<dyn ErrorClusterer>) -> Self {
        self.error_clusterer = Some(error_clusterer);
        self
    }

    pub fn build(self) -> Evaluator {
        if self.config.phones.is_empty() || self.config.tones.is_empty() {
            tracing::warn!(
                phones = self.config.phones.len(),
                tones = self.config.tones.len(),
                "empty inventory; the matching error rate falls back to every token"
            );
        }

        Evaluator::from_parts(EvaluatorParts {
            config: self.config,
            sequence_aligner: self
                .sequence_aligner
                .unwrap_or_else(|| Box::new(EditDistanceAligner)),
            error_clusterer: self
                .error_clusterer
                .unwrap_or_else(|| Box::new(AdjacentErrorClusterer)),
        })
    }
}
