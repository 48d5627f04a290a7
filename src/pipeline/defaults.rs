use crate::alignment::clustering::cluster_errors;
use crate::alignment::edit_distance::align;
use crate::error::EvalError;
use crate::pipeline::traits::{ErrorClusterer, SequenceAligner};
use crate::types::{Alignment, Arrow, ErrorCluster};

pub struct EditDistanceAligner;

impl SequenceAligner for EditDistanceAligner {
    fn align(&self, reference: &[String], hypothesis: &[String]) -> Result<Alignment, EvalError> {
        align(reference, hypothesis)
    }
}

pub struct AdjacentErrorClusterer;

impl ErrorClusterer for AdjacentErrorClusterer {
    fn cluster(&self, alignment: &[Arrow]) -> Vec<ErrorCluster> {
        cluster_errors(alignment)
    }
}
