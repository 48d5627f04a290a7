use crate::error::EvalError;
use crate::types::{Alignment, Arrow, ErrorCluster};

pub trait SequenceAligner: Send + Sync {
    fn align(&self, reference: &[String], hypothesis: &[String]) -> Result<Alignment, EvalError>;
}

pub trait ErrorClusterer: Send + Sync {
    fn cluster(&self, alignment: &[Arrow]) -> Vec<ErrorCluster>;
}
