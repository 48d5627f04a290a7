pub mod builder;
pub mod defaults;
pub mod evaluator;
pub mod traits;
