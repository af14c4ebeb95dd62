//! The proposition/operator type system and the evaluation engine.

pub mod evaluation;
pub mod operator;
pub mod proposition;

pub use evaluation::{EvaluationContext, EvaluationMode};
pub use operator::Operator;
pub use proposition::Proposition;
