//! Error types for the FALL core.
//!
//! Recoverable conditions (unparsable expressions, missing truth values,
//! failed validation) travel through `Result`; the arity and empty-symbol
//! variants are construction-time invariant violations that well-formed
//! proof-language input never reaches.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallError {
    #[error("cannot parse expression: {0}")]
    Expression(String),

    #[error("operator {operator} requires exactly {expected} operands, got {actual}")]
    Arity {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("n-ary operators require arity >= 2, got {0}")]
    NaryArity(usize),

    #[error("proposition symbol cannot be empty")]
    EmptySymbol,

    #[error("no truth value available for proposition: {0}")]
    MissingTruthValue(String),

    #[error("cannot operate on undefined numeric value: {0}")]
    UndefinedValue(String),

    #[error("expected a numeric proposition: {0}")]
    NotNumeric(String),

    #[error("proposition {proposition} is not compatible with the {framework} framework")]
    Incompatible {
        proposition: String,
        framework: String,
    },

    #[error("proof error: {0}")]
    Proof(String),
}

pub type Result<T> = std::result::Result<T, FallError>;
