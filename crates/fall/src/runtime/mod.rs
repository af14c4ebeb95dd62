//! The FALL runtime: logic bridge, definition validation, proof execution,
//! and the interpreter that drives them from the AST.

pub mod bridge;
pub mod executor;
pub mod interpreter;
pub mod validator;

pub use bridge::{LogicBridge, SemanticInference, SemanticVerdict};
pub use executor::{ProofContext, ProofExecutor, StepRecord};
pub use interpreter::{Environment, Interpreter};
pub use validator::FallValidator;
