//! FALL: a small formal-logic proof language.
//!
//! Source text defines propositions, axioms, and stepwise proofs. The
//! pipeline lexes the text into tokens, parses them into an AST, and
//! executes the result against a propositional-logic type system with
//! pluggable validation:
//!
//! ```text
//! source --Lexer--> tokens --Parser--> Program --Interpreter--> transcript
//!                                         |
//!                                    ProofExecutor (stepwise inference
//!                                    checking against axioms)
//! ```
//!
//! ```
//! use fall::{Interpreter, Lexer, Parser};
//!
//! let source = "DEFINE PROPOSITION rain AS \"it is raining\" WHERE \"subject\" IS weather //\n";
//! let tokens = Lexer::new(source).scan();
//! let program = Parser::new(&tokens).parse();
//! let mut interpreter = Interpreter::new();
//! interpreter.interpret(&program);
//! assert!(interpreter.output().contains("Defined proposition: rain"));
//! ```

pub mod error;
pub mod logic;
pub mod report;
pub mod runtime;
pub mod syntax;
pub mod validation;

pub use error::{FallError, Result};

// Re-export the syntax pipeline
pub use syntax::{
    Lexer, Literal, ParseError, Parser, Program, Statement, Token, TokenKind,
};

// Re-export the proposition/operator type system
pub use logic::{EvaluationContext, EvaluationMode, Operator, Proposition};

// Re-export the validation framework
pub use validation::{
    ClassicalFramework, Framework, LogicalConsistencyStrategy, SyntacticStrategy,
    ValidationContext, ValidationResult, ValidationStrategy, Validator,
};

// Re-export the runtime
pub use runtime::{
    Environment, FallValidator, Interpreter, LogicBridge, ProofContext, ProofExecutor,
    SemanticInference, SemanticVerdict, StepRecord,
};

pub use report::{ProofReport, StepReport};
