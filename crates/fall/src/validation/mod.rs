//! The classical-logic validation framework and composable strategies.

pub mod framework;
pub mod strategy;

pub use framework::{ClassicalFramework, Framework, ValidationResult};
pub use strategy::{
    LogicalConsistencyStrategy, SyntacticStrategy, ValidationContext, ValidationRecord,
    ValidationStrategy, ValidationType, Validator,
};
