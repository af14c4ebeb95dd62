//! Composable validation strategies and the validator that runs them.
//!
//! The `Validator` runs framework validation first (short-circuiting on
//! failure), then every registered strategy, accumulating all error
//! strings. Every call appends exactly one record to the append-only
//! history.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::framework::{ClassicalFramework, Framework, ValidationResult};
use crate::logic::{EvaluationContext, Proposition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationType {
    /// Structure and form.
    Syntactic,
    /// Meaning and interpretation.
    Semantic,
    /// Logical consistency.
    Logical,
    /// Framework-specific rules.
    Framework,
    /// User-defined validation.
    Custom,
}

/// One entry of the validation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRecord {
    pub source: String,
    pub proposition: String,
    pub success: bool,
    pub errors: Vec<String>,
}

/// Shared state of validation runs: options feed strategy evaluation,
/// metadata is free-form, history is append-only.
#[derive(Debug, Default)]
pub struct ValidationContext {
    pub options: HashMap<String, bool>,
    pub metadata: HashMap<String, String>,
    history: Vec<ValidationRecord>,
}

impl ValidationContext {
    pub fn record(
        &mut self,
        source: &str,
        proposition: &str,
        success: bool,
        errors: Vec<String>,
    ) {
        self.history.push(ValidationRecord {
            source: source.to_string(),
            proposition: proposition.to_string(),
            success,
            errors,
        });
    }

    pub fn history(&self) -> &[ValidationRecord] {
        &self.history
    }
}

pub trait ValidationStrategy {
    fn validation_type(&self) -> ValidationType;

    fn validate(
        &self,
        proposition: &Proposition,
        framework: &dyn Framework,
        context: &ValidationContext,
    ) -> ValidationResult;
}

/// Requires only that the proposition is representable as text — a
/// near-no-op hook kept as the extension point for richer structural
/// checks.
#[derive(Debug, Default)]
pub struct SyntacticStrategy;

impl ValidationStrategy for SyntacticStrategy {
    fn validation_type(&self) -> ValidationType {
        ValidationType::Syntactic
    }

    fn validate(
        &self,
        proposition: &Proposition,
        _framework: &dyn Framework,
        _context: &ValidationContext,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        if proposition.to_string().trim().is_empty() {
            errors.push("Syntactic Error: proposition has no textual form".to_string());
        }
        ValidationResult::from_errors(errors)
    }
}

/// Attempts evaluation under the context options and converts any
/// evaluation error into a validation failure — never a crash.
#[derive(Debug, Default)]
pub struct LogicalConsistencyStrategy;

impl ValidationStrategy for LogicalConsistencyStrategy {
    fn validation_type(&self) -> ValidationType {
        ValidationType::Logical
    }

    fn validate(
        &self,
        proposition: &Proposition,
        _framework: &dyn Framework,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut evaluation = EvaluationContext::new(context.options.clone());
        match evaluation.evaluate(proposition) {
            Ok(result) => debug!(proposition = %proposition, result, "consistency evaluation"),
            Err(error) => errors.push(format!("Evaluation Error: {error}")),
        }
        ValidationResult::from_errors(errors)
    }
}

/// Orchestrates framework validation and the registered strategies.
pub struct Validator {
    framework: Box<dyn Framework>,
    strategies: Vec<Box<dyn ValidationStrategy>>,
    context: ValidationContext,
}

impl Validator {
    pub fn new(framework: Box<dyn Framework>) -> Self {
        Validator {
            framework,
            strategies: Vec::new(),
            context: ValidationContext::default(),
        }
    }

    /// The validator used by the proof executor: classical framework with
    /// the syntactic and logical-consistency strategies.
    pub fn classical() -> Self {
        let mut validator = Validator::new(Box::new(ClassicalFramework));
        validator.add_strategy(Box::new(SyntacticStrategy));
        validator.add_strategy(Box::new(LogicalConsistencyStrategy));
        validator
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn ValidationStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn framework(&self) -> &dyn Framework {
        self.framework.as_ref()
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    pub fn validate(&mut self, proposition: &Proposition) -> ValidationResult {
        let text = proposition.to_string();

        let framework_result = self.framework.validate(proposition);
        if !framework_result.is_valid {
            self.context.record(
                "framework",
                &text,
                false,
                framework_result.errors.clone(),
            );
            return framework_result;
        }

        let mut errors = Vec::new();
        for strategy in &self.strategies {
            let result = strategy.validate(proposition, self.framework.as_ref(), &self.context);
            if !result.is_valid {
                errors.extend(result.errors);
            }
        }

        let result = ValidationResult::from_errors(errors);
        self.context
            .record("validator", &text, result.is_valid, result.errors.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Operator;

    fn atom(symbol: &str) -> Proposition {
        Proposition::atomic(symbol, None).unwrap()
    }

    fn fixed(symbol: &str, truth: bool) -> Proposition {
        Proposition::atomic(symbol, Some(truth)).unwrap()
    }

    #[test]
    fn syntactic_strategy_accepts_renderable_propositions() {
        let strategy = SyntacticStrategy;
        let context = ValidationContext::default();
        let result = strategy.validate(&atom("p"), &ClassicalFramework, &context);
        assert!(result.is_valid);
    }

    #[test]
    fn consistency_strategy_converts_evaluation_errors() {
        let strategy = LogicalConsistencyStrategy;
        let context = ValidationContext::default();
        let result = strategy.validate(&atom("p"), &ClassicalFramework, &context);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("Evaluation Error"));
        assert!(result.errors[0].contains("no truth value"));
    }

    #[test]
    fn consistency_strategy_reads_options() {
        let strategy = LogicalConsistencyStrategy;
        let mut context = ValidationContext::default();
        context.options.insert("p".into(), true);
        let result = strategy.validate(&atom("p"), &ClassicalFramework, &context);
        assert!(result.is_valid);
    }

    #[test]
    fn validator_short_circuits_on_framework_failure() {
        let mut validator = Validator::classical();
        let xor =
            Proposition::compound(Operator::Xor, vec![atom("p"), atom("q")]).unwrap();
        let result = validator.validate(&xor);
        assert!(!result.is_valid);
        // Only the framework error is reported; strategies never ran.
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("not supported in classical logic"));
    }

    #[test]
    fn validator_accumulates_strategy_errors() {
        let mut validator = Validator::classical();
        let result = validator.validate(&atom("p"));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Evaluation Error")));
    }

    #[test]
    fn validator_accepts_fixed_valid_propositions() {
        let mut validator = Validator::classical();
        let implication = Proposition::compound(
            Operator::Implies,
            vec![fixed("p", true), fixed("q", true)],
        )
        .unwrap();
        assert!(validator.validate(&implication).is_valid);
    }

    #[test]
    fn every_validate_call_appends_one_history_record() {
        let mut validator = Validator::classical();
        assert_eq!(validator.context().history().len(), 0);
        validator.validate(&fixed("p", true));
        assert_eq!(validator.context().history().len(), 1);
        let xor =
            Proposition::compound(Operator::Xor, vec![atom("p"), atom("q")]).unwrap();
        validator.validate(&xor);
        assert_eq!(validator.context().history().len(), 2);

        let record = &validator.context().history()[1];
        assert_eq!(record.source, "framework");
        assert!(!record.success);
        assert!(!record.errors.is_empty());
    }
}
