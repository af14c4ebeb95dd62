//! Definition-level validation of FALL language constructs.
//!
//! These are the structural checks the interpreter applies before storing
//! a definition: nothing invalid is ever stored, and every check appends
//! one record to this validator's own append-only history.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::bridge::LogicBridge;
use crate::syntax::ast::{
    Assertion, AxiomDefinition, Proof, PropositionDefinition, RuleDefinition, StepAction,
};
use crate::validation::{ValidationRecord, ValidationResult};

/// Validation state for FALL constructs: the known rule and axiom tables
/// that proof validation resolves against, plus the append-only history.
#[derive(Default)]
pub struct FallValidationContext {
    pub rules: IndexMap<String, RuleDefinition>,
    pub axioms: IndexMap<String, AxiomDefinition>,
    history: Vec<ValidationRecord>,
}

impl FallValidationContext {
    fn record(&mut self, source: String, success: bool, errors: Vec<String>) {
        self.history.push(ValidationRecord {
            source,
            proposition: String::new(),
            success,
            errors,
        });
    }

    pub fn history(&self) -> &[ValidationRecord] {
        &self.history
    }
}

#[derive(Default)]
pub struct FallValidator {
    context: FallValidationContext,
}

impl FallValidator {
    pub fn new() -> Self {
        FallValidator::default()
    }

    pub fn context(&self) -> &FallValidationContext {
        &self.context
    }

    /// Make an axiom resolvable by later proof validation.
    pub fn register_axiom(&mut self, name: &str, axiom: AxiomDefinition) {
        self.context.axioms.insert(name.to_string(), axiom);
    }

    pub fn register_rule(&mut self, name: &str, rule: RuleDefinition) {
        self.context.rules.insert(name.to_string(), rule);
    }

    pub fn validate_rule(&mut self, rule: &RuleDefinition) -> ValidationResult {
        let mut errors = Vec::new();

        if !valid_name(&rule.name) {
            errors.push(format!("Invalid rule name: {}", rule.name));
        }
        if rule.conditions.is_empty() {
            errors.push("Rule must have at least one condition".to_string());
        }

        let result = ValidationResult::from_errors(errors);
        self.context.record(
            format!("rule:{}", rule.name),
            result.is_valid,
            result.errors.clone(),
        );
        result
    }

    pub fn validate_axiom(
        &mut self,
        bridge: &mut LogicBridge,
        axiom: &AxiomDefinition,
    ) -> ValidationResult {
        let mut errors = Vec::new();

        if !valid_name(&axiom.name) {
            errors.push(format!("Invalid axiom name: {}", axiom.name));
        }
        if axiom.conditions.is_empty() {
            errors.push("Axiom must have at least one condition".to_string());
        }

        for condition in &axiom.conditions {
            match bridge.parse_expression(&condition.expression) {
                Ok(proposition) => {
                    let validation = bridge.validate_proposition(&proposition);
                    if !validation.is_valid {
                        errors.extend(validation.errors);
                    }
                }
                Err(error) => errors.push(format!("Condition error: {error}")),
            }
        }

        let result = ValidationResult::from_errors(errors);
        info!(axiom = %axiom.name, valid = result.is_valid, "validated axiom");
        self.context.record(
            format!("axiom:{}", axiom.name),
            result.is_valid,
            result.errors.clone(),
        );
        result
    }

    pub fn validate_proposition(
        &mut self,
        bridge: &mut LogicBridge,
        definition: &PropositionDefinition,
    ) -> ValidationResult {
        debug!(proposition = %definition.name, "validating proposition definition");
        let mut errors = Vec::new();

        if !valid_name(&definition.name) {
            errors.push(format!("Invalid proposition name: {}", definition.name));
        }
        if definition.text.is_empty() {
            errors.push("Proposition text cannot be empty".to_string());
        }
        for (key, value) in &definition.structure {
            if key.is_empty() || value.is_empty() {
                errors.push(format!("Invalid structure element: {key} = {value}"));
            }
        }

        // Only a structurally sound definition reaches the registry.
        if errors.is_empty() {
            match bridge.create_proposition(&definition.name, None) {
                Ok(proposition) => {
                    let validation = bridge.validate_proposition(&proposition);
                    if !validation.is_valid {
                        errors.extend(validation.errors);
                    }
                }
                Err(error) => errors.push(format!("Logic error: {error}")),
            }
        }

        let result = ValidationResult::from_errors(errors);
        info!(
            proposition = %definition.name,
            valid = result.is_valid,
            "proposition validation result"
        );
        self.context.record(
            format!("proposition:{}", definition.name),
            result.is_valid,
            result.errors.clone(),
        );
        result
    }

    pub fn validate_assertion(
        &mut self,
        bridge: &mut LogicBridge,
        assertion: &Assertion,
    ) -> ValidationResult {
        let mut errors = Vec::new();

        if assertion.expression.is_empty() {
            errors.push("Assertion expression cannot be empty".to_string());
        } else {
            match bridge.parse_expression(&assertion.expression) {
                Ok(proposition) => {
                    let validation = bridge.validate_proposition(&proposition);
                    if !validation.is_valid {
                        errors.extend(validation.errors);
                    }
                }
                Err(error) => errors.push(format!("Expression error: {error}")),
            }
        }

        let result = ValidationResult::from_errors(errors);
        self.context.record(
            format!("assertion:{}", assertion.expression),
            result.is_valid,
            result.errors.clone(),
        );
        result
    }

    pub fn validate_proof(&mut self, bridge: &mut LogicBridge, proof: &Proof) -> ValidationResult {
        let mut errors = Vec::new();

        for name in &proof.given {
            if bridge.get(name).is_none() {
                errors.push(format!("Unknown given proposition: {name}"));
            }
        }

        if bridge.get(&proof.prove).is_none() {
            errors.push(format!("Unknown proposition to prove: {}", proof.prove));
        }

        for axiom in &proof.using {
            if !self.context.axioms.contains_key(axiom) {
                errors.push(format!("Unknown axiom: {axiom}"));
            }
        }

        for step in &proof.steps {
            match &step.action {
                StepAction::Assert(expression) => {
                    if let Err(error) = bridge.parse_expression(expression) {
                        errors.push(format!("Step {} error: {error}", step.number));
                    }
                }
                StepAction::Infer(_) => {
                    if step.sources.is_empty() {
                        errors.push(format!("Step {} has no source", step.number));
                    }
                    match &step.via {
                        None => errors.push(format!("Step {} has no axiom", step.number)),
                        Some(via) => {
                            if !self.context.axioms.contains_key(via) {
                                errors.push(format!(
                                    "Step {} uses unknown axiom: {via}",
                                    step.number
                                ));
                            }
                        }
                    }
                }
            }
        }

        let result = ValidationResult::from_errors(errors);
        self.context.record(
            format!("proof:{}", proof.prove),
            result.is_valid,
            result.errors.clone(),
        );
        result
    }
}

/// Names are non-empty and alphanumeric; underscores are allowed because
/// the lexer produces them in identifiers.
fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}
