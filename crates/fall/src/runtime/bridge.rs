//! Bridge between FALL language constructs and the core logic system.
//!
//! The bridge owns the name→proposition registry and the operator-name
//! table, and parses the raw expression text the parser captured. Each
//! `Environment` constructs its own bridge; there is no process-wide
//! registry.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{FallError, Result};
use crate::logic::{EvaluationContext, Operator, Proposition};
use crate::validation::{ClassicalFramework, Framework, ValidationResult};

/// Verdict of an injected semantic validation capability.
#[derive(Debug, Clone)]
pub struct SemanticVerdict {
    pub valid: bool,
    pub reason: String,
}

/// Boundary contract for an external semantic/NLP validation layer. When a
/// capability is present and enabled it gets the final word on inferences;
/// absent, validation is purely structural.
pub trait SemanticInference {
    fn enabled(&self) -> bool;

    fn validate_inference(
        &self,
        premises: &[Proposition],
        conclusion: &Proposition,
    ) -> SemanticVerdict;
}

pub struct LogicBridge {
    framework: Box<dyn Framework>,
    operators: IndexMap<String, Operator>,
    propositions: IndexMap<String, Proposition>,
    semantic: Option<Box<dyn SemanticInference>>,
}

impl Default for LogicBridge {
    fn default() -> Self {
        LogicBridge::new(Box::new(ClassicalFramework))
    }
}

impl LogicBridge {
    pub fn new(framework: Box<dyn Framework>) -> Self {
        let operators = IndexMap::from([
            ("AND".to_string(), Operator::And),
            ("OR".to_string(), Operator::Or),
            ("NOT".to_string(), Operator::Not),
            ("IMPLIES".to_string(), Operator::Implies),
            ("IFF".to_string(), Operator::Iff),
        ]);
        LogicBridge {
            framework,
            operators,
            propositions: IndexMap::new(),
            semantic: None,
        }
    }

    pub fn framework(&self) -> &dyn Framework {
        self.framework.as_ref()
    }

    pub fn set_semantic(&mut self, capability: Box<dyn SemanticInference>) {
        self.semantic = Some(capability);
    }

    /// Create an atomic proposition and register it. Re-creating a
    /// structurally equal proposition returns the existing instance.
    pub fn create_proposition(&mut self, name: &str, truth: Option<bool>) -> Result<Proposition> {
        let proposition = Proposition::atomic(name, truth)?;
        if let Some(existing) = self.propositions.get(name) {
            if *existing == proposition {
                return Ok(existing.clone());
            }
        }
        self.propositions
            .insert(name.to_string(), proposition.clone());
        Ok(proposition)
    }

    /// Register an existing proposition under a name, replacing any
    /// previous entry (copy-on-write: proving registers a new value, it
    /// never mutates the old one).
    pub fn register(&mut self, name: &str, proposition: Proposition) {
        self.propositions.insert(name.to_string(), proposition);
    }

    pub fn get(&self, name: &str) -> Option<&Proposition> {
        self.propositions.get(name)
    }

    pub fn propositions(&self) -> &IndexMap<String, Proposition> {
        &self.propositions
    }

    /// Build a compound from an operator name known to the bridge.
    pub fn create_compound(
        &self,
        operator_name: &str,
        components: Vec<Proposition>,
    ) -> Result<Proposition> {
        let key = operator_name.to_ascii_uppercase();
        let operator = self
            .operators
            .get(&key)
            .ok_or_else(|| FallError::Expression(format!("unknown operator: {operator_name}")))?;
        Proposition::compound(*operator, components)
    }

    /// Parse a FALL expression into a proposition.
    ///
    /// Recognized forms, in order: a single token (atomic lookup/create);
    /// `NAME IS TRUE|FALSE`; `NOT X`; `L OP R` for a known operator name
    /// (right side parsed recursively, so chains associate to the right);
    /// and a bare `AND` anywhere in a longer stream, splitting into left
    /// and right sub-expressions without precedence.
    pub fn parse_expression(&mut self, expression: &str) -> Result<Proposition> {
        debug!(expression, "parsing expression");
        let tokens: Vec<&str> = expression.split_whitespace().collect();

        if tokens.is_empty() {
            return Err(FallError::Expression("empty expression".to_string()));
        }

        if tokens.len() == 1 {
            return self.get_or_create(tokens[0]);
        }

        if tokens.len() == 3 && tokens[1].eq_ignore_ascii_case("IS") {
            let truth = match tokens[2].to_ascii_uppercase().as_str() {
                "TRUE" | "T" => Some(true),
                "FALSE" | "F" => Some(false),
                _ => None,
            };
            let proposition = Proposition::atomic(tokens[0], truth)?;
            // The new value replaces any unfixed placeholder in the registry.
            self.register(tokens[0], proposition.clone());
            debug!(expression, %proposition, "parsed IS expression");
            return Ok(proposition);
        }

        if tokens.len() == 2 && tokens[0].eq_ignore_ascii_case("NOT") {
            let inner = self.get_or_create(tokens[1])?;
            return self.create_compound("NOT", vec![inner]);
        }

        if tokens.len() >= 3 && self.known_operator(tokens[1]) {
            let left = self.get_or_create(tokens[0])?;
            let right = self.parse_expression(&tokens[2..].join(" "))?;
            return self.create_compound(tokens[1], vec![left, right]);
        }

        // Fallback for conjunctive conditions: split on the first AND.
        if let Some(index) = tokens.iter().position(|t| t.eq_ignore_ascii_case("AND")) {
            if index > 0 && index < tokens.len() - 1 {
                let left = self.parse_expression(&tokens[..index].join(" "))?;
                let right = self.parse_expression(&tokens[index + 1..].join(" "))?;
                return self.create_compound("AND", vec![left, right]);
            }
        }

        warn!(expression, "failed to parse expression");
        Err(FallError::Expression(expression.to_string()))
    }

    fn known_operator(&self, name: &str) -> bool {
        self.operators.contains_key(&name.to_ascii_uppercase())
    }

    fn get_or_create(&mut self, name: &str) -> Result<Proposition> {
        if let Some(existing) = self.propositions.get(name) {
            return Ok(existing.clone());
        }
        self.create_proposition(name, None)
    }

    /// Validate a proposition using the active framework.
    pub fn validate_proposition(&self, proposition: &Proposition) -> ValidationResult {
        self.framework.validate(proposition)
    }

    /// Evaluate a proposition with the active framework.
    pub fn evaluate(
        &self,
        proposition: &Proposition,
        values: Option<&HashMap<String, bool>>,
    ) -> Result<bool> {
        let mut context = EvaluationContext::new(values.cloned().unwrap_or_default());
        self.framework.evaluate(proposition, &mut context)
    }

    /// Validate an inference: every premise, then the conclusion, through
    /// the active framework, fail-fast on the first invalid one. An
    /// enabled semantic capability, when injected, gets the final word.
    pub fn validate_inference(
        &self,
        premises: &[Proposition],
        conclusion: &Proposition,
    ) -> bool {
        for premise in premises {
            let validation = self.validate_proposition(premise);
            debug!(premise = %premise, valid = validation.is_valid, "validated premise");
            if !validation.is_valid {
                warn!(premise = %premise, "invalid premise");
                return false;
            }
        }

        let validation = self.validate_proposition(conclusion);
        debug!(conclusion = %conclusion, valid = validation.is_valid, "validated conclusion");
        if !validation.is_valid {
            warn!(conclusion = %conclusion, "invalid conclusion");
            return false;
        }

        if let Some(semantic) = &self.semantic {
            if semantic.enabled() {
                let verdict = semantic.validate_inference(premises, conclusion);
                debug!(valid = verdict.valid, reason = %verdict.reason, "semantic verdict");
                return verdict.valid;
            }
        }

        true
    }

    /// Check whether a set of propositions is jointly consistent.
    pub fn is_consistent(&self, propositions: &[Proposition]) -> Result<bool> {
        match propositions {
            [] => Ok(true),
            [single] => Ok(self.validate_proposition(single).is_valid),
            many => {
                let operator = Operator::and_n(many.len())?;
                let compound = Proposition::compound(operator, many.to_vec())?;
                Ok(self.validate_proposition(&compound).is_valid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_creates_and_registers_an_atomic() {
        let mut bridge = LogicBridge::default();
        let p = bridge.parse_expression("p").unwrap();
        assert_eq!(p.symbol(), Some("p"));
        assert_eq!(p.truth(), None);
        assert_eq!(bridge.propositions().len(), 1);
    }

    #[test]
    fn registering_structurally_equal_atomics_returns_the_same_instance() {
        let mut bridge = LogicBridge::default();
        let first = bridge.create_proposition("p", Some(true)).unwrap();
        let second = bridge.create_proposition("p", Some(true)).unwrap();
        assert_eq!(first, second);
        assert_eq!(bridge.propositions().len(), 1);
    }

    #[test]
    fn is_expression_fixes_a_truth_value_and_replaces_the_placeholder() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", None).unwrap();
        let p = bridge.parse_expression("p IS TRUE").unwrap();
        assert_eq!(p.truth(), Some(true));
        // The registry now holds the new fixed value.
        assert_eq!(bridge.get("p").and_then(Proposition::truth), Some(true));

        let q = bridge.parse_expression("q IS FALSE").unwrap();
        assert_eq!(q.truth(), Some(false));
        let r = bridge.parse_expression("r IS maybe").unwrap();
        assert_eq!(r.truth(), None);
    }

    #[test]
    fn not_expression_builds_a_unary_compound() {
        let mut bridge = LogicBridge::default();
        let prop = bridge.parse_expression("NOT p").unwrap();
        assert_eq!(prop.to_string(), "¬p");
    }

    #[test]
    fn binary_operator_chains_associate_to_the_right() {
        let mut bridge = LogicBridge::default();
        let prop = bridge.parse_expression("p IMPLIES q IMPLIES r").unwrap();
        assert_eq!(prop.to_string(), "(p → (q → r))");
    }

    #[test]
    fn bare_and_splits_longer_streams() {
        let mut bridge = LogicBridge::default();
        // "NOT p AND NOT q" has no leading operator form, so the AND split
        // fallback applies.
        let prop = bridge.parse_expression("NOT p AND NOT q").unwrap();
        assert_eq!(prop.to_string(), "(¬p ∧ ¬q)");
    }

    #[test]
    fn unparsable_text_names_the_expression() {
        let mut bridge = LogicBridge::default();
        let error = bridge.parse_expression("p q r").unwrap_err();
        assert_eq!(error, FallError::Expression("p q r".to_string()));
        assert!(bridge.parse_expression("").is_err());
    }

    #[test]
    fn operator_names_are_case_insensitive() {
        let mut bridge = LogicBridge::default();
        let prop = bridge.parse_expression("p implies q").unwrap();
        assert_eq!(prop.to_string(), "(p → q)");
    }

    #[test]
    fn parsed_atoms_reuse_registered_propositions() {
        let mut bridge = LogicBridge::default();
        bridge.parse_expression("p IS TRUE").unwrap();
        let implication = bridge.parse_expression("p IMPLIES q").unwrap();
        // The left side is the registered fixed-true p.
        match implication {
            Proposition::Compound { components, .. } => {
                assert_eq!(components[0].truth(), Some(true));
            }
            other => panic!("expected compound, got {other:?}"),
        }
    }

    #[test]
    fn validate_inference_fails_fast_on_invalid_premise() {
        let bridge = LogicBridge::default();
        let xor = Proposition::compound(
            Operator::Xor,
            vec![
                Proposition::atomic("p", None).unwrap(),
                Proposition::atomic("q", None).unwrap(),
            ],
        )
        .unwrap();
        let conclusion = Proposition::atomic("r", Some(true)).unwrap();
        assert!(!bridge.validate_inference(&[xor], &conclusion));
        assert!(bridge.validate_inference(&[], &conclusion));
    }

    struct RejectAll;

    impl SemanticInference for RejectAll {
        fn enabled(&self) -> bool {
            true
        }

        fn validate_inference(
            &self,
            _premises: &[Proposition],
            _conclusion: &Proposition,
        ) -> SemanticVerdict {
            SemanticVerdict {
                valid: false,
                reason: "rejected".to_string(),
            }
        }
    }

    struct Disabled;

    impl SemanticInference for Disabled {
        fn enabled(&self) -> bool {
            false
        }

        fn validate_inference(
            &self,
            _premises: &[Proposition],
            _conclusion: &Proposition,
        ) -> SemanticVerdict {
            SemanticVerdict {
                valid: false,
                reason: "should never be consulted".to_string(),
            }
        }
    }

    #[test]
    fn enabled_semantic_capability_gets_the_final_word() {
        let mut bridge = LogicBridge::default();
        let conclusion = Proposition::atomic("r", Some(true)).unwrap();
        assert!(bridge.validate_inference(&[], &conclusion));
        bridge.set_semantic(Box::new(RejectAll));
        assert!(!bridge.validate_inference(&[], &conclusion));
    }

    #[test]
    fn disabled_semantic_capability_is_not_consulted() {
        let mut bridge = LogicBridge::default();
        bridge.set_semantic(Box::new(Disabled));
        let conclusion = Proposition::atomic("r", Some(true)).unwrap();
        assert!(bridge.validate_inference(&[], &conclusion));
    }

    #[test]
    fn consistency_check_conjoins_multiple_propositions() {
        let mut bridge = LogicBridge::default();
        let p = bridge.create_proposition("p", None).unwrap();
        let not_p = bridge.parse_expression("NOT p").unwrap();
        assert!(bridge.is_consistent(&[p.clone()]).unwrap());
        // p ∧ ¬p is a direct contradiction.
        assert!(!bridge.is_consistent(&[p, not_p]).unwrap());
    }
}
