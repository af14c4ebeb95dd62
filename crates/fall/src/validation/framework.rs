//! Logical frameworks: pluggable interpretations of operator validity.
//!
//! Only classical propositional logic is provided; the trait is the seam
//! through which alternative frameworks arrive from outside the core.

use serde::Serialize;

use crate::error::{FallError, Result};
use crate::logic::{EvaluationContext, Operator, Proposition};

/// Outcome of a validation: success status plus accumulated errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        ValidationResult {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

pub trait Framework {
    /// The name of this logical framework.
    fn name(&self) -> &str;

    /// Whether the proposition uses only operators this framework admits.
    fn is_compatible(&self, proposition: &Proposition) -> bool;

    /// Validate a proposition according to this framework's rules.
    fn validate(&self, proposition: &Proposition) -> ValidationResult;

    /// Evaluate a proposition under this framework's interpretation.
    fn evaluate(
        &self,
        proposition: &Proposition,
        context: &mut EvaluationContext,
    ) -> Result<bool> {
        if !self.is_compatible(proposition) {
            return Err(FallError::Incompatible {
                proposition: proposition.to_string(),
                framework: self.name().to_string(),
            });
        }
        context.evaluate(proposition)
    }
}

/// Classical propositional logic: truth-functional semantics, excluded
/// middle, non-contradiction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalFramework;

impl ClassicalFramework {
    fn classical_operator(operator: &Operator) -> bool {
        matches!(
            operator,
            Operator::Not
                | Operator::And
                | Operator::Or
                | Operator::Implies
                | Operator::Iff
                | Operator::Nand
                | Operator::Nor
                | Operator::AndN(_)
                | Operator::OrN(_)
        )
    }

    /// Does the tree contain a conjunction node carrying both `a` and `b`
    /// directly as operands?
    fn contains_conjunction(proposition: &Proposition, a: &Proposition, b: &Proposition) -> bool {
        if let Proposition::Compound {
            operator,
            components,
        } = proposition
        {
            if matches!(operator, Operator::And | Operator::AndN(_))
                && components.contains(a)
                && components.contains(b)
            {
                return true;
            }
            return components
                .iter()
                .any(|component| Self::contains_conjunction(component, a, b));
        }
        false
    }
}

impl Framework for ClassicalFramework {
    fn name(&self) -> &str {
        "classical propositional logic"
    }

    fn is_compatible(&self, proposition: &Proposition) -> bool {
        match proposition {
            Proposition::Atomic { .. } | Proposition::Numeric { .. } => true,
            Proposition::Compound {
                operator,
                components,
            } => {
                Self::classical_operator(operator)
                    && components
                        .iter()
                        .all(|component| self.is_compatible(component))
            }
        }
    }

    /// Compatibility first, then a shallow contradiction scan: for every
    /// atomic sub-proposition A, reject a conjunction node that directly
    /// combines A and ¬A. Deliberately not SAT solving.
    fn validate(&self, proposition: &Proposition) -> ValidationResult {
        let mut errors = Vec::new();

        if !self.is_compatible(proposition) {
            errors.push(
                "Proposition contains operators not supported in classical logic".to_string(),
            );
            return ValidationResult::from_errors(errors);
        }

        if matches!(proposition, Proposition::Compound { .. }) {
            for atom in proposition.atoms() {
                let negated = Proposition::Compound {
                    operator: Operator::Not,
                    components: vec![atom.clone()],
                };
                if Self::contains_conjunction(proposition, atom, &negated) {
                    errors.push(format!(
                        "Contradiction found: conjunction of {atom} and {negated}"
                    ));
                }
            }
        }

        ValidationResult::from_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(symbol: &str) -> Proposition {
        Proposition::atomic(symbol, None).unwrap()
    }

    fn not(proposition: Proposition) -> Proposition {
        Proposition::compound(Operator::Not, vec![proposition]).unwrap()
    }

    #[test]
    fn atomics_are_always_compatible() {
        let framework = ClassicalFramework;
        assert!(framework.is_compatible(&atom("p")));
        assert!(framework.is_compatible(&Proposition::numeric("x", Some(1.0)).unwrap()));
    }

    #[test]
    fn xor_and_nary_negations_are_rejected() {
        let framework = ClassicalFramework;
        let xor = Proposition::compound(Operator::Xor, vec![atom("p"), atom("q")]).unwrap();
        assert!(!framework.is_compatible(&xor));
        assert!(!framework.validate(&xor).is_valid);

        let nand3 = Proposition::compound(
            Operator::NandN(3),
            vec![atom("a"), atom("b"), atom("c")],
        )
        .unwrap();
        assert!(!framework.is_compatible(&nand3));

        // Incompatibility is found at any depth.
        let nested = Proposition::compound(Operator::And, vec![atom("p"), xor]).unwrap();
        assert!(!framework.is_compatible(&nested));
    }

    #[test]
    fn binary_nand_nor_and_nary_and_or_are_classical() {
        let framework = ClassicalFramework;
        for operator in [Operator::Nand, Operator::Nor] {
            let prop = Proposition::compound(operator, vec![atom("p"), atom("q")]).unwrap();
            assert!(framework.is_compatible(&prop), "{operator}");
        }
        let and3 =
            Proposition::compound(Operator::AndN(3), vec![atom("a"), atom("b"), atom("c")])
                .unwrap();
        assert!(framework.is_compatible(&and3));
    }

    #[test]
    fn direct_contradiction_fails_validation() {
        let framework = ClassicalFramework;
        let contradiction =
            Proposition::compound(Operator::And, vec![atom("A"), not(atom("A"))]).unwrap();
        let result = framework.validate(&contradiction);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("Contradiction found"));
    }

    #[test]
    fn contradiction_is_found_in_nested_conjunctions() {
        let framework = ClassicalFramework;
        let inner =
            Proposition::compound(Operator::And, vec![atom("A"), not(atom("A"))]).unwrap();
        let outer = Proposition::compound(Operator::Or, vec![atom("B"), inner]).unwrap();
        assert!(!framework.validate(&outer).is_valid);
    }

    #[test]
    fn non_contradictory_compound_is_valid() {
        let framework = ClassicalFramework;
        let implication =
            Proposition::compound(Operator::Implies, vec![atom("p"), atom("q")]).unwrap();
        assert!(framework.validate(&implication).is_valid);
        // A and ¬B is not a contradiction.
        let mixed =
            Proposition::compound(Operator::And, vec![atom("A"), not(atom("B"))]).unwrap();
        assert!(framework.validate(&mixed).is_valid);
    }

    #[test]
    fn evaluate_rejects_incompatible_propositions() {
        let framework = ClassicalFramework;
        let xor = Proposition::compound(Operator::Xor, vec![atom("p"), atom("q")]).unwrap();
        let mut context = EvaluationContext::default();
        assert!(matches!(
            framework.evaluate(&xor, &mut context),
            Err(FallError::Incompatible { .. })
        ));
    }
}
