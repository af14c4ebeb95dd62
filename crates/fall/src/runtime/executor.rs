//! Stepwise proof execution: the central state machine.
//!
//! `execute_proof` resolves every given before any step runs, executes the
//! steps in file order, and returns `(success, context)` with the full
//! per-step history instead of erroring — callers decide how much of the
//! diagnostics to surface. Any step failure short-circuits the remaining
//! steps; earlier derivations are not rolled back.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::bridge::LogicBridge;
use crate::logic::{Operator, Proposition};
use crate::syntax::ast::{AxiomDefinition, Proof, ProofStep, StepAction};
use crate::validation::Validator;

/// One entry of a proof run's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: u32,
    pub action: String,
    pub result: bool,
    pub error: Option<String>,
}

/// Per-execution mutable state of one proof run.
#[derive(Default)]
pub struct ProofContext {
    pub givens: IndexMap<String, Proposition>,
    pub derived: IndexMap<String, Proposition>,
    pub axioms: IndexMap<String, AxiomDefinition>,
    pub steps: BTreeMap<u32, Proposition>,
    history: Vec<StepRecord>,
}

impl ProofContext {
    pub fn record(&mut self, step: u32, action: String, result: bool, error: Option<String>) {
        self.history.push(StepRecord {
            step,
            action,
            result,
            error,
        });
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }
}

/// Executes FALL proofs by checking each step against the axioms.
pub struct ProofExecutor {
    validator: Validator,
}

impl Default for ProofExecutor {
    fn default() -> Self {
        ProofExecutor::new()
    }
}

impl ProofExecutor {
    pub fn new() -> Self {
        ProofExecutor {
            validator: Validator::classical(),
        }
    }

    /// Validation history accumulated across proof runs.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Execute a proof and determine whether it establishes its target.
    pub fn execute_proof(
        &mut self,
        bridge: &mut LogicBridge,
        proof: &Proof,
        axioms: &IndexMap<String, AxiomDefinition>,
    ) -> (bool, ProofContext) {
        let mut context = ProofContext {
            axioms: axioms.clone(),
            ..Default::default()
        };

        // Every given must resolve before any step runs.
        for name in &proof.given {
            match bridge.get(name) {
                Some(proposition) => {
                    debug!(given = %name, proposition = %proposition, "registered given");
                    context.givens.insert(name.clone(), proposition.clone());
                }
                None => {
                    warn!(given = %name, "given proposition not found");
                    context.record(
                        0,
                        format!("SETUP:{name}"),
                        false,
                        Some("Proposition not found".to_string()),
                    );
                    return (false, context);
                }
            }
        }

        for step in &proof.steps {
            if !self.execute_step(bridge, step, &mut context) {
                warn!(step = step.number, "step failed, aborting proof");
                return (false, context);
            }
        }

        let conclusion_step = proof.steps.len() as u32 + 1;

        // Accepted iff the target was derived, some step carries its
        // symbol, or a registered proposition of that name is fixed-true.
        if context.derived.contains_key(&proof.prove) {
            info!(prove = %proof.prove, "proof succeeded (derived)");
            context.record(conclusion_step, format!("CONCLUSION:{}", proof.prove), true, None);
            return (true, context);
        }

        if context
            .steps
            .values()
            .any(|p| p.symbol() == Some(proof.prove.as_str()))
        {
            info!(prove = %proof.prove, "proof succeeded (matched by step symbol)");
            context.record(conclusion_step, format!("CONCLUSION:{}", proof.prove), true, None);
            return (true, context);
        }

        if bridge.get(&proof.prove).and_then(Proposition::truth) == Some(true) {
            info!(prove = %proof.prove, "proof succeeded (registered with truth value)");
            context.record(conclusion_step, format!("CONCLUSION:{}", proof.prove), true, None);
            return (true, context);
        }

        warn!(prove = %proof.prove, "proof failed: target not derived");
        context.record(
            conclusion_step,
            format!("CONCLUSION:{}", proof.prove),
            false,
            Some("Target not derived".to_string()),
        );
        (false, context)
    }

    fn execute_step(
        &mut self,
        bridge: &mut LogicBridge,
        step: &ProofStep,
        context: &mut ProofContext,
    ) -> bool {
        match &step.action {
            StepAction::Assert(expression) => {
                self.execute_assert(bridge, step, expression, context)
            }
            StepAction::Infer(name) => self.execute_infer(bridge, step, name, context),
        }
    }

    fn execute_assert(
        &mut self,
        bridge: &mut LogicBridge,
        step: &ProofStep,
        expression: &str,
        context: &mut ProofContext,
    ) -> bool {
        match bridge.parse_expression(expression) {
            Ok(proposition) => {
                debug!(step = step.number, proposition = %proposition, "asserted");
                context.steps.insert(step.number, proposition);
                context.record(step.number, format!("ASSERT:{expression}"), true, None);
                true
            }
            Err(error) => {
                context.record(
                    step.number,
                    format!("ASSERT:{expression}"),
                    false,
                    Some(error.to_string()),
                );
                false
            }
        }
    }

    fn execute_infer(
        &mut self,
        bridge: &mut LogicBridge,
        step: &ProofStep,
        name: &str,
        context: &mut ProofContext,
    ) -> bool {
        let action = format!("INFER:{name}");
        debug!(
            step = step.number,
            name,
            sources = ?step.sources,
            via = ?step.via,
            "executing inference"
        );

        if step.sources.is_empty() {
            context.record(
                step.number,
                action,
                false,
                Some("No sources specified".to_string()),
            );
            return false;
        }

        // Sources resolve against givens, then step references, then
        // derived conclusions, in that order.
        let mut sources = Vec::new();
        for source in &step.sources {
            if let Some(proposition) = context.givens.get(source) {
                sources.push(proposition.clone());
                continue;
            }
            if let Some(number) = source
                .strip_prefix("step")
                .and_then(|rest| rest.parse::<u32>().ok())
            {
                if let Some(proposition) = context.steps.get(&number) {
                    sources.push(proposition.clone());
                    continue;
                }
            }
            if let Some(proposition) = context.derived.get(source) {
                sources.push(proposition.clone());
                continue;
            }
            context.record(
                step.number,
                action,
                false,
                Some(format!("Source not found: {source}")),
            );
            return false;
        }

        let Some(via) = step.via.as_deref() else {
            context.record(
                step.number,
                action,
                false,
                Some("No axiom specified".to_string()),
            );
            return false;
        };
        if !context.axioms.contains_key(via) {
            context.record(
                step.number,
                action,
                false,
                Some(format!("Axiom not found: {via}")),
            );
            return false;
        }

        let conclusion = match Proposition::atomic(name, Some(true)) {
            Ok(conclusion) => conclusion,
            Err(error) => {
                context.record(step.number, action, false, Some(error.to_string()));
                return false;
            }
        };

        // Framework validation of premises and conclusion, plus the
        // injected semantic capability when one is present.
        if !bridge.validate_inference(&sources, &conclusion) {
            context.record(
                step.number,
                action,
                false,
                Some("Inference rejected by the logic bridge".to_string()),
            );
            return false;
        }

        // A single source is its own premise set; several sources form an
        // n-ary conjunction.
        let premises = if sources.len() == 1 {
            sources[0].clone()
        } else {
            let conjunction = Operator::and_n(sources.len())
                .and_then(|operator| Proposition::compound(operator, sources.clone()));
            match conjunction {
                Ok(premises) => premises,
                Err(error) => {
                    context.record(step.number, action, false, Some(error.to_string()));
                    return false;
                }
            }
        };

        let implication = Proposition::Compound {
            operator: Operator::Implies,
            components: vec![premises.clone(), conclusion.clone()],
        };
        debug!(premises = %premises, conclusion = %conclusion, "validating implication");
        let validation = self.validator.validate(&implication);
        if !validation.is_valid {
            warn!(step = step.number, errors = ?validation.errors, "inference failed");
            context.record(
                step.number,
                action,
                false,
                Some(validation.errors.join("; ")),
            );
            return false;
        }

        // The implication alone cannot reject a false premise, so the
        // premises must also actually hold.
        match premises.evaluate_fixed() {
            Ok(true) => {}
            Ok(false) => {
                context.record(
                    step.number,
                    action,
                    false,
                    Some(format!("Premises evaluate to false: {premises}")),
                );
                return false;
            }
            Err(error) => {
                context.record(step.number, action, false, Some(error.to_string()));
                return false;
            }
        }

        info!(step = step.number, name, via, "inference valid");
        context.steps.insert(step.number, conclusion.clone());
        context.derived.insert(name.to_string(), conclusion.clone());
        bridge.register(name, conclusion);
        context.record(step.number, format!("INFER:{name} VIA:{via}"), true, None);
        true
    }

    /// Extract an axiom's preconditions as propositions, skipping any that
    /// fail to parse.
    pub fn axiom_preconditions(
        &self,
        bridge: &mut LogicBridge,
        axiom: &AxiomDefinition,
    ) -> Vec<Proposition> {
        let mut preconditions = Vec::new();
        for condition in &axiom.conditions {
            match bridge.parse_expression(&condition.expression) {
                Ok(proposition) => preconditions.push(proposition),
                Err(error) => {
                    warn!(
                        axiom = %axiom.name,
                        condition = %condition.expression,
                        %error,
                        "failed to parse axiom condition"
                    );
                }
            }
        }
        preconditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::Condition;

    fn modus_ponens() -> IndexMap<String, AxiomDefinition> {
        IndexMap::from([(
            "ModusPonens".to_string(),
            AxiomDefinition {
                name: "ModusPonens".to_string(),
                conditions: vec![Condition {
                    expression: "p IMPLIES q".to_string(),
                }],
            },
        )])
    }

    fn infer_step(number: u32, name: &str, sources: &[&str], via: Option<&str>) -> ProofStep {
        ProofStep {
            number,
            action: StepAction::Infer(name.to_string()),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            via: via.map(|s| s.to_string()),
        }
    }

    fn assert_step(number: u32, expression: &str) -> ProofStep {
        ProofStep {
            number,
            action: StepAction::Assert(expression.to_string()),
            sources: vec![],
            via: None,
        }
    }

    fn proof(given: &[&str], prove: &str, steps: Vec<ProofStep>) -> Proof {
        Proof {
            given: given.iter().map(|s| s.to_string()).collect(),
            prove: prove.to_string(),
            using: vec!["ModusPonens".to_string()],
            steps,
        }
    }

    #[test]
    fn modus_ponens_proof_succeeds_with_true_given() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(true)).unwrap();
        let mut executor = ProofExecutor::new();

        let proof = proof(
            &["p"],
            "q",
            vec![
                assert_step(1, "p IMPLIES q"),
                infer_step(2, "q", &["p"], Some("ModusPonens")),
            ],
        );
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        assert!(success, "history: {:?}", context.history());
        assert_eq!(
            context.derived.get("q").and_then(Proposition::truth),
            Some(true)
        );
        // The conclusion propagates into the bridge registry.
        assert_eq!(bridge.get("q").and_then(Proposition::truth), Some(true));
        assert!(context.history().iter().all(|r| r.error.is_none()));
    }

    #[test]
    fn modus_ponens_proof_fails_with_false_given() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(false)).unwrap();
        let mut executor = ProofExecutor::new();

        let proof = proof(
            &["p"],
            "q",
            vec![
                assert_step(1, "p IMPLIES q"),
                infer_step(2, "q", &["p"], Some("ModusPonens")),
            ],
        );
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        assert!(!success);
        let failed = context
            .history()
            .iter()
            .find(|record| record.step == 2)
            .expect("step 2 must be recorded");
        assert!(!failed.result);
        assert!(failed.error.as_deref().unwrap_or_default().len() > 0);
        assert!(!context.derived.contains_key("q"));
    }

    #[test]
    fn unresolved_given_aborts_before_any_step() {
        let mut bridge = LogicBridge::default();
        let mut executor = ProofExecutor::new();
        let proof = proof(&["ghost"], "q", vec![assert_step(1, "p IMPLIES q")]);
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        assert!(!success);
        assert_eq!(context.history().len(), 1);
        assert_eq!(context.history()[0].action, "SETUP:ghost");
        assert!(context.steps.is_empty());
    }

    #[test]
    fn unresolved_source_fails_the_step() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(true)).unwrap();
        let mut executor = ProofExecutor::new();
        let proof = proof(
            &["p"],
            "q",
            vec![infer_step(1, "q", &["missing"], Some("ModusPonens"))],
        );
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        assert!(!success);
        assert_eq!(
            context.history()[0].error.as_deref(),
            Some("Source not found: missing")
        );
    }

    #[test]
    fn unknown_axiom_fails_the_step() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(true)).unwrap();
        let mut executor = ProofExecutor::new();
        let proof = proof(&["p"], "q", vec![infer_step(1, "q", &["p"], Some("Ghost"))]);
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        assert!(!success);
        assert_eq!(
            context.history()[0].error.as_deref(),
            Some("Axiom not found: Ghost")
        );
    }

    #[test]
    fn inference_without_axiom_clause_fails() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(true)).unwrap();
        let mut executor = ProofExecutor::new();
        let proof = proof(&["p"], "q", vec![infer_step(1, "q", &["p"], None)]);
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        assert!(!success);
        assert_eq!(
            context.history()[0].error.as_deref(),
            Some("No axiom specified")
        );
    }

    #[test]
    fn sources_resolve_against_step_references() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(true)).unwrap();
        let mut executor = ProofExecutor::new();

        let proof = proof(
            &["p"],
            "r",
            vec![
                assert_step(1, "p IS TRUE"),
                infer_step(2, "r", &["p", "step1"], Some("ModusPonens")),
            ],
        );
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());
        assert!(success, "history: {:?}", context.history());
        // Two sources form an n-ary conjunction that must evaluate true.
        assert!(context.derived.contains_key("r"));
    }

    #[test]
    fn failed_assert_aborts_without_rollback() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("p", Some(true)).unwrap();
        let mut executor = ProofExecutor::new();

        let proof = proof(
            &["p"],
            "q",
            vec![
                infer_step(1, "q", &["p"], Some("ModusPonens")),
                assert_step(2, "this is not an expression at all"),
                assert_step(3, "never reached"),
            ],
        );
        let (success, context) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());

        // Step 1 derived q, so the proof state keeps it even though the
        // run as a whole failed on step 2.
        assert!(!success);
        assert!(context.derived.contains_key("q"));
        assert_eq!(context.history().len(), 2);
        assert!(context.history()[1].error.is_some());
    }

    #[test]
    fn proof_accepted_when_step_symbol_matches_target() {
        let mut bridge = LogicBridge::default();
        bridge.create_proposition("q", None).unwrap();
        let mut executor = ProofExecutor::new();

        // No INFER derives q by name, but an assert step carries it.
        let proof = proof(&[], "q", vec![assert_step(1, "q")]);
        let (success, _) = executor.execute_proof(&mut bridge, &proof, &modus_ponens());
        assert!(success);
    }

    #[test]
    fn axiom_preconditions_parse_through_the_bridge() {
        let mut bridge = LogicBridge::default();
        let executor = ProofExecutor::new();
        let axiom = AxiomDefinition {
            name: "A".to_string(),
            conditions: vec![
                Condition {
                    expression: "p IMPLIES q".to_string(),
                },
                Condition {
                    expression: "not parseable at all".to_string(),
                },
            ],
        };
        let preconditions = executor.axiom_preconditions(&mut bridge, &axiom);
        assert_eq!(preconditions.len(), 1);
        assert_eq!(preconditions[0].to_string(), "(p → q)");
    }
}
