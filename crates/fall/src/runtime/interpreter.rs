//! The FALL interpreter: a visitor over the AST driving an environment.
//!
//! Invalid definitions are dropped with an explanatory transcript line —
//! never fatal. Assertion evaluation errors become transcript text. The
//! transcript is the interface: `output()` drains and clears it.

use indexmap::IndexMap;
use tracing::debug;

use super::bridge::LogicBridge;
use super::executor::ProofExecutor;
use super::validator::FallValidator;
use crate::error::FallError;
use crate::logic::{EvaluationContext, EvaluationMode, Proposition};
use crate::report::ProofReport;
use crate::syntax::ast::{
    Assertion, AxiomDefinition, Program, Proof, PropositionDefinition, Query, RuleDefinition,
    Statement,
};

/// Storage for definitions and execution state of one FALL session.
pub struct Environment {
    pub bridge: LogicBridge,
    validator: FallValidator,
    executor: ProofExecutor,
    pub rules: IndexMap<String, RuleDefinition>,
    pub axioms: IndexMap<String, AxiomDefinition>,
    pub propositions: IndexMap<String, PropositionDefinition>,
    pub assertions: Vec<Assertion>,
    pub proofs: Vec<Proof>,
    pub reports: Vec<ProofReport>,
    evaluation_mode: EvaluationMode,
    output: Vec<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bridge: LogicBridge::default(),
            validator: FallValidator::new(),
            executor: ProofExecutor::new(),
            rules: IndexMap::new(),
            axioms: IndexMap::new(),
            propositions: IndexMap::new(),
            assertions: Vec::new(),
            proofs: Vec::new(),
            reports: Vec::new(),
            evaluation_mode: EvaluationMode::Strict,
            output: Vec::new(),
        }
    }

    /// Use the given missing-value policy when evaluating assertions.
    pub fn with_evaluation_mode(mode: EvaluationMode) -> Self {
        Environment {
            evaluation_mode: mode,
            ..Environment::new()
        }
    }

    fn push(&mut self, line: String) {
        self.output.push(line);
    }

    pub fn define_rule(&mut self, rule: &RuleDefinition) {
        let validation = self.validator.validate_rule(rule);
        if validation.is_valid {
            self.rules.insert(rule.name.clone(), rule.clone());
            self.validator.register_rule(&rule.name, rule.clone());
            self.push(format!("Defined rule: {}", rule.name));
        } else {
            self.push(format!(
                "Invalid rule {}: {}",
                rule.name,
                validation.errors.join("; ")
            ));
        }
    }

    pub fn define_axiom(&mut self, axiom: &AxiomDefinition) {
        let validation = self.validator.validate_axiom(&mut self.bridge, axiom);
        if validation.is_valid {
            self.axioms.insert(axiom.name.clone(), axiom.clone());
            self.validator.register_axiom(&axiom.name, axiom.clone());
            self.push(format!("Defined axiom: {}", axiom.name));
        } else {
            self.push(format!(
                "Invalid axiom {}: {}",
                axiom.name,
                validation.errors.join("; ")
            ));
        }
    }

    pub fn define_proposition(&mut self, definition: &PropositionDefinition) {
        let validation = self
            .validator
            .validate_proposition(&mut self.bridge, definition);
        if validation.is_valid {
            self.propositions
                .insert(definition.name.clone(), definition.clone());
            if let Err(error) = self.bridge.create_proposition(&definition.name, None) {
                self.push(format!(
                    "Invalid proposition {}: {error}",
                    definition.name
                ));
                return;
            }
            self.push(format!(
                "Defined proposition: {} as '{}'",
                definition.name, definition.text
            ));
        } else {
            self.push(format!(
                "Invalid proposition {}: {}",
                definition.name,
                validation.errors.join("; ")
            ));
        }
    }

    pub fn add_assertion(&mut self, assertion: &Assertion) {
        let validation = self.validator.validate_assertion(&mut self.bridge, assertion);
        if !validation.is_valid {
            self.push(format!(
                "Invalid assertion: {}",
                validation.errors.join("; ")
            ));
            return;
        }

        self.assertions.push(assertion.clone());
        self.push(format!("Asserted: {}", assertion.expression));

        let parsed = self.bridge.parse_expression(&assertion.expression);
        let evaluation = parsed.and_then(|proposition| {
            let mut context =
                EvaluationContext::with_mode(Default::default(), self.evaluation_mode);
            self.bridge.framework().evaluate(&proposition, &mut context)
        });
        match evaluation {
            Ok(result) => self.push(format!("Evaluation: {result}")),
            Err(error) => self.push(format!("Evaluation error: {error}")),
        }
    }

    pub fn execute_proof(&mut self, proof: &Proof) {
        let validation = self.validator.validate_proof(&mut self.bridge, proof);
        if !validation.is_valid {
            self.push(format!("Invalid proof: {}", validation.errors.join("; ")));
            return;
        }

        self.push(format!(
            "Validating proof from {} to {} using {}",
            proof.given.join(", "),
            proof.prove,
            proof.using.join(", ")
        ));

        let (success, context) =
            self.executor
                .execute_proof(&mut self.bridge, proof, &self.axioms);

        if success {
            self.push(format!("Proof succeeded! Established: {}", proof.prove));
            self.proofs.push(proof.clone());
        } else {
            self.push("Proof failed. Check the steps and logic.".to_string());
        }

        for entry in context.history() {
            match &entry.error {
                Some(error) => self.push(format!(
                    "Step {}: {} - FAILED: {error}",
                    entry.step, entry.action
                )),
                None => self.push(format!("Step {}: {} - SUCCESS", entry.step, entry.action)),
            }
        }

        self.reports
            .push(ProofReport::from_run(proof, success, &context));
    }

    pub fn resolve_query(&mut self, query: &Query) -> Option<bool> {
        let name = &query.proposition;
        debug!(proposition = %name, "resolving query");

        if self.propositions.contains_key(name) {
            self.push(format!("Proposition {name} exists"));

            if let Some(proposition) = self.bridge.get(name).cloned() {
                match proposition.evaluate_fixed() {
                    Ok(result) => {
                        self.push(format!("Evaluation: {result}"));
                        return Some(result);
                    }
                    Err(FallError::MissingTruthValue(_)) => {
                        // The proposition exists but carries no truth value;
                        // a completed proof can still settle it.
                        if self.proofs.iter().any(|proof| &proof.prove == name) {
                            self.push(format!("Proposition {name} was established by proof"));
                            // Proving produces a new fixed-true value in the
                            // registry; the old placeholder is replaced, not
                            // mutated.
                            if let Ok(proved) = Proposition::atomic(name, Some(true)) {
                                self.bridge.register(name, proved);
                            }
                            self.push("Evaluation after proof: true".to_string());
                            return Some(true);
                        }
                        self.push(format!("Cannot evaluate: no truth value for {name}"));
                    }
                    Err(error) => {
                        self.push(format!("Error during evaluation: {error}"));
                    }
                }
            }
            return None;
        }

        if self.proofs.iter().any(|proof| &proof.prove == name) {
            self.push(format!("Proposition {name} is proven"));
            return Some(true);
        }

        // A proposition derived through the bridge without a definition.
        if let Some(proposition) = self.bridge.get(name).cloned() {
            if let Ok(value) = proposition.evaluate_fixed() {
                self.push(format!("Proposition {name} was derived with value: {value}"));
                return Some(value);
            }
        }

        self.push(format!("Unknown proposition: {name}"));
        Some(false)
    }

    /// Drain the accumulated transcript.
    pub fn output(&mut self) -> String {
        let result = self.output.join("\n");
        self.output.clear();
        result
    }
}

/// FALL language interpreter: visits each statement of a program.
pub struct Interpreter {
    pub environment: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            environment: Environment::new(),
        }
    }

    pub fn with_environment(environment: Environment) -> Self {
        Interpreter { environment }
    }

    pub fn interpret(&mut self, program: &Program) {
        for statement in &program.statements {
            self.execute(statement);
        }
    }

    fn execute(&mut self, statement: &Statement) {
        match statement {
            Statement::Rule(rule) => self.visit_rule(rule),
            Statement::Axiom(axiom) => self.visit_axiom(axiom),
            Statement::Proposition(definition) => self.visit_proposition(definition),
            Statement::Assertion(assertion) => self.visit_assertion(assertion),
            Statement::Proof(proof) => self.visit_proof(proof),
            Statement::Query(query) => self.visit_query(query),
        }
    }

    fn visit_rule(&mut self, rule: &RuleDefinition) {
        self.environment.define_rule(rule);
    }

    fn visit_axiom(&mut self, axiom: &AxiomDefinition) {
        self.environment.define_axiom(axiom);
    }

    fn visit_proposition(&mut self, definition: &PropositionDefinition) {
        self.environment.define_proposition(definition);
    }

    fn visit_assertion(&mut self, assertion: &Assertion) {
        self.environment.add_assertion(assertion);
    }

    fn visit_proof(&mut self, proof: &Proof) {
        self.environment.execute_proof(proof);
    }

    fn visit_query(&mut self, query: &Query) {
        self.environment.resolve_query(query);
    }

    /// Drain the environment transcript.
    pub fn output(&mut self) -> String {
        self.environment.output()
    }
}
