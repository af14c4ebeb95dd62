//! Abstract syntax tree for FALL programs.
//!
//! Statements form a closed variant set. Expression positions hold raw
//! source text rather than a sub-tree: expression semantics are resolved
//! later, textually, by the logic bridge (a deliberate two-phase design).

use indexmap::IndexMap;
use serde::Serialize;

/// The root node of a FALL program.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Rule(RuleDefinition),
    Axiom(AxiomDefinition),
    Proposition(PropositionDefinition),
    Assertion(Assertion),
    Proof(Proof),
    Query(Query),
}

/// A condition in a rule or axiom definition, kept as raw expression text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDefinition {
    pub name: String,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxiomDefinition {
    pub name: String,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropositionDefinition {
    pub name: String,
    /// The natural-language text the proposition stands for.
    pub text: String,
    /// Key-value structure captured from the WHERE clause.
    pub structure: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assertion {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proof {
    pub given: Vec<String>,
    pub prove: String,
    pub using: Vec<String>,
    pub steps: Vec<ProofStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofStep {
    pub number: u32,
    pub action: StepAction,
    /// Source names cited in a FROM clause; empty when absent.
    pub sources: Vec<String>,
    /// Axiom name cited in a VIA clause.
    pub via: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StepAction {
    /// Assert a raw expression into the proof state.
    Assert(String),
    /// Infer a named proposition from sources via an axiom.
    Infer(String),
}

impl StepAction {
    /// Short tag used in step history records.
    pub fn describe(&self) -> String {
        match self {
            StepAction::Assert(expr) => format!("ASSERT:{expr}"),
            StepAction::Infer(name) => format!("INFER:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub proposition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_action_describe() {
        assert_eq!(
            StepAction::Assert("p IMPLIES q".into()).describe(),
            "ASSERT:p IMPLIES q"
        );
        assert_eq!(StepAction::Infer("q".into()).describe(), "INFER:q");
    }
}
