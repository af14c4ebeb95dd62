//! Recursive boolean evaluation with explicit missing-value policies.
//!
//! Partial knowledge is modeled explicitly: an atomic proposition without a
//! fixed truth value and without a context entry either fails the
//! evaluation (`Strict`) or defaults to true while recording the gap
//! (`Structural`). Nothing defaults silently.

use std::collections::HashMap;

use tracing::debug;

use super::proposition::Proposition;
use crate::error::{FallError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Require every proposition to have a truth value.
    #[default]
    Strict,
    /// Evaluate structure only; missing values default to true and are
    /// recorded.
    Structural,
}

/// Evaluation state for one run: the symbol table, the missing-value
/// policy, a memo cache, and the symbols found missing along the way.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    values: HashMap<String, bool>,
    mode: EvaluationMode,
    cache: HashMap<Proposition, bool>,
    missing: Vec<String>,
}

impl EvaluationContext {
    pub fn new(values: HashMap<String, bool>) -> Self {
        EvaluationContext {
            values,
            ..Default::default()
        }
    }

    pub fn with_mode(values: HashMap<String, bool>, mode: EvaluationMode) -> Self {
        EvaluationContext {
            values,
            mode,
            ..Default::default()
        }
    }

    /// Symbols that had no truth value during this run (Structural mode).
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn evaluate(&mut self, proposition: &Proposition) -> Result<bool> {
        if let Some(cached) = self.cache.get(proposition) {
            return Ok(*cached);
        }

        let result = match proposition {
            Proposition::Atomic { symbol, truth } => match truth {
                // A fixed truth value takes precedence over the context.
                Some(value) => *value,
                None => match self.values.get(symbol) {
                    Some(value) => *value,
                    None => match self.mode {
                        EvaluationMode::Strict => {
                            return Err(FallError::MissingTruthValue(symbol.clone()))
                        }
                        EvaluationMode::Structural => {
                            self.missing.push(symbol.clone());
                            true
                        }
                    },
                },
            },
            Proposition::Numeric { value, .. } => value.is_some(),
            Proposition::Compound {
                operator,
                components,
            } => {
                let mut operands = Vec::with_capacity(components.len());
                for component in components {
                    operands.push(self.evaluate(component)?);
                }
                operator.apply(&operands)?
            }
        };

        debug!(proposition = %proposition, result, "evaluated");
        self.cache.insert(proposition.clone(), result);
        Ok(result)
    }
}
