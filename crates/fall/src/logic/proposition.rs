//! Propositions: atomic, numeric, and compound.
//!
//! The variant set is closed. Constructors enforce the two structural
//! invariants — non-empty trimmed symbols and component count equal to the
//! operator arity — so a well-formed `Proposition` value cannot violate
//! them afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::evaluation::EvaluationContext;
use super::operator::Operator;
use crate::error::{FallError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Proposition {
    /// An indivisible statement: a symbol with an optional fixed truth value.
    Atomic {
        symbol: String,
        truth: Option<bool>,
    },
    /// An atomic specialization carrying a numeric value; its truth is
    /// "has a value".
    Numeric {
        symbol: String,
        value: Option<f64>,
    },
    /// An operator applied to a fixed-arity tuple of child propositions.
    Compound {
        operator: Operator,
        components: Vec<Proposition>,
    },
}

impl Proposition {
    pub fn atomic(symbol: &str, truth: Option<bool>) -> Result<Proposition> {
        let symbol = trimmed_symbol(symbol)?;
        Ok(Proposition::Atomic { symbol, truth })
    }

    pub fn numeric(symbol: &str, value: Option<f64>) -> Result<Proposition> {
        let symbol = trimmed_symbol(symbol)?;
        Ok(Proposition::Numeric { symbol, value })
    }

    pub fn compound(operator: Operator, components: Vec<Proposition>) -> Result<Proposition> {
        if components.len() != operator.arity() {
            return Err(FallError::Arity {
                operator: operator.symbol(),
                expected: operator.arity(),
                actual: components.len(),
            });
        }
        Ok(Proposition::Compound {
            operator,
            components,
        })
    }

    /// The symbol of an atomic or numeric proposition.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Proposition::Atomic { symbol, .. } | Proposition::Numeric { symbol, .. } => {
                Some(symbol)
            }
            Proposition::Compound { .. } => None,
        }
    }

    /// The fixed truth value, if this proposition carries one on its own:
    /// the assigned value for atomics, value-presence for numerics.
    pub fn truth(&self) -> Option<bool> {
        match self {
            Proposition::Atomic { truth, .. } => *truth,
            Proposition::Numeric { value, .. } => Some(value.is_some()),
            Proposition::Compound { .. } => None,
        }
    }

    /// Evaluate against fixed truth values only (no symbol table).
    pub fn evaluate_fixed(&self) -> Result<bool> {
        EvaluationContext::default().evaluate(self)
    }

    /// All atomic/numeric sub-propositions reachable in this tree, deduplicated.
    pub fn atoms(&self) -> Vec<&Proposition> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, atoms: &mut Vec<&'a Proposition>) {
        match self {
            Proposition::Compound { components, .. } => {
                for component in components {
                    component.collect_atoms(atoms);
                }
            }
            leaf => {
                if !atoms.contains(&leaf) {
                    atoms.push(leaf);
                }
            }
        }
    }

    fn numeric_parts(&self) -> Result<(&str, Option<f64>)> {
        match self {
            Proposition::Numeric { symbol, value } => Ok((symbol, *value)),
            other => Err(FallError::NotNumeric(other.to_string())),
        }
    }

    /// Add two numeric propositions, producing `(a+b)`.
    pub fn add(&self, other: &Proposition) -> Result<Proposition> {
        self.arithmetic(other, '+', |a, b| a + b)
    }

    /// Subtract two numeric propositions, producing `(a-b)`.
    pub fn sub(&self, other: &Proposition) -> Result<Proposition> {
        self.arithmetic(other, '-', |a, b| a - b)
    }

    /// Multiply two numeric propositions, producing `(a*b)`.
    pub fn mul(&self, other: &Proposition) -> Result<Proposition> {
        self.arithmetic(other, '*', |a, b| a * b)
    }

    fn arithmetic(
        &self,
        other: &Proposition,
        op: char,
        apply: impl Fn(f64, f64) -> f64,
    ) -> Result<Proposition> {
        let (a, b) = self.defined_values(other)?;
        let (lhs, _) = self.numeric_parts()?;
        let (rhs, _) = other.numeric_parts()?;
        Proposition::numeric(&format!("({lhs}{op}{rhs})"), Some(apply(a, b)))
    }

    pub fn lt(&self, other: &Proposition) -> Result<bool> {
        let (a, b) = self.defined_values(other)?;
        Ok(a < b)
    }

    pub fn gt(&self, other: &Proposition) -> Result<bool> {
        let (a, b) = self.defined_values(other)?;
        Ok(a > b)
    }

    pub fn le(&self, other: &Proposition) -> Result<bool> {
        let (a, b) = self.defined_values(other)?;
        Ok(a <= b)
    }

    pub fn ge(&self, other: &Proposition) -> Result<bool> {
        let (a, b) = self.defined_values(other)?;
        Ok(a >= b)
    }

    /// Both numeric values, failing explicitly on any undefined value —
    /// never an implicit zero.
    fn defined_values(&self, other: &Proposition) -> Result<(f64, f64)> {
        let (lhs_symbol, lhs) = self.numeric_parts()?;
        let (rhs_symbol, rhs) = other.numeric_parts()?;
        let a = lhs.ok_or_else(|| FallError::UndefinedValue(lhs_symbol.to_string()))?;
        let b = rhs.ok_or_else(|| FallError::UndefinedValue(rhs_symbol.to_string()))?;
        Ok((a, b))
    }
}

fn trimmed_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(FallError::EmptySymbol);
    }
    Ok(symbol.to_string())
}

// Structural equality: atomics and numerics by (symbol, value), compounds by
// (operator, component sequence). Numeric values compare by bit pattern so
// equality stays total.

impl PartialEq for Proposition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Proposition::Atomic { symbol: a, truth: t },
                Proposition::Atomic {
                    symbol: b,
                    truth: u,
                },
            ) => a == b && t == u,
            (
                Proposition::Numeric { symbol: a, value: v },
                Proposition::Numeric {
                    symbol: b,
                    value: w,
                },
            ) => a == b && v.map(f64::to_bits) == w.map(f64::to_bits),
            (
                Proposition::Compound {
                    operator: op_a,
                    components: ca,
                },
                Proposition::Compound {
                    operator: op_b,
                    components: cb,
                },
            ) => op_a == op_b && ca == cb,
            _ => false,
        }
    }
}

impl Eq for Proposition {}

impl Hash for Proposition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Proposition::Atomic { symbol, truth } => {
                0u8.hash(state);
                symbol.hash(state);
                truth.hash(state);
            }
            Proposition::Numeric { symbol, value } => {
                1u8.hash(state);
                symbol.hash(state);
                value.map(f64::to_bits).hash(state);
            }
            Proposition::Compound {
                operator,
                components,
            } => {
                2u8.hash(state);
                operator.hash(state);
                components.hash(state);
            }
        }
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proposition::Atomic { symbol, .. } => write!(f, "{symbol}"),
            Proposition::Numeric { symbol, value } => match value {
                Some(value) => write!(f, "{symbol}={value}"),
                None => write!(f, "{symbol}"),
            },
            Proposition::Compound {
                operator,
                components,
            } => {
                if operator.arity() == 1 {
                    return write!(f, "{operator}{}", components[0]);
                }
                write!(f, "(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {operator} ")?;
                    }
                    write!(f, "{component}")?;
                }
                write!(f, ")")
            }
        }
    }
}
