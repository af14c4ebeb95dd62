//! The closed set of logical operators.
//!
//! Every operator is a pure function of its operands' truth values with a
//! fixed arity. Dispatch is an exhaustive match over the enum; there is no
//! name-keyed fallback path.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FallError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Logical negation, arity 1.
    Not,
    /// Conjunction, arity 2.
    And,
    /// Disjunction, arity 2.
    Or,
    /// Material implication, arity 2.
    Implies,
    /// Exclusive disjunction, arity 2.
    Xor,
    /// Negated conjunction, arity 2.
    Nand,
    /// Negated disjunction, arity 2.
    Nor,
    /// Biconditional, arity 2.
    Iff,
    /// N-ary conjunction, arity >= 2.
    AndN(usize),
    /// N-ary disjunction, arity >= 2.
    OrN(usize),
    /// N-ary negated conjunction, arity >= 2.
    NandN(usize),
    /// N-ary negated disjunction, arity >= 2.
    NorN(usize),
}

impl Operator {
    pub fn and_n(arity: usize) -> Result<Operator> {
        nary(arity).map(Operator::AndN)
    }

    pub fn or_n(arity: usize) -> Result<Operator> {
        nary(arity).map(Operator::OrN)
    }

    pub fn nand_n(arity: usize) -> Result<Operator> {
        nary(arity).map(Operator::NandN)
    }

    pub fn nor_n(arity: usize) -> Result<Operator> {
        nary(arity).map(Operator::NorN)
    }

    /// Number of operands this operator takes.
    pub fn arity(&self) -> usize {
        match self {
            Operator::Not => 1,
            Operator::And
            | Operator::Or
            | Operator::Implies
            | Operator::Xor
            | Operator::Nand
            | Operator::Nor
            | Operator::Iff => 2,
            Operator::AndN(n) | Operator::OrN(n) | Operator::NandN(n) | Operator::NorN(n) => *n,
        }
    }

    /// Symbolic rendering; n-ary operators carry their arity as a suffix.
    pub fn symbol(&self) -> String {
        match self {
            Operator::Not => "¬".into(),
            Operator::And => "∧".into(),
            Operator::Or => "∨".into(),
            Operator::Implies => "→".into(),
            Operator::Xor => "⊕".into(),
            Operator::Nand => "↑".into(),
            Operator::Nor => "↓".into(),
            Operator::Iff => "↔".into(),
            Operator::AndN(n) => format!("∧{n}"),
            Operator::OrN(n) => format!("∨{n}"),
            Operator::NandN(n) => format!("↑{n}"),
            Operator::NorN(n) => format!("↓{n}"),
        }
    }

    /// Apply this operator to evaluated operand values.
    pub fn apply(&self, operands: &[bool]) -> Result<bool> {
        if operands.len() != self.arity() {
            return Err(FallError::Arity {
                operator: self.symbol(),
                expected: self.arity(),
                actual: operands.len(),
            });
        }

        Ok(match self {
            Operator::Not => !operands[0],
            Operator::And => operands[0] && operands[1],
            Operator::Or => operands[0] || operands[1],
            Operator::Implies => !operands[0] || operands[1],
            Operator::Xor => operands[0] != operands[1],
            Operator::Nand => !(operands[0] && operands[1]),
            Operator::Nor => !(operands[0] || operands[1]),
            Operator::Iff => operands[0] == operands[1],
            Operator::AndN(_) => operands.iter().all(|v| *v),
            Operator::OrN(_) => operands.iter().any(|v| *v),
            Operator::NandN(_) => !operands.iter().all(|v| *v),
            Operator::NorN(_) => !operands.iter().any(|v| *v),
        })
    }
}

fn nary(arity: usize) -> Result<usize> {
    if arity < 2 {
        return Err(FallError::NaryArity(arity));
    }
    Ok(arity)
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
