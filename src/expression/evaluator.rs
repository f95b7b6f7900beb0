// SPDX-License-Identifier: MIT

//! Expression evaluator
//!
//! Comparisons are null-aware and loosely typed. `&&` and `||` only accept
//! proper booleans; anything else, null included, makes them false.

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use log::debug;

use super::ast::{Expression, Literal, Node, Operator};
use super::params::Params;

/// Value produced by evaluating a node
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Decimal(BigDecimal),
    Text(String),
    /// An unresolved parameter reference (no context was supplied)
    Parameter(String),
    Blank,
    Bool(bool),
}

impl Operand {
    /// Null, blank, and empty or whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Operand::Null | Operand::Blank => true,
            Operand::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Operand::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Textual form used when the left side of an ordering is text
    pub fn to_text(&self) -> String {
        match self {
            Operand::Null => "null".to_string(),
            Operand::Decimal(d) => d.to_string(),
            Operand::Text(s) => s.clone(),
            Operand::Parameter(name) => format!("%{}", name),
            Operand::Blank => "'${blank}'".to_string(),
            Operand::Bool(b) => b.to_string(),
        }
    }

    fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Operand::Decimal(d) => Some(d.clone()),
            other => BigDecimal::from_str(&other.to_text()).ok(),
        }
    }
}

impl From<&Literal> for Operand {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Operand::Null,
            Literal::Decimal(d) => Operand::Decimal(d.clone()),
            Literal::Text(s) => Operand::Text(s.clone()),
            Literal::Parameter(name) => Operand::Parameter(name.clone()),
            Literal::Blank => Operand::Blank,
            Literal::Bool(b) => Operand::Bool(*b),
        }
    }
}

fn resolve(literal: &Literal, params: Option<&dyn Params>) -> Operand {
    match (literal, params) {
        (Literal::Parameter(name), Some(params)) => params
            .lookup(name)
            .map(Operand::from_param)
            .unwrap_or(Operand::Null),
        (literal, _) => Operand::from(literal),
    }
}

fn equals(left: &Operand, right: &Operand) -> bool {
    match (left, right) {
        (Operand::Null, Operand::Blank) => true,
        (Operand::Null, other) => matches!(other, Operand::Null),
        (other, Operand::Blank) | (Operand::Blank, other) => other.is_blank(),
        // BigDecimal equality ignores scale, so 1.0 == 1
        (Operand::Decimal(a), Operand::Decimal(b)) => a == b,
        (a, b) => a == b,
    }
}

fn compare(left: &Operand, right: &Operand) -> Option<Ordering> {
    if matches!(right, Operand::Null) {
        return None;
    }
    match left {
        Operand::Text(s) => Some(s.as_str().cmp(right.to_text().as_str())),
        Operand::Decimal(d) => match right.to_decimal() {
            Some(r) => Some(d.cmp(&r)),
            None => {
                debug!("cannot order {} against non-numeric {:?}", d, right);
                None
            }
        },
        other => {
            debug!("cannot order {:?} against {:?}", other, right);
            None
        }
    }
}

fn apply(op: Operator, left: &Operand, right: &Operand) -> bool {
    match op {
        Operator::Eq => equals(left, right),
        Operator::Ne => !equals(left, right),
        Operator::And => match (left.as_bool(), right.as_bool()) {
            (Some(a), Some(b)) => a && b,
            _ => false,
        },
        Operator::Or => match (left.as_bool(), right.as_bool()) {
            (Some(a), Some(b)) => a || b,
            _ => false,
        },
        Operator::Gt => matches!(compare(left, right), Some(Ordering::Greater)),
        Operator::Ge => matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => matches!(compare(left, right), Some(Ordering::Less)),
        Operator::Le => matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

enum Step<'a> {
    Visit(&'a Node),
    Apply { op: Option<Operator>, has_right: bool },
}

impl Node {
    /// Evaluate this node
    ///
    /// A branch without a left child is empty and yields null. A missing
    /// right child counts as `false`. A branch without an operator yields
    /// its left value. Children are evaluated from an explicit stack, so
    /// depth is bounded by memory rather than the call stack.
    pub fn evaluate(&self, params: Option<&dyn Params>) -> Operand {
        let mut steps = vec![Step::Visit(self)];
        let mut values: Vec<Operand> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Node::Leaf(literal)) => values.push(resolve(literal, params)),
                Step::Visit(Node::Branch { left: None, .. }) => values.push(Operand::Null),
                Step::Visit(Node::Branch {
                    op,
                    left: Some(left),
                    right,
                }) => {
                    steps.push(Step::Apply {
                        op: *op,
                        has_right: right.is_some(),
                    });
                    if let Some(right) = right {
                        steps.push(Step::Visit(&**right));
                    }
                    steps.push(Step::Visit(&**left));
                }
                Step::Apply { op, has_right } => {
                    let right = if has_right {
                        values.pop().unwrap_or(Operand::Null)
                    } else {
                        Operand::Bool(false)
                    };
                    let left = values.pop().unwrap_or(Operand::Null);
                    values.push(match op {
                        None => left,
                        Some(op) => Operand::Bool(apply(op, &left, &right)),
                    });
                }
            }
        }

        values.pop().unwrap_or(Operand::Null)
    }
}

/// Evaluate an expression, with or without a parameter context
pub fn evaluate(expr: &Expression, params: Option<&dyn Params>) -> bool {
    if expr.is_empty() {
        return false;
    }
    match expr.root().evaluate(params) {
        Operand::Bool(result) => result,
        other => {
            debug!("expression produced non-boolean {:?}, treating as false", other);
            false
        }
    }
}

impl Expression {
    pub fn execute(&self) -> bool {
        evaluate(self, None)
    }

    pub fn execute_with(&self, params: &dyn Params) -> bool {
        evaluate(self, Some(params))
    }
}
