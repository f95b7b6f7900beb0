// SPDX-License-Identifier: MIT

//! Tree builder for condition strings
//!
//! Tokens are folded into a binary tree through a single cursor. `&&` and
//! `||` demote everything parsed so far at the cursor's level into a new
//! left child, which is what makes them bind looser than comparisons.
//! Construction uses an arena and a path stack; the finished tree owns its
//! children and has no back references.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use log::{debug, warn};

use super::ast::{Expression, Literal, Node, Operator};
use super::lexer::{tokenize, Token};
use crate::error::ExpressionError;

const BLANK_MARKER: &str = "'${blank}'";
const SPACE_MARKER: &str = "${sp}";

enum Child {
    Leaf(Literal),
    Branch(usize),
}

#[derive(Default)]
struct Branch {
    op: Option<Operator>,
    left: Option<Child>,
    right: Option<Child>,
}

/// Incremental builder driven by the parser, usable on its own for
/// hand-assembled trees
pub struct TreeBuilder {
    arena: Vec<Branch>,
    cursor: usize,
    path: Vec<usize>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            arena: vec![Branch::default()],
            cursor: 0,
            path: Vec::new(),
        }
    }

    fn alloc(&mut self, branch: Branch) -> usize {
        self.arena.push(branch);
        self.arena.len() - 1
    }

    fn attach(&mut self, child: Child) -> Result<(), ExpressionError> {
        let branch = &mut self.arena[self.cursor];
        if branch.left.is_none() {
            branch.left = Some(child);
        } else if branch.right.is_none() {
            branch.right = Some(child);
        } else {
            return Err(ExpressionError::MalformedOperands);
        }
        Ok(())
    }

    /// Attach a value to the first free slot of the cursor
    pub fn push_value(&mut self, literal: Literal) -> Result<(), ExpressionError> {
        self.attach(Child::Leaf(literal))
    }

    /// Attach an empty child and move the cursor into it
    pub fn open_group(&mut self) -> Result<(), ExpressionError> {
        if self.arena[self.cursor].right.is_some() {
            return Err(ExpressionError::MalformedOperands);
        }
        let id = self.alloc(Branch::default());
        self.attach(Child::Branch(id))?;
        self.path.push(self.cursor);
        self.cursor = id;
        Ok(())
    }

    /// Move the cursor back to its parent
    pub fn close_group(&mut self) {
        match self.path.pop() {
            Some(parent) => self.cursor = parent,
            None => warn!("ignoring ')' without a matching '('"),
        }
    }

    /// Demote the cursor's content into a new left child, make `op` the
    /// cursor's operator and continue in a new right child
    pub fn shift(&mut self, op: Operator) {
        let current = std::mem::take(&mut self.arena[self.cursor]);
        let demoted = self.alloc(current);
        let fresh = self.alloc(Branch::default());
        self.arena[self.cursor] = Branch {
            op: Some(op),
            left: Some(Child::Branch(demoted)),
            right: Some(Child::Branch(fresh)),
        };
        self.path.push(self.cursor);
        self.cursor = fresh;
    }

    pub fn set_operator(&mut self, op: Operator) {
        self.arena[self.cursor].op = Some(op);
    }

    /// Consume the builder and produce the owned tree
    ///
    /// Branches are assembled children first from an explicit stack, so
    /// arbitrarily long chains do not consume call stack.
    pub fn finish(mut self) -> Expression {
        let mut built: Vec<Option<Node>> = Vec::new();
        built.resize_with(self.arena.len(), || None);

        let mut pending = vec![(0, false)];
        while let Some((id, children_built)) = pending.pop() {
            if children_built {
                let Branch { op, left, right } = std::mem::take(&mut self.arena[id]);
                built[id] = Some(Node::Branch {
                    op,
                    left: Self::take_child(&mut built, left),
                    right: Self::take_child(&mut built, right),
                });
                continue;
            }

            pending.push((id, true));
            let branch = &self.arena[id];
            for child in [&branch.left, &branch.right].into_iter().flatten() {
                if let Child::Branch(child_id) = child {
                    pending.push((*child_id, false));
                }
            }
        }

        let root = built.first_mut().and_then(Option::take).unwrap_or_default();
        Expression::from_root(root)
    }

    fn take_child(built: &mut [Option<Node>], child: Option<Child>) -> Option<Box<Node>> {
        child.map(|child| {
            Box::new(match child {
                Child::Leaf(literal) => Node::Leaf(literal),
                Child::Branch(id) => built[id].take().unwrap_or_default(),
            })
        })
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_numeric(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c == '-' || c == '.' || c.is_ascii_digit())
}

impl Literal {
    /// Classify a raw value token
    ///
    /// Unquoted words that are not `null` are kept as text.
    pub fn from_token(raw: &str) -> Literal {
        if let Some(name) = raw.strip_prefix('%') {
            return Literal::Parameter(name.to_string());
        }
        if raw == BLANK_MARKER {
            return Literal::Blank;
        }
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            let inner = &raw[1..raw.len() - 1];
            return Literal::Text(inner.replace("''", "'").replace(SPACE_MARKER, " "));
        }
        if is_numeric(raw) {
            if let Ok(value) = BigDecimal::from_str(raw) {
                return Literal::Decimal(value);
            }
        }
        if raw.eq_ignore_ascii_case("null") {
            Literal::Null
        } else {
            Literal::Text(raw.to_string())
        }
    }
}

/// Parse a condition string into an expression tree
///
/// Blank input yields the empty expression. The only error is a node
/// receiving a third operand.
pub fn parse(input: &str) -> Result<Expression, ExpressionError> {
    let line = input.trim();
    if line.is_empty() {
        return Ok(Expression::empty());
    }

    let tokens = tokenize(line);
    let count = tokens.len();
    let mut builder = TreeBuilder::new();
    for token in tokens {
        match token {
            Token::LeftParen => builder.open_group()?,
            Token::RightParen => builder.close_group(),
            Token::Operator(op) if op.is_logical() => builder.shift(op),
            Token::Operator(op) => builder.set_operator(op),
            Token::Value(raw) => builder.push_value(Literal::from_token(&raw))?,
        }
    }

    debug!("built expression tree from {} tokens", count);
    Ok(builder.finish())
}

impl Expression {
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        parse(input)
    }

    /// Absent input yields the empty expression
    pub fn parse_optional(input: Option<&str>) -> Result<Self, ExpressionError> {
        input.map_or_else(|| Ok(Expression::empty()), parse)
    }
}

impl FromStr for Expression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
