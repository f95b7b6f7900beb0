// SPDX-License-Identifier: MIT

//! Expression tree types

use bigdecimal::BigDecimal;

/// Comparison and logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// ==
    Eq,
    /// !=
    Ne,
    /// >
    Gt,
    /// >=
    Ge,
    /// <
    Lt,
    /// <=
    Le,
    /// &&
    And,
    /// ||
    Or,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::And,
        Operator::Or,
    ];

    /// Canonical textual form
    pub fn text(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::And => "&&",
            Operator::Or => "||",
        }
    }

    /// Look up an operator by its canonical form. Aliases such as `=` are not
    /// accepted here; the lexer rewrites them first.
    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.text() == text)
    }

    /// `&&` and `||` bind looser than every comparison
    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Literal values held by leaf nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Decimal(BigDecimal),
    Text(String),
    /// `%name`, resolved against the parameter context at evaluation time
    Parameter(String),
    /// Matches null, itself, and empty or whitespace-only text
    Blank,
    /// Never produced by the parser; available to hand-built trees
    Bool(bool),
}

impl Literal {
    pub fn parameter(name: impl Into<String>) -> Self {
        Literal::Parameter(name.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text(value.into())
    }

    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Literal::Parameter(name) => Some(name),
            _ => None,
        }
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Decimal(BigDecimal::from(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Decimal(BigDecimal::from(value))
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

/// A node of the expression tree
///
/// Branches under construction may hold zero, one (left) or two children.
/// A branch without an operator takes the value of its left child.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Literal),
    Branch {
        op: Option<Operator>,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
}

impl Node {
    /// A branch with no operator and no children
    pub fn empty() -> Self {
        Node::Branch {
            op: None,
            left: None,
            right: None,
        }
    }

    pub fn leaf(literal: impl Into<Literal>) -> Self {
        Node::Leaf(literal.into())
    }

    pub fn binary(op: Operator, left: Node, right: Node) -> Self {
        Node::Branch {
            op: Some(op),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Node::Branch {
                op: None,
                left: None,
                right: None
            }
        )
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Node::Branch { op, .. } => *op,
            Node::Leaf(_) => None,
        }
    }

    pub fn left(&self) -> Option<&Node> {
        match self {
            Node::Branch { left, .. } => left.as_deref(),
            Node::Leaf(_) => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match self {
            Node::Branch { right, .. } => right.as_deref(),
            Node::Leaf(_) => None,
        }
    }

    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Node::Leaf(literal) => Some(literal),
            Node::Branch { .. } => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::empty()
    }
}

// Long `&&`/`||` chains nest one level per term; unlink children onto a
// heap stack so dropping never recurses.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Node>> = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut Node, pending: &mut Vec<Box<Node>>) {
    if let Node::Branch { left, right, .. } = node {
        pending.extend(left.take());
        pending.extend(right.take());
    }
}

/// A parsed, immutable condition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    root: Node,
}

impl Expression {
    /// The expression that never holds
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
