// SPDX-License-Identifier: MIT

//! Typed error handling for dynexpr
//!
//! Expression construction has exactly one failure mode, everything else
//! is absorbed by the lenient parser. The remaining variants cover rule
//! files and parameter files.

use thiserror::Error;

/// Errors raised while building an expression tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// A node already holds two operands and a third one was attached
    #[error("expression is not in `A <op> B` form")]
    MalformedOperands,
}

/// Top-level error type for dynexpr
#[derive(Debug, Error)]
pub enum DynexprError {
    /// Structural expression errors
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// A rule's condition could not be built
    #[error("Rule '{name}' is invalid: {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: ExpressionError,
    },

    /// Rule lookup by name failed
    #[error("Rule '{name}' not found")]
    RuleNotFound { name: String },

    /// Configuration errors (bad parameter files, bad overrides)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl DynexprError {
    /// Create an invalid rule error
    pub fn invalid_rule(name: impl Into<String>, source: ExpressionError) -> Self {
        Self::InvalidRule {
            name: name.into(),
            source,
        }
    }

    /// Create a rule not found error
    pub fn rule_not_found(name: impl Into<String>) -> Self {
        Self::RuleNotFound { name: name.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
