// SPDX-License-Identifier: MIT

//! Parsed rule sets ready for evaluation

use crate::error::DynexprError;
use crate::expression::{Expression, Params};

/// A rule whose condition has been parsed
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub expression: Expression,
}

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub name: String,
    pub matched: bool,
}

/// Rules in declaration order
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    name: Option<String>,
    rules: Vec<CompiledRule>,
}

impl CompiledRuleSet {
    pub fn new(name: Option<String>, rules: Vec<CompiledRule>) -> Self {
        Self { name, rules }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Result<&CompiledRule, DynexprError> {
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .ok_or_else(|| DynexprError::rule_not_found(name))
    }

    /// Evaluate every rule against the same parameters
    pub fn evaluate(&self, params: &dyn Params) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| {
                let matched = rule.expression.execute_with(params);
                log::debug!("rule {} => {}", rule.name, matched);
                RuleOutcome {
                    name: rule.name.clone(),
                    matched,
                }
            })
            .collect()
    }

    /// Names of the rules that hold
    pub fn matching(&self, params: &dyn Params) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.expression.execute_with(params))
            .map(|rule| rule.name.as_str())
            .collect()
    }
}
