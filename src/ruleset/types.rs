// SPDX-License-Identifier: MIT

//! YAML schema types for rule files

use serde::Deserialize;

use super::compiled::{CompiledRule, CompiledRuleSet};
use crate::error::DynexprError;
use crate::expression::parse;

/// Top-level rule file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RuleSet {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A single named condition
#[derive(Debug, Deserialize, Clone)]
pub struct RuleDefinition {
    pub name: String,
    /// Condition string; empty means the rule never matches
    #[serde(default)]
    pub when: String,
    pub description: Option<String>,
}

impl RuleSet {
    /// Parse every condition, failing on the first malformed one
    pub fn compile(&self) -> Result<CompiledRuleSet, DynexprError> {
        let rules = self
            .rules
            .iter()
            .map(|def| {
                parse(&def.when)
                    .map(|expression| CompiledRule {
                        name: def.name.clone(),
                        expression,
                    })
                    .map_err(|e| DynexprError::invalid_rule(&def.name, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "compiled {} rules for '{}'",
            rules.len(),
            self.name.as_deref().unwrap_or("<unnamed>")
        );
        Ok(CompiledRuleSet::new(self.name.clone(), rules))
    }
}
