// SPDX-License-Identifier: MIT

//! Parameter context for `%name` references

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::{Map, Value};

use super::evaluator::Operand;

/// Name-to-value lookup consulted while evaluating parameter references
pub trait Params {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl<S: BuildHasher> Params for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Params for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Params for Map<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Only objects resolve names; any other value resolves nothing
impl Params for Value {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(name))
    }
}

impl Operand {
    /// Coerce a parameter value: numbers become decimals, strings stay text,
    /// everything else is stringified
    pub fn from_param(value: &Value) -> Self {
        match value {
            Value::Null => Operand::Null,
            Value::Number(n) => {
                let raw = n.to_string();
                match BigDecimal::from_str(&raw) {
                    Ok(decimal) => Operand::Decimal(decimal),
                    Err(_) => Operand::Text(raw),
                }
            }
            Value::String(s) => Operand::Text(s.clone()),
            Value::Bool(b) => Operand::Text(b.to_string()),
            other => Operand::Text(other.to_string()),
        }
    }
}
