// SPDX-License-Identifier: MIT

//! Rule file and parameter file loading

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::types::RuleSet;
use crate::error::DynexprError;

/// Loads rule sets from YAML files
pub struct RuleSetLoader;

impl RuleSetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a rule set from a YAML file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RuleSet, DynexprError> {
        let content = fs::read_to_string(path.as_ref())?;
        log::info!("Loaded rule file: {}", path.as_ref().display());
        Self::parse_yaml(&content)
    }

    /// Parse a rule set from a YAML string
    pub fn parse_yaml(content: &str) -> Result<RuleSet, DynexprError> {
        let set: RuleSet = serde_yaml::from_str(content)?;
        Ok(set)
    }
}

impl Default for RuleSetLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable naming the parameter file used when none is given
pub const PARAMS_ENV: &str = "DYNEXPR_PARAMS";

/// Loads parameter contexts from YAML or JSON files and `key=value` pairs
pub struct ParamsLoader;

impl ParamsLoader {
    /// The explicit parameter file, or the one named by `DYNEXPR_PARAMS`
    pub fn params_path(explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| std::env::var(PARAMS_ENV).ok())
    }

    /// Load the parameter file (if any) and apply overrides in order
    pub fn load_with_overrides<P: AsRef<Path>>(
        path: Option<P>,
        overrides: &[(String, Value)],
    ) -> Result<Map<String, Value>, DynexprError> {
        let mut params = match path {
            Some(path) => Self::load(path)?,
            None => Map::new(),
        };
        for (key, value) in overrides {
            log::debug!("Parameter override: {} = {}", key, value);
            params.insert(key.clone(), value.clone());
        }
        Ok(params)
    }

    /// Load a parameter map from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Map<String, Value>, DynexprError> {
        let content = fs::read_to_string(path.as_ref())?;
        log::info!("Loaded parameter file: {}", path.as_ref().display());
        Self::parse_yaml(&content)
    }

    /// Parse a parameter map; the document must be a mapping (or empty)
    pub fn parse_yaml(content: &str) -> Result<Map<String, Value>, DynexprError> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_yaml::from_str::<Value>(content)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(DynexprError::config(format!(
                "parameter file must be a mapping, got {}",
                other
            ))),
        }
    }

    /// Parse a `key=value` override; the value is read as a YAML scalar
    pub fn parse_assignment(assignment: &str) -> Result<(String, Value), DynexprError> {
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            DynexprError::config(format!("expected key=value, got '{}'", assignment))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DynexprError::config(format!(
                "missing parameter name in '{}'",
                assignment
            )));
        }
        let value = if raw.trim().is_empty() {
            Value::String(raw.to_string())
        } else {
            serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        Ok((key.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rule_file() {
        let yaml = r#"
name: eligibility
description: "Who may apply"
rules:
  - name: adult
    when: "%age >= 20"
  - name: has_note
    when: "%note != '${blank}'"
    description: "A note was entered"
"#;
        let set = RuleSetLoader::parse_yaml(yaml).unwrap();
        assert_eq!(set.name.as_deref(), Some("eligibility"));
        assert_eq!(set.rules.len(), 2);
        assert_eq!(set.rules[0].name, "adult");
        assert_eq!(set.rules[0].when, "%age >= 20");
        assert!(set.rules[0].description.is_none());
        assert_eq!(
            set.rules[1].description.as_deref(),
            Some("A note was entered")
        );
    }

    #[test]
    fn test_rules_default_to_empty() {
        let set = RuleSetLoader::parse_yaml("name: nothing\n").unwrap();
        assert!(set.rules.is_empty());
    }

    #[test]
    fn test_invalid_rule_file_returns_error() {
        let yaml = r#"
rules:
  - when: "1 == 1"
"#;
        assert!(matches!(
            RuleSetLoader::parse_yaml(yaml),
            Err(DynexprError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_params() {
        let params = ParamsLoader::parse_yaml("a: 1\nb: hoge\nc: null\n").unwrap();
        assert_eq!(params.get("a"), Some(&json!(1)));
        assert_eq!(params.get("b"), Some(&json!("hoge")));
        assert_eq!(params.get("c"), Some(&json!(null)));

        let json_params = ParamsLoader::parse_yaml(r#"{"x": 2.5}"#).unwrap();
        assert_eq!(json_params.get("x"), Some(&json!(2.5)));

        assert!(ParamsLoader::parse_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_params_must_be_mapping() {
        assert!(matches!(
            ParamsLoader::parse_yaml("- 1\n- 2\n"),
            Err(DynexprError::Config(_))
        ));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            ParamsLoader::parse_assignment("age=20").unwrap(),
            ("age".to_string(), json!(20))
        );
        assert_eq!(
            ParamsLoader::parse_assignment("name=taro").unwrap(),
            ("name".to_string(), json!("taro"))
        );
        assert_eq!(
            ParamsLoader::parse_assignment("expr=a=b").unwrap(),
            ("expr".to_string(), json!("a=b"))
        );
        assert_eq!(
            ParamsLoader::parse_assignment("note=").unwrap(),
            ("note".to_string(), json!(""))
        );
        assert!(ParamsLoader::parse_assignment("novalue").is_err());
        assert!(ParamsLoader::parse_assignment("=1").is_err());
    }

    #[test]
    fn test_malformed_json_params_report_yaml_error() {
        assert!(matches!(
            ParamsLoader::parse_yaml(r#"{"age": "#),
            Err(DynexprError::Yaml(_))
        ));
    }

    #[test]
    fn test_params_path_falls_back_to_env() {
        std::env::set_var(PARAMS_ENV, "from-env.yaml");
        assert_eq!(
            ParamsLoader::params_path(None).as_deref(),
            Some("from-env.yaml")
        );
        assert_eq!(
            ParamsLoader::params_path(Some("given.yaml".to_string())).as_deref(),
            Some("given.yaml")
        );

        std::env::remove_var(PARAMS_ENV);
        assert_eq!(ParamsLoader::params_path(None), None);
    }

    #[test]
    fn test_load_with_overrides() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"age: 10\nname: taro\n").unwrap();

        let overrides = vec![
            ParamsLoader::parse_assignment("age=40").unwrap(),
            ParamsLoader::parse_assignment("city=osaka").unwrap(),
        ];
        let params = ParamsLoader::load_with_overrides(Some(file.path()), &overrides).unwrap();
        assert_eq!(params.get("age"), Some(&json!(40)));
        assert_eq!(params.get("name"), Some(&json!("taro")));
        assert_eq!(params.get("city"), Some(&json!("osaka")));

        let only_overrides =
            ParamsLoader::load_with_overrides(None::<&str>, &overrides).unwrap();
        assert_eq!(only_overrides.len(), 2);
    }

    #[test]
    fn test_load_with_overrides_missing_file() {
        assert!(matches!(
            ParamsLoader::load_with_overrides(Some("/nonexistent/params.yaml"), &[]),
            Err(DynexprError::Io(_))
        ));
    }
}
