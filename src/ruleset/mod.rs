// SPDX-License-Identifier: MIT

//! Named condition sets
//!
//! A rule file lists conditions by name:
//!
//! ```yaml
//! name: eligibility
//! rules:
//!   - name: adult
//!     when: "%age >= 20"
//!   - name: has_note
//!     when: "%note != '${blank}'"
//! ```

mod compiled;
mod loader;
mod types;

pub use compiled::{CompiledRule, CompiledRuleSet, RuleOutcome};
pub use loader::{ParamsLoader, RuleSetLoader, PARAMS_ENV};
pub use types::{RuleDefinition, RuleSet};
