// SPDX-License-Identifier: MIT

//! Dynamic condition expressions
//!
//! Conditions are lenient infix strings such as:
//! - `%age >= 20`
//! - `%status == 'active' && (%score > 0.8 || %vip = 'Y')`
//! - `%note == '${blank}'`
//!
//! Parsing yields an immutable [`Expression`] that may be executed any
//! number of times against different parameter contexts.

mod ast;
mod evaluator;
mod lexer;
mod params;
mod parser;

pub use ast::{Expression, Literal, Node, Operator};
pub use evaluator::{evaluate, Operand};
pub use lexer::{normalize, tokenize, Token};
pub use params::Params;
pub use parser::{parse, TreeBuilder};
