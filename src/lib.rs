// SPDX-License-Identifier: MIT

pub mod error;
pub mod expression;
pub mod ruleset;

pub use error::{DynexprError, ExpressionError};
pub use expression::{parse, Expression, Params};
