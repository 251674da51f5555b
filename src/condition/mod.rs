// SPDX-License-Identifier: MIT

//! Condition evaluation for policy edges
//!
//! Conditions are boolean expressions over the current binding, e.g.:
//! - `age >= 18`
//! - `age >= 18 && score > 700`
//! - `!(tier == 'gold') || income - debt > 1000`

mod ast;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expression, Literal, LogicalOp, UnaryOp};
pub use evaluator::{
    evaluate, evaluate_expression, try_evaluate, ConditionEvaluator, ExpressionEvaluator, Value,
};
pub use parser::{parse, MAX_DEPTH};
