//! Condition expression evaluator
//!
//! Evaluation is fail-closed: any parse error, unknown variable, type
//! mismatch or non-boolean result makes the condition false.

use super::ast::{BinaryOp, Expression, Literal, LogicalOp, UnaryOp};
use super::parser::parse;
use crate::error::ConditionError;
use crate::value::{Binding, Scalar};
use std::cmp::Ordering;

/// Decides whether an edge condition holds for a binding.
///
/// Implementations must return a definite boolean and never panic on bad
/// input; anything they cannot evaluate counts as `false`.
pub trait ConditionEvaluator: Send + Sync {
    fn evaluate(&self, condition: &str, binding: &Binding) -> bool;
}

/// The built-in expression grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ConditionEvaluator for ExpressionEvaluator {
    fn evaluate(&self, condition: &str, binding: &Binding) -> bool {
        evaluate(condition, binding)
    }
}

/// Evaluate a condition string, folding every failure into `false`.
/// An empty condition always holds.
pub fn evaluate(condition: &str, binding: &Binding) -> bool {
    match try_evaluate(condition, binding) {
        Ok(result) => result,
        Err(e) => {
            log::debug!("Condition '{}' treated as false: {}", condition, e);
            false
        }
    }
}

/// Evaluate a condition string, reporting why it could not be evaluated
pub fn try_evaluate(condition: &str, binding: &Binding) -> Result<bool, ConditionError> {
    if condition.is_empty() {
        return Ok(true);
    }

    let expr = parse(condition)?;
    match evaluate_expression(&expr, binding)? {
        Value::Boolean(b) => Ok(b),
        other => Err(ConditionError::NotBoolean(other.kind())),
    }
}

/// Runtime value during expression evaluation. Integers and floats from
/// the binding are both widened to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Boolean(b) => Value::Boolean(*b),
            Scalar::Integer(i) => Value::Number(*i as f64),
            Scalar::Float(f) => Value::Number(*f),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Evaluate a parsed expression against a binding
pub fn evaluate_expression(expr: &Expression, binding: &Binding) -> Result<Value, ConditionError> {
    match expr {
        Expression::Literal(literal) => Ok(literal.into()),
        Expression::Variable(name) => binding
            .get(name)
            .map(Value::from)
            .ok_or_else(|| ConditionError::UndefinedVariable(name.clone())),
        Expression::Unary { op, operand } => {
            let value = evaluate_expression(operand, binding)?;
            match (op, value) {
                (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
                (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                (op, value) => Err(ConditionError::UnaryTypeMismatch {
                    op: op.to_string(),
                    operand: value.kind(),
                }),
            }
        }
        Expression::Binary { left, op, right } => {
            let l = evaluate_expression(left, binding)?;
            let r = evaluate_expression(right, binding)?;
            evaluate_binary(*op, l, r)
        }
        Expression::Logical { left, op, right } => evaluate_logical(*op, left, right, binding),
    }
}

fn evaluate_logical(
    op: LogicalOp,
    left: &Expression,
    right: &Expression,
    binding: &Binding,
) -> Result<Value, ConditionError> {
    let l = expect_boolean(op, evaluate_expression(left, binding)?)?;

    // Short-circuit
    match (op, l) {
        (LogicalOp::And, false) => return Ok(Value::Boolean(false)),
        (LogicalOp::Or, true) => return Ok(Value::Boolean(true)),
        _ => {}
    }

    let r = expect_boolean(op, evaluate_expression(right, binding)?)?;
    Ok(Value::Boolean(r))
}

fn expect_boolean(op: LogicalOp, value: Value) -> Result<bool, ConditionError> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(ConditionError::TypeMismatch {
            op: op.to_string(),
            left: other.kind(),
            right: "boolean",
        }),
    }
}

fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, ConditionError> {
    let mismatch = |l: &Value, r: &Value| ConditionError::TypeMismatch {
        op: op.to_string(),
        left: l.kind(),
        right: r.kind(),
    };

    match op {
        // Values of different types are simply unequal
        BinaryOp::Eq => Ok(Value::Boolean(left == right)),
        BinaryOp::NotEq => Ok(Value::Boolean(left != right)),

        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => return Err(mismatch(&left, &right)),
            };
            // NaN compares false both ways
            let Some(ordering) = ordering else {
                return Ok(Value::Boolean(false));
            };
            let holds = match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Lte => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Boolean(holds))
        }

        BinaryOp::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            _ => Err(mismatch(&left, &right)),
        },

        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
                return Err(mismatch(&left, &right));
            };
            let (a, b) = (*a, *b);
            let result = match op {
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div if b == 0.0 => return Err(ConditionError::DivisionByZero),
                BinaryOp::Div => a / b,
                BinaryOp::Mod if b == 0.0 => return Err(ConditionError::DivisionByZero),
                _ => a % b,
            };
            Ok(Value::Number(result))
        }
    }
}
