// SPDX-License-Identifier: MIT

//! Typed error handling for verdict-rs
//!
//! Only policy and input problems ever reach a caller. Conditions that cannot
//! be evaluated and malformed result fragments degrade to `false` / no-op
//! inside the engine and never show up here.

use thiserror::Error;

/// Top-level error type for verdict-rs
#[derive(Debug, Error)]
pub enum VerdictError {
    /// Policy text could not be turned into a graph
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Input binding could not be decoded
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Configuration errors (bad env vars, invalid flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Traversal visited more nodes than the configured ceiling allows
    #[error("Step limit of {limit} exceeded before visiting node '{node}'")]
    StepLimitExceeded { limit: usize, node: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper for compatibility
    #[error("{0}")]
    Other(String),
}

/// Policy-level errors
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Policy text is structurally unrecognizable
    #[error("Malformed policy: {0}")]
    Malformed(String),

    /// Policy file does not exist
    #[error("Policy file not found: {0}")]
    FileNotFound(String),
}

/// Errors decoding an externally supplied input binding
#[derive(Debug, Error)]
pub enum InputError {
    /// Input must be a JSON/YAML object
    #[error("Input must be an object, got {0}")]
    NotAnObject(&'static str),

    /// A value is not a boolean, number or string
    #[error("Unsupported value for '{key}': {kind} is not a scalar")]
    UnsupportedValue { key: String, kind: &'static str },
}

/// Reasons a condition could not be evaluated.
///
/// These never escape [`crate::condition::evaluate`]; they are folded into
/// `false` and only surface through [`crate::condition::try_evaluate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Type mismatch: cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Type mismatch: cannot apply '{op}' to {operand}")]
    UnaryTypeMismatch { op: String, operand: &'static str },

    #[error("Expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Expression evaluated to {0}, not a boolean")]
    NotBoolean(&'static str),
}

impl VerdictError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Whether the error was caused by what the caller sent
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Policy(_) | Self::Input(_) | Self::Json(_) | Self::Yaml(_)
        )
    }
}

impl From<&str> for VerdictError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for VerdictError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
