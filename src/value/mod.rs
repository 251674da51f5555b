// SPDX-License-Identifier: MIT

//! Typed value model
//!
//! This module provides:
//! - `Scalar` - the boolean / integer / string values a binding holds
//! - `Binding` - variable name to scalar mapping, used as input and output
//! - `apply_result_spec` - writes a node's `key=value` side-effects

mod binding;
mod result;
mod scalar;

pub use binding::Binding;
pub use result::apply_result_spec;
pub use scalar::{coerce, Scalar};
