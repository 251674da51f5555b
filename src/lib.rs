// SPDX-License-Identifier: MIT

//! Decision-graph policy evaluation
//!
//! A policy is a small directed graph written as text. Evaluation starts at
//! `start`, applies each visited node's `key=value` results to the working
//! binding and follows the first outgoing edge whose condition holds.
//!
//! ```no_run
//! use verdict_rs::value::Binding;
//!
//! let policy = r#"digraph {
//!     approved [result="approved=true"]
//!     start -> approved [cond="age>=18"]
//! }"#;
//! let output = verdict_rs::run(policy, &Binding::new().with("age", 25)).unwrap();
//! assert_eq!(output.get("approved").and_then(|v| v.as_bool()), Some(true));
//! ```

pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod server;
pub mod value;

pub use engine::{run, Evaluation, HaltReason, InferenceEngine};
pub use error::VerdictError;
