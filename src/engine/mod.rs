// SPDX-License-Identifier: MIT

//! Policy graph inference
//!
//! Traversal starts at the entry node, applies each visited node's result
//! to the working binding, then follows the first outgoing edge whose
//! condition holds. It stops when a node has no outgoing edges or none of
//! them hold.

pub mod executor;

pub use executor::{run, Evaluation, HaltReason, InferenceEngine, ENTRY_NODE};
