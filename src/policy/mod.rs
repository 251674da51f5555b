// SPDX-License-Identifier: MIT

//! Policy graphs
//!
//! A policy is free-form text holding node declarations
//! (`approved [result="approved=true"]`) and edge declarations
//! (`start -> approved [cond="age>=18"]`). Any decorative framing such as
//! `digraph { ... }` is ignored.

pub mod loader;
mod parser;
pub mod types;

pub use loader::PolicyLoader;
pub use parser::parse;
pub use types::{Edge, Graph, Node};
