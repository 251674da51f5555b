//! Policy graph type definitions

use serde::Serialize;
use std::collections::HashMap;

/// A named point in the decision graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique name within the graph
    pub name: String,
    /// Comma-separated `key=value` side-effects, empty for none
    pub result: String,
}

/// A directed, conditionally-active transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Boolean expression; empty means the edge always holds
    pub cond: String,
}

/// A parsed policy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    /// Declared nodes by name
    pub nodes: HashMap<String, Node>,
    /// Edges in source order. The order is the tie-break when several
    /// conditions hold at once.
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node, replacing any earlier declaration with the same name
    pub fn add_node(&mut self, name: impl Into<String>, result: impl Into<String>) {
        let name = name.into();
        self.nodes.insert(
            name.clone(),
            Node {
                name,
                result: result.into(),
            },
        );
    }

    /// Append an edge after all existing ones
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        cond: impl Into<String>,
    ) {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            cond: cond.into(),
        });
    }

    /// Look up a declared node
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Edges leaving `name`, in declaration order. The yielded edges borrow
    /// only the graph, so they outlive the iterator.
    pub fn outgoing<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Edge> + 'n
    where
        'a: 'n,
    {
        self.edges.iter().filter(move |e| e.from == name)
    }

    /// True when the policy declared nothing at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
