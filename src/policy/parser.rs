//! Policy text parser
//!
//! Extracts two patterns from the text, wherever they occur:
//! - `name [result="..."]`
//! - `from -> to [cond="..."]`
//!
//! Text matching neither pattern is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::Graph;
use crate::error::PolicyError;

static NODE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9_]+)\s*\[result="([^"]*)"\]"#).expect("node pattern is valid")
});

static EDGE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9_]+)\s*->\s*([A-Za-z0-9_]+)\s*\[cond="([^"]*)"\]"#)
        .expect("edge pattern is valid")
});

/// Parse policy text into a graph.
///
/// The current grammar never rejects input, so this always succeeds; text
/// without any declarations yields an empty graph. The `Result` leaves room
/// for a stricter grammar without changing callers.
pub fn parse(policy: &str) -> Result<Graph, PolicyError> {
    let text = policy.replace(['\n', '\r', '\t'], " ");
    let mut graph = Graph::new();

    for caps in NODE_DECL.captures_iter(&text) {
        graph.add_node(&caps[1], &caps[2]);
    }

    for caps in EDGE_DECL.captures_iter(&text) {
        graph.add_edge(&caps[1], &caps[2], &caps[3]);
    }

    log::debug!(
        "Parsed policy: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    Ok(graph)
}
