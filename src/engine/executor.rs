//! Policy graph executor

use serde::Serialize;
use std::sync::Arc;

use crate::condition::{ConditionEvaluator, ExpressionEvaluator};
use crate::config::EngineConfig;
use crate::error::VerdictError;
use crate::policy::{self, Edge, Graph};
use crate::value::{apply_result_spec, Binding};

/// Default entry point of every policy
pub const ENTRY_NODE: &str = "start";

/// Why a traversal stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// The last node has no outgoing edges
    Terminal,
    /// The last node has edges but none of their conditions hold
    NoMatchingEdge,
}

/// Outcome of one traversal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Input plus every applied result
    pub output: Binding,
    /// Nodes in visiting order, entry first. Revisits appear again.
    pub visited: Vec<String>,
    pub halt: HaltReason,
}

/// Walks a policy graph from the entry node, first-match-wins
pub struct InferenceEngine {
    config: EngineConfig,
    evaluator: Arc<dyn ConditionEvaluator>,
}

impl InferenceEngine {
    /// Create an engine using the built-in expression grammar
    pub fn new(config: EngineConfig) -> Self {
        Self::with_evaluator(config, Arc::new(ExpressionEvaluator))
    }

    /// Create an engine with a custom condition evaluator
    pub fn with_evaluator(config: EngineConfig, evaluator: Arc<dyn ConditionEvaluator>) -> Self {
        Self { config, evaluator }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse `policy` and evaluate it against `input`, returning the output binding
    pub fn run(&self, policy: &str, input: &Binding) -> Result<Binding, VerdictError> {
        let graph = policy::parse(policy)?;
        Ok(self.traverse(&graph, input, false)?.output)
    }

    /// Parse `policy` and evaluate it, keeping the traversal trace
    pub fn evaluate_policy(&self, policy: &str, input: &Binding) -> Result<Evaluation, VerdictError> {
        let graph = policy::parse(policy)?;
        self.evaluate_graph(&graph, input)
    }

    /// Evaluate an already parsed graph.
    ///
    /// Fails only when a step ceiling is configured and exceeded.
    pub fn evaluate_graph(&self, graph: &Graph, input: &Binding) -> Result<Evaluation, VerdictError> {
        self.traverse(graph, input, true)
    }

    /// Walk the graph. Without `trace` the walk runs in constant memory, so
    /// an unbounded cycle costs CPU but never grows the heap.
    fn traverse(&self, graph: &Graph, input: &Binding, trace: bool) -> Result<Evaluation, VerdictError> {
        let mut output = input.clone();
        let mut visited: Vec<String> = Vec::new();
        let mut steps: usize = 0;
        let mut current = self.config.entry_node.as_str();

        let halt = loop {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    log::warn!("Step limit {} reached before node '{}'", limit, current);
                    return Err(VerdictError::StepLimitExceeded {
                        limit,
                        node: current.to_string(),
                    });
                }
            }

            log::debug!("Visiting node: {}", current);
            steps = steps.saturating_add(1);
            if trace {
                visited.push(current.to_string());
            }

            if let Some(node) = graph.node(current) {
                if !node.result.is_empty() {
                    log::debug!("Applying result of {}: {}", current, node.result);
                    apply_result_spec(&node.result, &mut output);
                }
            }

            match self.select_edge(graph, current, &output) {
                Selection::NoEdges => break HaltReason::Terminal,
                Selection::NoneHeld => break HaltReason::NoMatchingEdge,
                Selection::Next(edge) => {
                    log::debug!("Taking edge {} -> {} [{}]", edge.from, edge.to, edge.cond);
                    current = edge.to.as_str();
                }
            }
        };

        log::info!(
            "Policy evaluation halted at '{}' after {} steps ({:?})",
            current,
            steps,
            halt
        );

        Ok(Evaluation {
            output,
            visited,
            halt,
        })
    }

    /// Pick the first outgoing edge, in declaration order, whose condition holds
    fn select_edge<'g>(&self, graph: &'g Graph, node: &str, state: &Binding) -> Selection<'g> {
        let mut any = false;
        for edge in graph.outgoing(node) {
            any = true;
            if self.evaluator.evaluate(&edge.cond, state) {
                return Selection::Next(edge);
            }
        }
        if any {
            Selection::NoneHeld
        } else {
            Selection::NoEdges
        }
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

enum Selection<'g> {
    NoEdges,
    NoneHeld,
    Next(&'g Edge),
}

/// Evaluate a policy with the default engine: entry `start`, no step ceiling
pub fn run(policy: &str, input: &Binding) -> Result<Binding, VerdictError> {
    InferenceEngine::default().run(policy, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use std::sync::Mutex;

    /// Evaluator that records every condition it is asked about
    struct RecordingEvaluator {
        seen: Mutex<Vec<String>>,
        answer: bool,
    }

    impl ConditionEvaluator for RecordingEvaluator {
        fn evaluate(&self, condition: &str, _binding: &Binding) -> bool {
            self.seen.lock().unwrap().push(condition.to_string());
            self.answer
        }
    }

    fn graph(build: impl FnOnce(&mut Graph)) -> Graph {
        let mut g = Graph::new();
        build(&mut g);
        g
    }

    #[test]
    fn test_first_match_wins() {
        let g = graph(|g| {
            g.add_node("first", "picked=first");
            g.add_node("second", "picked=second");
            g.add_edge("start", "first", "");
            g.add_edge("start", "second", "");
        });

        let eval = InferenceEngine::default()
            .evaluate_graph(&g, &Binding::new())
            .unwrap();
        assert_eq!(eval.output.get("picked"), Some(&Scalar::String("first".into())));
        assert_eq!(eval.visited, vec!["start", "first"]);
        assert_eq!(eval.halt, HaltReason::Terminal);
    }

    #[test]
    fn test_result_visible_to_same_node_edges() {
        let g = graph(|g| {
            g.add_node("start", "flag=true");
            g.add_node("yes", "seen=1");
            g.add_edge("start", "yes", "flag == true");
        });

        let eval = InferenceEngine::default()
            .evaluate_graph(&g, &Binding::new())
            .unwrap();
        assert_eq!(eval.output.get("seen"), Some(&Scalar::Integer(1)));
    }

    #[test]
    fn test_no_matching_edge_halts() {
        let g = graph(|g| g.add_edge("start", "adult", "age >= 18"));
        let input = Binding::new().with("age", 10);

        let eval = InferenceEngine::default().evaluate_graph(&g, &input).unwrap();
        assert_eq!(eval.output, input);
        assert_eq!(eval.halt, HaltReason::NoMatchingEdge);
        assert_eq!(eval.visited, vec!["start"]);
    }

    #[test]
    fn test_undeclared_target_is_terminal() {
        let g = graph(|g| g.add_edge("start", "ghost", ""));
        let eval = InferenceEngine::default()
            .evaluate_graph(&g, &Binding::new())
            .unwrap();
        assert_eq!(eval.visited, vec!["start", "ghost"]);
        assert_eq!(eval.halt, HaltReason::Terminal);
        assert!(eval.output.is_empty());
    }

    #[test]
    fn test_step_limit_breaks_cycle() {
        let g = graph(|g| {
            g.add_edge("start", "loop", "");
            g.add_edge("loop", "start", "");
        });
        let engine = InferenceEngine::new(EngineConfig::default().with_max_steps(Some(5)));

        let err = engine.evaluate_graph(&g, &Binding::new()).unwrap_err();
        match err {
            VerdictError::StepLimitExceeded { limit, node } => {
                assert_eq!(limit, 5);
                // start, loop, start, loop, start visited; next is loop
                assert_eq!(node, "loop");
            }
            other => panic!("Expected StepLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_step_limit_not_hit_on_exact_length() {
        let g = graph(|g| g.add_edge("start", "end", ""));
        let engine = InferenceEngine::new(EngineConfig::default().with_max_steps(Some(2)));
        let eval = engine.evaluate_graph(&g, &Binding::new()).unwrap();
        assert_eq!(eval.visited.len(), 2);
    }

    #[test]
    fn test_custom_entry_node() {
        let g = graph(|g| {
            g.add_node("begin", "entered=true");
        });
        let config = EngineConfig {
            entry_node: "begin".to_string(),
            max_steps: None,
        };
        let eval = InferenceEngine::new(config)
            .evaluate_graph(&g, &Binding::new())
            .unwrap();
        assert_eq!(eval.output.get("entered"), Some(&Scalar::Boolean(true)));
    }

    #[test]
    fn test_custom_evaluator_sees_edges_in_order() {
        let g = graph(|g| {
            g.add_edge("start", "a", "first");
            g.add_edge("start", "b", "second");
        });
        let evaluator = Arc::new(RecordingEvaluator {
            seen: Mutex::new(Vec::new()),
            answer: false,
        });
        let engine = InferenceEngine::with_evaluator(EngineConfig::default(), evaluator.clone());

        let eval = engine.evaluate_graph(&g, &Binding::new()).unwrap();
        assert_eq!(eval.halt, HaltReason::NoMatchingEdge);
        assert_eq!(*evaluator.seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_run_matches_traced_output() {
        let policy = r#"start -> mid [cond=""] mid [result="a=1"] mid -> end [cond="a == 1"] end [result="b=2"]"#;
        let engine = InferenceEngine::default();
        let traced = engine.evaluate_policy(policy, &Binding::new()).unwrap();
        let output = engine.run(policy, &Binding::new()).unwrap();

        assert_eq!(output, traced.output);
        assert_eq!(traced.visited, vec!["start", "mid", "end"]);
    }

    #[test]
    fn test_step_limit_applies_without_trace() {
        let engine = InferenceEngine::new(EngineConfig::default().with_max_steps(Some(3)));
        let err = engine
            .run(r#"start -> start [cond=""]"#, &Binding::new())
            .unwrap_err();
        assert!(matches!(
            err,
            VerdictError::StepLimitExceeded { limit: 3, .. }
        ));
    }

    #[test]
    fn test_run_parses_policy() {
        let policy = r#"start -> ok [cond=""] ok [result="ok=true"]"#;
        let output = run(policy, &Binding::new()).unwrap();
        assert_eq!(output.get("ok"), Some(&Scalar::Boolean(true)));
    }
}
