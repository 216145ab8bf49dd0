use crate::diagram::{Diagram, DiagramEdge, DiagramNode, Direction, Flowchart, NodeId, ShapeKind};
use crate::synthesis::classifier::{LineContext, LineIntent, SourceTraits, classify_line};
use crate::synthesis::label::normalize_label;
use crate::synthesis::{Synthesis, SynthesisOptions};
use log::{debug, info, trace};

const RETURN_ZERO: &str = "Return 0";
const RETURN_CACHED: &str = "Return Cached";
const STORE_AND_RETURN: &str = "Store & Return";

/// Running state of one flowchart synthesis pass.
#[derive(Debug)]
struct ScanState {
    frontier: NodeId,
    open_decisions: Vec<NodeId>,
    next_id: u32,
    discovered_functions: Vec<String>,
}

impl ScanState {
    fn new() -> Self {
        ScanState {
            frontier: NodeId::Start,
            open_decisions: Vec::new(),
            next_id: 1,
            discovered_functions: Vec::new(),
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId::Step(self.next_id);
        self.next_id += 1;
        id
    }

    fn discover(&mut self, name: &str) {
        if !self.discovered_functions.iter().any(|f| f == name) {
            self.discovered_functions.push(name.to_string());
        }
    }
}

struct FlowchartBuilder {
    chart: Flowchart,
    state: ScanState,
    complexity: u32,
    label_limit: usize,
}

impl FlowchartBuilder {
    fn new(direction: Direction, label_limit: usize) -> Self {
        let mut chart = Flowchart::new(direction);
        chart.add_node(DiagramNode::new(NodeId::Start, "Start", ShapeKind::Terminal));
        FlowchartBuilder {
            chart,
            state: ScanState::new(),
            complexity: 1,
            label_limit,
        }
    }

    fn node(&mut self, label: impl Into<String>, shape: ShapeKind) -> NodeId {
        let id = self.state.allocate();
        let node = DiagramNode::new(id, label, shape);
        trace!("Adding node {} ({:?}): {}", id, node.shape, node.label);
        self.chart.add_node(node);
        id
    }

    fn edge(&mut self, edge: DiagramEdge) {
        trace!("Adding edge {} -> {} ({:?})", edge.from, edge.to, edge.label);
        self.chart.add_edge(edge);
    }

    fn label(&self, text: &str) -> String {
        normalize_label(text, self.label_limit)
    }

    fn apply(&mut self, intent: LineIntent) {
        match intent {
            LineIntent::FunctionDecl { name } => {
                let label = self.label(&name);
                let id = self.node(label, ShapeKind::Subroutine);
                self.edge(DiagramEdge::new(self.state.frontier, id));
                self.state.frontier = id;
                self.state.discover(&name);
            }
            LineIntent::BaseCase { condition } => {
                let label = format!("Base Case?<br/>{}", self.label(&condition));
                self.guard(label, RETURN_ZERO);
            }
            LineIntent::MemoLookup => {
                self.guard("Cached?<br/>Check memoization".to_string(), RETURN_CACHED);
            }
            LineIntent::BoundCheck { condition } => {
                let label = format!("Fits?<br/>{}", self.label(&condition));
                let decision = self.decision(label);
                self.state.frontier = decision;
            }
            LineIntent::RecursiveAssign { target } => {
                let target = target
                    .map(|t| self.label(&t))
                    .unwrap_or_else(|| "result".to_string());
                let id = self.node(format!("Recursive:<br/>{}", target), ShapeKind::Rectangle);
                self.edge(DiagramEdge::new(self.state.frontier, id));
                self.state.frontier = id;
            }
            LineIntent::CombineReturn => {
                let id = self.node("Choose Best<br/>max/min", ShapeKind::Rectangle);
                match self.state.open_decisions.last().copied() {
                    Some(top) if !self.has_affirmative(top) => {
                        self.edge(DiagramEdge::affirmative(top, id));
                    }
                    Some(_) => {
                        // The decision's affirmative branch is taken; this is its other branch.
                        if let Some(top) = self.state.open_decisions.pop() {
                            self.edge(DiagramEdge::negative(top, id));
                        }
                    }
                    None => self.edge(DiagramEdge::new(self.state.frontier, id)),
                }
                self.store_and_return(id);
            }
            LineIntent::RecursiveReturn => {
                let id = self.node("Recursive Call", ShapeKind::Rectangle);
                match self.state.open_decisions.pop() {
                    Some(top) => self.edge(DiagramEdge::negative(top, id)),
                    None => self.edge(DiagramEdge::new(self.state.frontier, id)),
                }
                self.store_and_return(id);
            }
            LineIntent::Ignore => {}
        }
    }

    /// Emits a decision wired from the frontier and leaves it open.
    fn decision(&mut self, label: String) -> NodeId {
        self.complexity += 1;
        let id = self.node(label, ShapeKind::Decision);
        self.edge(DiagramEdge::new(self.state.frontier, id));
        self.state.open_decisions.push(id);
        id
    }

    /// Decision whose affirmative branch returns immediately.
    fn guard(&mut self, label: String, exit_label: &str) {
        let decision = self.decision(label);
        let exit = self.node(exit_label, ShapeKind::Terminal);
        self.edge(DiagramEdge::affirmative(decision, exit));
        self.edge(DiagramEdge::new(exit, NodeId::End));
        if let Some(&top) = self.state.open_decisions.last() {
            self.state.frontier = top;
        }
    }

    fn store_and_return(&mut self, from: NodeId) {
        let id = self.node(STORE_AND_RETURN, ShapeKind::Terminal);
        self.edge(DiagramEdge::new(from, id));
        self.edge(DiagramEdge::new(id, NodeId::End));
        self.state.frontier = id;
    }

    fn has_affirmative(&self, id: NodeId) -> bool {
        self.chart.outgoing(id).any(|e| e.is_affirmative())
    }

    fn finish(mut self) -> Synthesis {
        self.chart
            .add_node(DiagramNode::new(NodeId::End, "End", ShapeKind::Terminal));

        let frontier = self.state.frontier;
        if !self.chart.has_edge(frontier, NodeId::End) && self.state.open_decisions.is_empty() {
            self.edge(DiagramEdge::new(frontier, NodeId::End));
        }

        if !self.state.open_decisions.is_empty() {
            debug!(
                "{} decision(s) left open after scan",
                self.state.open_decisions.len()
            );
        }

        Synthesis {
            diagram: Diagram::Flowchart(self.chart),
            complexity: self.complexity,
        }
    }
}

/// Builds a flowchart from source text in a single left-to-right pass.
pub fn synthesize_flowchart(code: &str, options: &SynthesisOptions) -> Synthesis {
    let traits = SourceTraits::scan(code);
    debug!("Source traits: {:?}", traits);

    let mut builder = FlowchartBuilder::new(options.direction, options.label_limit);

    for (line_no, line) in code.lines().enumerate() {
        let intent = {
            let ctx = LineContext {
                traits,
                known_functions: &builder.state.discovered_functions,
            };
            classify_line(line, &ctx)
        };
        if intent != LineIntent::Ignore {
            debug!("Line {}: {:?}", line_no + 1, intent.tag());
        }
        builder.apply(intent);
    }

    let synthesis = builder.finish();
    if let Diagram::Flowchart(chart) = &synthesis.diagram {
        info!(
            "Synthesized flowchart with {} nodes and {} edges (complexity {})",
            chart.node_count(),
            chart.edge_count(),
            synthesis.complexity
        );
    }
    synthesis
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNAPSACK: &str = r#"
#include <bits/stdc++.h>
using namespace std;

int dp[1001][1001];

int knapsack(int W, int wt[], int val[], int n) {
    if (n == 0 || W == 0) return 0;
    if (dp[n][W] != -1) return dp[n][W];
    if (W >= wt[n-1]) {
        int take = val[n-1] + knapsack(W - wt[n-1], wt, val, n - 1);
        int skip = knapsack(W, wt, val, n - 1);
        return dp[n][W] = max(take, skip);
    }
    return dp[n][W] = knapsack(W, wt, val, n - 1);
}
"#;

    fn flowchart(code: &str) -> (Flowchart, u32) {
        let synthesis = synthesize_flowchart(code, &SynthesisOptions::default());
        let chart = synthesis
            .diagram
            .as_flowchart()
            .cloned()
            .expect("flowchart synthesis");
        (chart, synthesis.complexity)
    }

    fn labels(chart: &Flowchart) -> Vec<&str> {
        chart.nodes().iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn unrecognized_input_connects_start_to_end() {
        let (chart, complexity) = flowchart("hello world\nthis is not code");
        assert_eq!(labels(&chart), vec!["Start", "End"]);
        assert_eq!(chart.edges(), &[DiagramEdge::new(NodeId::Start, NodeId::End)]);
        assert_eq!(complexity, 1);
    }

    #[test]
    fn base_case_then_recursive_return() {
        let (chart, complexity) = flowchart("if (n == 0) return 0;\nreturn fib(n-1) + fib(n-2);");

        assert_eq!(
            labels(&chart),
            vec![
                "Start",
                "Base Case?<br/>n equals 0",
                "Return 0",
                "Recursive Call",
                "Store & Return",
                "End",
            ]
        );
        assert_eq!(
            chart.edges(),
            &[
                DiagramEdge::new(NodeId::Start, NodeId::Step(1)),
                DiagramEdge::affirmative(NodeId::Step(1), NodeId::Step(2)),
                DiagramEdge::new(NodeId::Step(2), NodeId::End),
                DiagramEdge::negative(NodeId::Step(1), NodeId::Step(3)),
                DiagramEdge::new(NodeId::Step(3), NodeId::Step(4)),
                DiagramEdge::new(NodeId::Step(4), NodeId::End),
            ]
        );
        assert_eq!(complexity, 2);
    }

    #[test]
    fn knapsack_builds_nested_decisions() {
        let (chart, complexity) = flowchart(KNAPSACK);

        assert_eq!(
            labels(&chart),
            vec![
                "Start",
                "knapsack",
                "Base Case?<br/>n equals 0 OR W equals 0",
                "Return 0",
                "Cached?<br/>Check memoization",
                "Return Cached",
                "Fits?<br/>W greater or equal wtn-1",
                "Recursive:<br/>take",
                "Recursive:<br/>skip",
                "Choose Best<br/>max/min",
                "Store & Return",
                "End",
            ]
        );
        assert_eq!(complexity, 4);

        // The bound check's "yes" branch leads to the combine step.
        let fits = NodeId::Step(6);
        let combine = NodeId::Step(9);
        assert!(
            chart
                .outgoing(fits)
                .any(|e| e.to == combine && e.is_affirmative())
        );
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let (chart, _) = flowchart(KNAPSACK);
        let steps: Vec<u32> = chart
            .nodes()
            .iter()
            .filter_map(|n| match n.id {
                NodeId::Step(k) => Some(k),
                _ => None,
            })
            .collect();
        assert!(steps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(steps.first(), Some(&1));
    }

    #[test]
    fn open_bound_check_gets_no_implicit_end_edge() {
        let (chart, complexity) = flowchart("if (W >= wt[i]) {");
        assert_eq!(complexity, 2);
        assert!(!chart.has_edge(NodeId::Step(1), NodeId::End));
        assert_eq!(chart.incoming(NodeId::End).count(), 0);
    }

    #[test]
    fn function_frontier_is_closed_to_end() {
        let (chart, _) = flowchart("def walk(tree):\n    pass");
        assert!(chart.has_edge(NodeId::Step(1), NodeId::End));
        assert_eq!(chart.node(NodeId::Step(1)).map(|n| n.shape), Some(ShapeKind::Subroutine));
    }

    #[test]
    fn repeated_affirmative_branch_becomes_negative() {
        let (chart, _) = flowchart("if (n == 0) return 0;\nreturn max(a(n), b(n));");
        let decision = NodeId::Step(1);
        assert_eq!(chart.outgoing(decision).filter(|e| e.is_affirmative()).count(), 1);
        assert_eq!(chart.outgoing(decision).filter(|e| e.is_negative()).count(), 1);
    }

    #[test]
    fn direction_follows_options() {
        let options = SynthesisOptions {
            direction: Direction::LeftRight,
            ..SynthesisOptions::default()
        };
        let synthesis = synthesize_flowchart("", &options);
        let chart = synthesis.diagram.as_flowchart().expect("flowchart");
        assert_eq!(chart.direction(), Direction::LeftRight);
    }
}
