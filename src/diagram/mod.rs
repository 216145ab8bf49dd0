mod class;
mod edge;
mod node;

pub use class::{ClassDiagram, ClassRecord};
pub use edge::{AFFIRMATIVE, DiagramEdge, NEGATIVE};
pub use node::{DiagramNode, NodeId, ShapeKind};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    TopDown,
    LeftRight,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::LeftRight => "LR",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "TD" | "TB" => Some(Direction::TopDown),
            "LR" => Some(Direction::LeftRight),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed node/edge graph, kept in emission order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Flowchart {
    direction: Direction,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl Flowchart {
    pub fn new(direction: Direction) -> Self {
        Flowchart {
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: DiagramNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: DiagramEdge) {
        self.edges.push(edge);
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn node(&self, id: NodeId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &DiagramEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &DiagramEdge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    pub fn find_nodes_by_shape(&self, shape: ShapeKind) -> Vec<&DiagramNode> {
        self.nodes.iter().filter(|n| n.shape == shape).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum Diagram {
    Flowchart(Flowchart),
    Class(ClassDiagram),
}

impl Diagram {
    pub fn as_flowchart(&self) -> Option<&Flowchart> {
        match self {
            Diagram::Flowchart(chart) => Some(chart),
            Diagram::Class(_) => None,
        }
    }

    pub fn as_class_diagram(&self) -> Option<&ClassDiagram> {
        match self {
            Diagram::Class(classes) => Some(classes),
            Diagram::Flowchart(_) => None,
        }
    }
}
