use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Decision,
    Terminal,
    Subroutine,
    Cylinder,
}

impl ShapeKind {
    /// Opening and closing delimiters of the shape in diagram markup.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            ShapeKind::Rectangle => ("[", "]"),
            ShapeKind::Decision => ("{", "}"),
            ShapeKind::Terminal => ("((", "))"),
            ShapeKind::Subroutine => ("[[", "]]"),
            ShapeKind::Cylinder => ("[(", ")]"),
        }
    }

    /// Maps the shape names used by external graph descriptions.
    pub fn from_graph_type(kind: &str) -> Self {
        match kind {
            "rhombus" => ShapeKind::Decision,
            "circle" => ShapeKind::Terminal,
            "cylinder" => ShapeKind::Cylinder,
            "subroutine" => ShapeKind::Subroutine,
            _ => ShapeKind::Rectangle,
        }
    }
}

/// Identifier of a node within one flowchart.
///
/// The start and end terminals have fixed identities; every other node is
/// numbered by the synthesis counter in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Start,
    Step(u32),
    End,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Start => f.write_str("Start"),
            NodeId::End => f.write_str("End"),
            NodeId::Step(n) => write!(f, "N{}", n),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiagramNode {
    pub id: NodeId,
    pub label: String,
    pub shape: ShapeKind,
}

impl DiagramNode {
    pub fn new(id: NodeId, label: impl Into<String>, shape: ShapeKind) -> Self {
        DiagramNode {
            id,
            label: label.into(),
            shape,
        }
    }
}
