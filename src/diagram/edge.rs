use super::node::NodeId;
use serde::Serialize;

pub const AFFIRMATIVE: &str = "Yes";
pub const NEGATIVE: &str = "No";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiagramEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: Option<String>,
}

impl DiagramEdge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        DiagramEdge {
            from,
            to,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Edge leaving a decision on its "yes" branch.
    pub fn affirmative(from: NodeId, to: NodeId) -> Self {
        Self::new(from, to).with_label(AFFIRMATIVE)
    }

    /// Edge leaving a decision on its "no" branch.
    pub fn negative(from: NodeId, to: NodeId) -> Self {
        Self::new(from, to).with_label(NEGATIVE)
    }

    pub fn is_affirmative(&self) -> bool {
        self.label.as_deref() == Some(AFFIRMATIVE)
    }

    pub fn is_negative(&self) -> bool {
        self.label.as_deref() == Some(NEGATIVE)
    }
}
