//! Offline synthesis of diagrams from raw source text.

pub mod class;
pub mod classifier;
pub mod flowchart;
pub mod label;

pub use class::synthesize_class_diagram;
pub use classifier::{IntentTag, LineContext, LineIntent, SourceTraits, classify_line};
pub use flowchart::synthesize_flowchart;
pub use label::{DEFAULT_LABEL_LIMIT, normalize_label};

use crate::diagram::{Diagram, Direction};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    #[default]
    Flowchart,
    Class,
}

impl DiagramKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "flowchart" => Some(DiagramKind::Flowchart),
            "class" => Some(DiagramKind::Class),
            _ => None,
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Flowchart => f.write_str("flowchart"),
            DiagramKind::Class => f.write_str("class"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SynthesisOptions {
    pub direction: Direction,
    pub label_limit: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            direction: Direction::TopDown,
            label_limit: DEFAULT_LABEL_LIMIT,
        }
    }
}

/// A synthesized diagram with its branching score (always at least 1).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Synthesis {
    pub diagram: Diagram,
    pub complexity: u32,
}

pub fn synthesize(code: &str, kind: DiagramKind, options: &SynthesisOptions) -> Synthesis {
    debug!("Synthesizing {} from {} bytes of source", kind, code.len());
    match kind {
        DiagramKind::Flowchart => synthesize_flowchart(code, options),
        DiagramKind::Class => synthesize_class_diagram(code),
    }
}
