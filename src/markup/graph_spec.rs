//! Structured graph descriptions produced by external generators.

use crate::diagram::{Direction, ShapeKind};
use crate::markup::render::FLOWCHART_HEADER;
use log::{error, warn};
use regex::Regex;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::LazyLock;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```json\n?|\n?```").expect("valid regex"));

pub const PARSE_FAILURE_MARKUP: &str = "graph TD\n    Error[Failed to parse graph description]";

const NODE_LABEL_STRIPPED: &[char] = &['"', '(', ')', '[', ']', '{', '}'];

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GraphSpec {
    #[serde(default)]
    pub direction: Option<String>,
    pub nodes: Vec<GraphSpecNode>,
    #[serde(default)]
    pub edges: Vec<GraphSpecEdge>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GraphSpecNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GraphSpecEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl GraphSpec {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let unfenced = JSON_FENCE.replace_all(text, "");
        serde_json::from_str(unfenced.trim())
    }

    pub fn direction(&self) -> Direction {
        match self.direction.as_deref() {
            None | Some("") => Direction::default(),
            Some(token) => Direction::parse(token).unwrap_or_else(|| {
                warn!("Unsupported direction {:?}, using {}", token, Direction::default());
                Direction::default()
            }),
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = format!("{} {}\n", FLOWCHART_HEADER, self.direction());

        for node in &self.nodes {
            let shape = node
                .kind
                .as_deref()
                .map_or(ShapeKind::Rectangle, ShapeKind::from_graph_type);
            let (open, close) = shape.delimiters();
            let label: String = node
                .label
                .as_deref()
                .unwrap_or("")
                .chars()
                .filter(|c| !NODE_LABEL_STRIPPED.contains(c))
                .collect();
            let _ = writeln!(out, "    {}{}{}{}", node.id, open, label, close);
        }

        for edge in &self.edges {
            match edge.label.as_deref().filter(|l| !l.is_empty()) {
                Some(label) => {
                    let _ = writeln!(
                        out,
                        "    {} --|{}|--> {}",
                        edge.from,
                        label.replace('"', ""),
                        edge.to
                    );
                }
                None => {
                    let _ = writeln!(out, "    {} --> {}", edge.from, edge.to);
                }
            }
        }

        out
    }
}

/// Converts a JSON graph description to flowchart markup, or to a single
/// error node when it cannot be decoded.
pub fn graph_spec_to_markup(text: &str) -> String {
    match GraphSpec::parse(text) {
        Ok(spec) => spec.to_markup(),
        Err(e) => {
            error!("Failed to decode graph description: {}", e);
            PARSE_FAILURE_MARKUP.to_string()
        }
    }
}

/// Complexity of converted markup: one per arrow, plus two.
pub fn arrow_complexity(markup: &str) -> u32 {
    let arrows = markup.matches("-->").count();
    u32::try_from(arrows).unwrap_or(u32::MAX - 2) + 2
}
