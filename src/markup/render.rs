use crate::diagram::{ClassDiagram, Diagram, DiagramEdge, DiagramNode, Flowchart};
use std::fmt::Write;

pub const FLOWCHART_HEADER: &str = "graph";
pub const CLASS_HEADER: &str = "classDiagram";

const INDENT: &str = "    ";

pub fn render(diagram: &Diagram) -> String {
    match diagram {
        Diagram::Flowchart(chart) => render_flowchart(chart),
        Diagram::Class(classes) => render_class_diagram(classes),
    }
}

/// Header, then every node, then every edge, each in insertion order.
pub fn render_flowchart(chart: &Flowchart) -> String {
    let mut out = format!("{} {}\n", FLOWCHART_HEADER, chart.direction());
    for node in chart.nodes() {
        out.push_str(&node_statement(node));
        out.push('\n');
    }
    for edge in chart.edges() {
        out.push_str(&edge_statement(edge));
        out.push('\n');
    }
    out
}

pub fn render_class_diagram(classes: &ClassDiagram) -> String {
    let mut out = format!("{}\n", CLASS_HEADER);
    for record in classes.classes() {
        let _ = writeln!(out, "{}class {} {{", INDENT, record.name);
        for member in record.fields.iter().chain(record.methods.iter()) {
            let _ = writeln!(out, "{}{}{}", INDENT, INDENT, member);
        }
        let _ = writeln!(out, "{}}}", INDENT);
    }
    out
}

pub fn node_statement(node: &DiagramNode) -> String {
    let (open, close) = node.shape.delimiters();
    format!("{}{}{}{}{}", INDENT, node.id, open, node.label, close)
}

pub fn edge_statement(edge: &DiagramEdge) -> String {
    match edge.label.as_deref() {
        Some(label) if !label.is_empty() => {
            format!("{}{} --|{}|--> {}", INDENT, edge.from, label, edge.to)
        }
        _ => format!("{}{} --> {}", INDENT, edge.from, edge.to),
    }
}
