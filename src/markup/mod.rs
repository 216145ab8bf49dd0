//! Diagram markup: serialization, repair and scoring.

pub mod complexity;
pub mod graph_spec;
pub mod render;
pub mod sanitize;

pub use complexity::{ComplexityLevel, estimate_complexity};
pub use graph_spec::{GraphSpec, arrow_complexity, graph_spec_to_markup};
pub use render::{render, render_class_diagram, render_flowchart};
pub use sanitize::sanitize;
