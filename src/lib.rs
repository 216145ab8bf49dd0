pub mod batch;
pub mod diagram;
pub mod markup;
pub mod synthesis;
pub mod utils;

use log::{debug, info};
use markup::ComplexityLevel;
use serde::Serialize;
use std::io;
use std::path::Path;
use synthesis::{DiagramKind, SynthesisOptions};

/// Sanitized markup ready for a renderer, with its complexity score.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Visualization {
    pub markup: String,
    pub complexity: u32,
    pub level: ComplexityLevel,
}

impl Visualization {
    fn new(markup: String, complexity: u32) -> Self {
        let complexity = complexity.max(1);
        Visualization {
            markup,
            complexity,
            level: ComplexityLevel::from_score(complexity),
        }
    }
}

/// Synthesizes a diagram from source text without any external model.
pub fn visualize(code: &str, kind: DiagramKind, options: &SynthesisOptions) -> Visualization {
    let synthesis = synthesis::synthesize(code, kind, options);
    let rendered = markup::render(&synthesis.diagram);
    debug!("Rendered {} markup:\n{}", kind, rendered);
    Visualization::new(markup::sanitize(&rendered), synthesis.complexity)
}

/// Repairs markup produced elsewhere and estimates its complexity.
pub fn visualize_markup(text: &str) -> Visualization {
    let complexity = markup::estimate_complexity(text);
    Visualization::new(markup::sanitize(text), complexity)
}

/// Converts a JSON graph description into repaired markup.
pub fn visualize_graph_json(text: &str) -> Visualization {
    let converted = markup::graph_spec_to_markup(text);
    let complexity = markup::arrow_complexity(&converted);
    Visualization::new(markup::sanitize(&converted), complexity)
}

pub fn visualize_file(
    path: &Path,
    kind: DiagramKind,
    options: &SynthesisOptions,
) -> io::Result<Visualization> {
    let code = utils::io::read_source(path)?;
    Ok(visualize(&code, kind, options))
}

pub fn visualize_directory(
    root_path: &Path,
    output_path: &Path,
    kind: DiagramKind,
    options: &SynthesisOptions,
    num_threads: usize,
) -> io::Result<()> {
    info!("Starting {} synthesis for {:?}", kind, root_path);

    let reports = batch::process_directory_parallel(root_path, kind, options, num_threads)?;

    info!("Exporting {} diagrams to {:?}", reports.len(), output_path);
    utils::io::export_reports_to_json(&reports, output_path)?;

    info!("Synthesis complete: {} diagrams", reports.len());
    Ok(())
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
