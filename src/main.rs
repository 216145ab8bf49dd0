use codeflow::synthesis::{DiagramKind, SynthesisOptions};
use codeflow::{
    utils, version, visualize_directory, visualize_file, visualize_graph_json, visualize_markup,
};
use log::{error, info, warn};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Synthesize(DiagramKind),
    Sanitize,
    GraphJson,
}

impl Mode {
    fn parse(name: &str) -> Self {
        match name {
            "sanitize" => Mode::Sanitize,
            "graph-json" => Mode::GraphJson,
            other => match DiagramKind::parse(other) {
                Some(kind) => Mode::Synthesize(kind),
                None => {
                    warn!("Unsupported mode: {}. Using flowchart instead.", other);
                    Mode::Synthesize(DiagramKind::Flowchart)
                }
            },
        }
    }
}

fn main() -> std::io::Result<()> {
    // Initialize logger
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        error!("Not enough arguments provided");
        eprintln!(
            "Usage: {} <input_path> [output_path] [num_threads] [flowchart|class|sanitize|graph-json]",
            args[0]
        );
        eprintln!("Version: {}", version());
        return Ok(());
    }

    let input_path = Path::new(&args[1]);
    let output_path = args.get(2).map(Path::new).filter(|p| p.as_os_str() != "-");

    let num_threads = match args.get(3) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            let cpu_count = num_cpus::get();
            warn!(
                "Invalid thread count provided, defaulting to {} CPUs",
                cpu_count
            );
            cpu_count
        }),
        None => num_cpus::get(),
    };

    let mode = args.get(4).map_or(Mode::Synthesize(DiagramKind::Flowchart), |m| Mode::parse(m));
    let options = SynthesisOptions::default();

    info!("Codeflow v{}", version());
    info!("Input: {:?}", input_path);
    info!("Mode: {:?}", mode);

    let start_time = Instant::now();

    match mode {
        Mode::Synthesize(kind) if input_path.is_dir() => {
            let output_path = output_path.unwrap_or(Path::new("diagrams.json"));
            info!("Using {} threads", num_threads);
            visualize_directory(input_path, output_path, kind, &options, num_threads)?;
            info!("Output saved to: {:?}", output_path);
        }
        Mode::Synthesize(kind) => {
            let visualization = visualize_file(input_path, kind, &options)?;
            info!(
                "Complexity: {} ({:?})",
                visualization.complexity, visualization.level
            );
            utils::io::write_markup(&visualization.markup, output_path)?;
        }
        Mode::Sanitize | Mode::GraphJson => {
            let text = utils::io::read_source(input_path)?;
            let visualization = if mode == Mode::Sanitize {
                visualize_markup(&text)
            } else {
                visualize_graph_json(&text)
            };
            info!(
                "Complexity: {} ({:?})",
                visualization.complexity, visualization.level
            );
            utils::io::write_markup(&visualization.markup, output_path)?;
        }
    }

    info!("Completed in {:.2?}", start_time.elapsed());
    Ok(())
}
