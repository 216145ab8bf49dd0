pub mod languages;
pub mod processor;

pub use languages::{Language, detect_language};
pub use processor::{DiagramReport, process_directory_parallel};
