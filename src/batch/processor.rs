use crate::Visualization;
use crate::batch::languages::{Language, detect_language, get_supported_extensions};
use crate::markup::ComplexityLevel;
use crate::synthesis::{DiagramKind, SynthesisOptions};
use log::{debug, error, info, trace, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of visualizing one source file in a batch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiagramReport {
    pub path: String,
    pub language: Language,
    pub kind: DiagramKind,
    pub markup: String,
    pub complexity: u32,
    pub level: ComplexityLevel,
}

pub fn process_directory_parallel(
    root_path: &Path,
    kind: DiagramKind,
    options: &SynthesisOptions,
    num_threads: usize,
) -> io::Result<Vec<DiagramReport>> {
    info!(
        "Starting parallel diagram synthesis with {} threads",
        num_threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(io::Error::other)?;

    info!("Scanning directory for supported files...");
    let files_to_process = collect_files_to_process(root_path)?;
    info!("Found {} files to process", files_to_process.len());

    let mut reports: Vec<DiagramReport> = pool.install(|| {
        files_to_process
            .par_iter()
            .filter_map(|(path, language)| {
                debug!("Processing file: {:?}", path);
                match fs::read_to_string(path) {
                    Ok(code) => {
                        let Visualization {
                            markup,
                            complexity,
                            level,
                        } = crate::visualize(&code, kind, options);
                        trace!("{:?}: complexity {}", path, complexity);
                        Some(DiagramReport {
                            path: path.to_string_lossy().into_owned(),
                            language: *language,
                            kind,
                            markup,
                            complexity,
                            level,
                        })
                    }
                    Err(e) => {
                        error!("Error reading file {:?}: {}", path, e);
                        None
                    }
                }
            })
            .collect()
    });

    reports.sort_by(|a, b| a.path.cmp(&b.path));

    let mut level_counts = HashMap::new();
    for report in &reports {
        *level_counts.entry(report.level).or_insert(0) += 1;
    }
    info!("Complexity level counts:");
    for (level, count) in level_counts {
        info!("  {:?}: {}", level, count);
    }

    Ok(reports)
}

fn collect_files_to_process(root_path: &Path) -> io::Result<Vec<(PathBuf, Language)>> {
    if !root_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", root_path.display()),
        ));
    }

    let supported_extensions: HashSet<&'static str> =
        get_supported_extensions().into_iter().collect();
    let mut visited_files = HashSet::new();
    let mut files_to_process = Vec::new();

    for entry in WalkDir::new(root_path).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            trace!("Skipping file without extension: {:?}", path);
            continue;
        };
        if !supported_extensions.contains(ext) {
            trace!("Skipping unsupported file: {:?}", path);
            continue;
        }
        let Some(language) = detect_language(path) else {
            continue;
        };

        let canonical_path = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to canonicalize path {:?}: {}", path, e);
                continue;
            }
        };

        if !visited_files.insert(canonical_path) {
            trace!("Skipping already visited file: {:?}", path);
            continue;
        }

        files_to_process.push((path.to_path_buf(), language));
    }

    Ok(files_to_process)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        fn new(prefix: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "codeflow-{prefix}-{}-{nanos}-{counter}",
                std::process::id()
            ));
            fs::create_dir_all(&path).unwrap();
            Self { path }
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn visualizes_supported_files_sorted_by_path() {
        let tmp = TempDir::new("batch");
        fs::create_dir_all(tmp.path.join("nested")).unwrap();
        fs::write(tmp.path.join("b.py"), "def fib(n):\n    if (n == 0): return 0\n").unwrap();
        fs::write(tmp.path.join("nested/a.cpp"), "int main() {}\n").unwrap();
        fs::write(tmp.path.join("notes.txt"), "if (n == 0)\n").unwrap();

        let reports = process_directory_parallel(
            &tmp.path,
            DiagramKind::Flowchart,
            &SynthesisOptions::default(),
            2,
        )
        .unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports[0].path.ends_with("b.py"));
        assert_eq!(reports[0].language, Language::Python);
        assert_eq!(reports[0].complexity, 2);
        assert!(reports[1].path.ends_with("a.cpp"));
        assert_eq!(reports[1].complexity, 1);
        assert!(reports.iter().all(|r| r.markup.starts_with("graph TD")));
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = process_directory_parallel(
            Path::new("/definitely/not/here/codeflow"),
            DiagramKind::Class,
            &SynthesisOptions::default(),
            1,
        );
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
