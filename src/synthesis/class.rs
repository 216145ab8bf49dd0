use crate::diagram::{ClassDiagram, ClassRecord, Diagram};
use crate::synthesis::Synthesis;
use log::{debug, info, trace};
use regex::Regex;
use std::sync::LazyLock;

static CLASS_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(\w+)").expect("valid regex"));
static METHOD_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:int|void|bool|string)\s+(\w+)\s*\(").expect("valid regex")
});
static ACCESS_SPECIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:private|public|protected):").expect("valid regex"));

pub const PLACEHOLDER_CLASS: &str = "Algorithm";
pub const PLACEHOLDER_METHODS: [&str; 2] = ["+execute()", "+solve()"];

/// Builds a class diagram from `class` declarations and the typed methods
/// that follow them.
///
/// Fields are never detected. Input without any class yields a single
/// placeholder record.
pub fn synthesize_class_diagram(code: &str) -> Synthesis {
    let mut classes = ClassDiagram::new();
    let mut current: Option<usize> = None;
    let mut complexity = 1;

    for line in code.lines() {
        let trimmed = line.trim();

        if let Some(caps) = CLASS_DECL.captures(trimmed) {
            debug!("Found class: {}", &caps[1]);
            current = Some(classes.open_class(&caps[1]));
            complexity += 1;
            continue;
        }

        let Some(class_idx) = current else {
            continue;
        };

        if let Some(caps) = METHOD_DECL.captures(trimmed) {
            debug!("Found method: {}", &caps[1]);
            classes.add_method(class_idx, format!("+{}()", &caps[1]));
        } else if ACCESS_SPECIFIER.is_match(trimmed) {
            trace!("Skipping access specifier: {}", trimmed);
        }
    }

    if classes.is_empty() {
        debug!("No classes found, using placeholder record");
        let record = PLACEHOLDER_METHODS
            .iter()
            .fold(ClassRecord::new(PLACEHOLDER_CLASS), |record, method| {
                record.with_method(*method)
            });
        classes.push_record(record);
        complexity += 1;
    }

    info!(
        "Synthesized class diagram with {} classes (complexity {})",
        classes.class_count(),
        complexity
    );

    Synthesis {
        diagram: Diagram::Class(classes),
        complexity,
    }
}
