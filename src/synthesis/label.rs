//! Label text normalization for synthesized nodes.

pub const DEFAULT_LABEL_LIMIT: usize = 40;
pub const FALLBACK_LABEL: &str = "Step";

// Order matters: two-character operators before their one-character prefixes.
const OPERATOR_WORDS: &[(&str, &str)] = &[
    ("||", " OR "),
    ("&&", " AND "),
    ("!=", " not equal "),
    ("==", " equals "),
    ("<=", " less or equal "),
    (">=", " greater or equal "),
    ("<", " less "),
    (">", " greater "),
];

const STRIPPED_CHARS: &[char] = &['"', '{', '}', '(', ')', '[', ']', ':', '|', '&'];

/// Rewrites free text into something safe to place between shape delimiters.
///
/// Comparison operators become words, delimiter-like characters are dropped,
/// whitespace collapses and the result is cut to `limit` characters. Text that
/// normalizes to nothing becomes [`FALLBACK_LABEL`].
pub fn normalize_label(text: &str, limit: usize) -> String {
    let mut worded = text.to_string();
    for (operator, word) in OPERATOR_WORDS {
        worded = worded.replace(operator, word);
    }

    let stripped: String = worded
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(limit).collect();
    let truncated = truncated.trim_end();

    if truncated.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        truncated.to_string()
    }
}
