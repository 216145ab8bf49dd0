//! Best-effort repair of diagram markup.
//!
//! Every input produces output; constructs none of the passes recognize are
//! left untouched. Running the repair twice gives the same text as running it
//! once.

use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static MERMAID_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```mermaid\n?").expect("valid regex"));
static BARE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\n?").expect("valid regex"));
static COMPLEXITY_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%%\s*Complexity:\s*\d+").expect("valid regex"));

static CYLINDER_SQUARE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\(([^)\n]+)\]\]").expect("valid regex"));
static CYLINDER_SHORT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\(([^)\]\n]+)\]").expect("valid regex"));
static SUBROUTINE_SHORT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]\n]+)\]").expect("valid regex"));
static TERMINAL_SHORT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)\(\(([^()\n]+)\)").expect("valid regex"));
static DECISION_WRONG_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)\{([^{}\[\]()\n]+)[\])]").expect("valid regex"));
static DECISION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

const HEADER_PREFIXES: &[&str] = &["graph ", "flowchart ", "classDiagram"];
const STATEMENT_INDENT: &str = "    ";
const MAX_PASSES: usize = 16;

/// Runs every cleanup step until the markup stops changing, so a repair that
/// exposes another malformed construct is handled in the same call.
pub fn sanitize(markup: &str) -> String {
    let mut cleaned = markup.to_string();
    for _ in 0..MAX_PASSES {
        let next = sanitize_pass(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    if cleaned != markup {
        debug!("Sanitizer rewrote markup ({} -> {} bytes)", markup.len(), cleaned.len());
    }
    cleaned
}

fn sanitize_pass(markup: &str) -> String {
    let cleaned = strip_wrappers(markup);
    let cleaned = repair_shape_delimiters(&cleaned);
    let cleaned = rewrite_label_brackets(&cleaned);
    split_statements(&cleaned)
}

/// Drops code fences and complexity annotations. Removing one wrapper can
/// join its neighbours into another, so removal repeats until nothing matches.
pub fn strip_wrappers(markup: &str) -> String {
    let mut cleaned = trim_blank_edges(markup).to_string();
    loop {
        let next = MERMAID_FENCE.replace_all(&cleaned, "");
        let next = BARE_FENCE.replace_all(&next, "");
        let next = COMPLEXITY_NOTE.replace_all(&next, "");
        let next = trim_blank_edges(&next).to_string();
        if next == cleaned {
            return cleaned;
        }
        cleaned = next;
    }
}

/// Trims trailing whitespace and leading blank lines, keeping the indentation
/// of the first statement.
fn trim_blank_edges(text: &str) -> &str {
    let text = text.trim_end();
    match text.find(|c: char| !c.is_whitespace()) {
        Some(first) => {
            let line_start = text[..first].rfind('\n').map_or(0, |idx| idx + 1);
            &text[line_start..]
        }
        None => "",
    }
}

/// Closes truncated or mismatched shapes with the delimiter their opener needs.
pub fn repair_shape_delimiters(markup: &str) -> String {
    let fixed = CYLINDER_SQUARE_CLOSE
        .replace_all(markup, "[($1)]")
        .into_owned();
    let fixed = replace_unless_followed_by(&fixed, &CYLINDER_SHORT_CLOSE, ']', |caps| {
        format!("[({})]", &caps[1])
    });
    let fixed = replace_unless_followed_by(&fixed, &SUBROUTINE_SHORT_CLOSE, ']', |caps| {
        format!("[[{}]]", &caps[1])
    });
    let fixed = replace_unless_followed_by(&fixed, &TERMINAL_SHORT_CLOSE, ')', |caps| {
        format!("{}(({}))", &caps[1], &caps[2])
    });
    replace_unless_followed_by(&fixed, &DECISION_WRONG_CLOSE, '}', |caps| {
        format!("{}{{{}}}", &caps[1], &caps[2])
    })
}

/// Rewrites nested brackets and double quotes inside decision and rectangle
/// labels.
pub fn rewrite_label_brackets(markup: &str) -> String {
    let diamonds = DECISION_LABEL.replace_all(markup, |caps: &Captures| {
        format!("{{{}}}", neutralize(&caps[1]))
    });
    rewrite_rectangle_labels(&diamonds)
}

/// Splits lines holding several statements glued together.
///
/// A shape closer followed by at least two spaces and an uppercase letter
/// starts a new statement.
pub fn split_statements(markup: &str) -> String {
    let mut fixed_lines = Vec::new();

    for line in markup.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || HEADER_PREFIXES.iter().any(|h| trimmed.starts_with(h)) {
            fixed_lines.push(line.to_string());
            continue;
        }

        let parts = statement_parts(trimmed);
        if parts.len() > 1 {
            debug!("Split line into {} statements: {}", parts.len(), trimmed);
            fixed_lines.extend(parts.into_iter().map(|p| format!("{}{}", STATEMENT_INDENT, p)));
        } else {
            fixed_lines.push(line.to_string());
        }
    }

    fixed_lines.join("\n")
}

fn statement_parts(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        if matches!(ch, ']' | '}' | ')') {
            let mut j = i + 1;
            while j < chars.len() && chars[j] == ' ' {
                j += 1;
            }
            let spaces = j - (i + 1);
            if spaces >= 2 && j < chars.len() && chars[j].is_ascii_uppercase() {
                parts.push(buffer.trim().to_string());
                buffer.clear();
                i = j;
                continue;
            }
        }
        i += 1;
    }

    if !buffer.trim().is_empty() {
        parts.push(buffer.trim().to_string());
    }
    parts
}

fn neutralize(label: &str) -> String {
    label.replace('[', "(").replace(']', ")").replace('"', "'")
}

/// `[label]` that is neither a cylinder `[(`, a subroutine `[[`, nor the inner
/// bracket of one.
fn rewrite_rectangle_labels(markup: &str) -> String {
    let bytes = markup.as_bytes();
    let mut out = String::with_capacity(markup.len());
    let mut i = 0;

    while i < markup.len() {
        if bytes[i] == b'[' && opens_rectangle(bytes, i) {
            let close = markup[i + 1..]
                .find([']', '\n'])
                .filter(|offset| bytes[i + 1 + offset] == b']')
                .map(|offset| i + 1 + offset);
            if let Some(close) = close {
                if close > i + 1 && bytes.get(close + 1) != Some(&b']') {
                    out.push('[');
                    out.push_str(&neutralize(&markup[i + 1..close]));
                    out.push(']');
                    i = close + 1;
                    continue;
                }
            }
        }

        match markup[i..].chars().next() {
            Some(ch) => {
                out.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }

    out
}

fn opens_rectangle(bytes: &[u8], i: usize) -> bool {
    let next = bytes.get(i + 1);
    let prev_is_bracket = i > 0 && bytes[i - 1] == b'[';
    next != Some(&b'(') && next != Some(&b'[') && !prev_is_bracket
}

/// Like `Regex::replace_all`, but a match directly followed by `forbidden` is
/// skipped and matching resumes one character later.
fn replace_unless_followed_by<F>(text: &str, pattern: &Regex, forbidden: char, rewrite: F) -> String
where
    F: Fn(&Captures) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = pattern.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        if text[whole.end()..].starts_with(forbidden) {
            pos = whole.start()
                + text[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
            continue;
        }

        out.push_str(&text[copied..whole.start()]);
        out.push_str(&rewrite(&caps));
        copied = whole.end();
        pos = whole.end();
    }

    out.push_str(&text[copied..]);
    out
}
