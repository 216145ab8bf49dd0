use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%%\s*Complexity:\s*(\d+)").expect("valid regex"));
static DECISION_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("valid regex"));

/// Estimates branching complexity of markup text.
///
/// An explicit `%% Complexity: N` annotation wins; otherwise every `{...}`
/// shape counts as one decision on top of a base score of 1.
pub fn estimate_complexity(markup: &str) -> u32 {
    if let Some(score) = ANNOTATION
        .captures(markup)
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        return score.max(1);
    }

    let decisions = DECISION_SHAPE.find_iter(markup).count();
    u32::try_from(decisions).unwrap_or(u32::MAX - 1) + 1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=5 => ComplexityLevel::Low,
            6..=10 => ComplexityLevel::Medium,
            _ => ComplexityLevel::High,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ComplexityLevel::Low => "Simple and easy to maintain",
            ComplexityLevel::Medium => "Moderate complexity, maintainable",
            ComplexityLevel::High => "High complexity, consider refactoring",
        }
    }
}
