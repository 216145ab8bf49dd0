//! Per-line intent classification.
//!
//! Recognition is a fixed, ordered table of rules. The first rule that
//! accepts a line decides its intent; nothing here parses a language.

use log::trace;
use regex::Regex;
use std::sync::LazyLock;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:int|void|bool|def|function)\s+(\w+)\s*\(").expect("valid regex")
});
static BASE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"if\s*\([^)]*==\s*0[^)]*\)").expect("valid regex"));
static MEMO_LOOKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"if\s*\([^)]*\[.*\]\s*!=\s*-1").expect("valid regex"));
static BOUND_CHECK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"if\s*\([^)]*>=.*\[").expect("valid regex"));
static ASSIGN_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*=").expect("valid regex"));
static COMBINE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"return.*(?:max|min)\(").expect("valid regex"));
static CALL_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^return\s+\w+\(").expect("valid regex"));
static IF_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^if\s*\(?").expect("valid regex"));
static ELSE_IF_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:else\s+)?if\s*\(?").expect("valid regex"));
static CONDITION_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\).*$").expect("valid regex"));

const IGNORED_PREFIXES: &[&str] = &["//", "/*", "#", "using", "import ", "from "];
const MEMO_MARKERS: &[&str] = &["dp[", "memo[", "cache["];
const CHOOSE_BEST_MARKERS: &[&str] = &["max(", "min("];

/// Whole-text traits some rules depend on, computed once per synthesis call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceTraits {
    pub has_memoization: bool,
    pub has_choose_best: bool,
}

impl SourceTraits {
    pub fn scan(code: &str) -> Self {
        SourceTraits {
            has_memoization: MEMO_MARKERS.iter().any(|m| code.contains(m)),
            has_choose_best: CHOOSE_BEST_MARKERS.iter().any(|m| code.contains(m)),
        }
    }
}

/// What the classifier may consult besides the line itself.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub traits: SourceTraits,
    pub known_functions: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentTag {
    FunctionDecl,
    BaseCase,
    MemoLookup,
    BoundCheck,
    RecursiveAssign,
    CombineReturn,
    RecursiveReturn,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIntent {
    FunctionDecl { name: String },
    BaseCase { condition: String },
    MemoLookup,
    BoundCheck { condition: String },
    RecursiveAssign { target: Option<String> },
    CombineReturn,
    RecursiveReturn,
    Ignore,
}

impl LineIntent {
    pub fn tag(&self) -> IntentTag {
        match self {
            LineIntent::FunctionDecl { .. } => IntentTag::FunctionDecl,
            LineIntent::BaseCase { .. } => IntentTag::BaseCase,
            LineIntent::MemoLookup => IntentTag::MemoLookup,
            LineIntent::BoundCheck { .. } => IntentTag::BoundCheck,
            LineIntent::RecursiveAssign { .. } => IntentTag::RecursiveAssign,
            LineIntent::CombineReturn => IntentTag::CombineReturn,
            LineIntent::RecursiveReturn => IntentTag::RecursiveReturn,
            LineIntent::Ignore => IntentTag::Ignore,
        }
    }
}

struct Rule {
    tag: IntentTag,
    apply: fn(&str, &LineContext<'_>) -> Option<LineIntent>,
}

static RULES: &[Rule] = &[
    Rule {
        tag: IntentTag::FunctionDecl,
        apply: match_declaration,
    },
    Rule {
        tag: IntentTag::BaseCase,
        apply: match_base_case,
    },
    Rule {
        tag: IntentTag::MemoLookup,
        apply: match_memo_lookup,
    },
    Rule {
        tag: IntentTag::BoundCheck,
        apply: match_bound_check,
    },
    Rule {
        tag: IntentTag::RecursiveAssign,
        apply: match_recursive_assign,
    },
    Rule {
        tag: IntentTag::CombineReturn,
        apply: match_combine_return,
    },
    Rule {
        tag: IntentTag::RecursiveReturn,
        apply: match_recursive_return,
    },
];

/// Classifies one physical line. Leading and trailing whitespace is ignored.
pub fn classify_line(line: &str, ctx: &LineContext<'_>) -> LineIntent {
    let line = line.trim();
    if line.is_empty() || IGNORED_PREFIXES.iter().any(|p| line.starts_with(p)) {
        return LineIntent::Ignore;
    }

    for rule in RULES {
        if let Some(intent) = (rule.apply)(line, ctx) {
            trace!("Rule {:?} matched line: {}", rule.tag, line);
            return intent;
        }
    }

    LineIntent::Ignore
}

fn match_declaration(line: &str, _ctx: &LineContext<'_>) -> Option<LineIntent> {
    DECLARATION
        .captures(line)
        .map(|caps| LineIntent::FunctionDecl {
            name: caps[1].to_string(),
        })
}

fn match_base_case(line: &str, _ctx: &LineContext<'_>) -> Option<LineIntent> {
    BASE_CASE.is_match(line).then(|| LineIntent::BaseCase {
        condition: extract_condition(&IF_PREFIX, line),
    })
}

fn match_memo_lookup(line: &str, ctx: &LineContext<'_>) -> Option<LineIntent> {
    (ctx.traits.has_memoization && MEMO_LOOKUP.is_match(line)).then_some(LineIntent::MemoLookup)
}

fn match_bound_check(line: &str, _ctx: &LineContext<'_>) -> Option<LineIntent> {
    BOUND_CHECK.is_match(line).then(|| LineIntent::BoundCheck {
        condition: extract_condition(&ELSE_IF_PREFIX, line),
    })
}

fn match_recursive_assign(line: &str, ctx: &LineContext<'_>) -> Option<LineIntent> {
    let calls_known = ctx
        .known_functions
        .iter()
        .any(|name| line.contains(&format!("{}(", name)));
    if !calls_known || !line.contains('=') || line.contains("return") {
        return None;
    }

    let target = ASSIGN_TARGET
        .captures(line)
        .map(|caps| caps[1].to_string());
    Some(LineIntent::RecursiveAssign { target })
}

fn match_combine_return(line: &str, ctx: &LineContext<'_>) -> Option<LineIntent> {
    (ctx.traits.has_choose_best && COMBINE_RETURN.is_match(line))
        .then_some(LineIntent::CombineReturn)
}

fn match_recursive_return(line: &str, _ctx: &LineContext<'_>) -> Option<LineIntent> {
    let recursive =
        CALL_RETURN.is_match(line) && !line.contains("max") && !line.contains("min");
    recursive.then_some(LineIntent::RecursiveReturn)
}

/// Text between the leading `if (` and the first closing parenthesis.
fn extract_condition(prefix: &Regex, line: &str) -> String {
    let without_prefix = prefix.replace(line, "");
    CONDITION_TAIL.replace(&without_prefix, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx<'a>(traits: SourceTraits, known: &'a [String]) -> LineContext<'a> {
        LineContext {
            traits,
            known_functions: known,
        }
    }

    fn all_traits() -> SourceTraits {
        SourceTraits {
            has_memoization: true,
            has_choose_best: true,
        }
    }

    #[rstest]
    #[case("int knapsack(int W, int n) {", "knapsack")]
    #[case("def fib(n):", "fib")]
    #[case("function solve (arr) {", "solve")]
    #[case("void   helper(){", "helper")]
    fn declarations_capture_identifier(#[case] line: &str, #[case] name: &str) {
        let known = Vec::new();
        assert_eq!(
            classify_line(line, &ctx(all_traits(), &known)),
            LineIntent::FunctionDecl {
                name: name.to_string()
            }
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("// int fib(int n)")]
    #[case("#include <vector>")]
    #[case("using namespace std;")]
    #[case("import os")]
    #[case("x = 1;")]
    fn comments_imports_and_noise_are_ignored(#[case] line: &str) {
        let known = Vec::new();
        assert_eq!(classify_line(line, &ctx(all_traits(), &known)), LineIntent::Ignore);
    }

    #[test]
    fn base_case_extracts_condition() {
        let known = Vec::new();
        let intent = classify_line("if (n == 0 || W == 0) return 0;", &ctx(all_traits(), &known));
        assert_eq!(
            intent,
            LineIntent::BaseCase {
                condition: "n == 0 || W == 0".to_string()
            }
        );
    }

    #[test]
    fn memo_lookup_requires_memoization_in_source() {
        let known = Vec::new();
        let line = "if (dp[n][W] != -1) return dp[n][W];";
        assert_eq!(classify_line(line, &ctx(all_traits(), &known)), LineIntent::MemoLookup);

        let plain = SourceTraits::default();
        assert_eq!(classify_line(line, &ctx(plain, &known)), LineIntent::Ignore);
    }

    #[test]
    fn bound_check_strips_else_prefix() {
        let known = Vec::new();
        for line in ["else if (W >= wt[n-1]) {", "if (W >= wt[n-1]) {"] {
            assert_eq!(
                classify_line(line, &ctx(all_traits(), &known)),
                LineIntent::BoundCheck {
                    condition: "W >= wt[n-1".to_string()
                }
            );
        }
    }

    #[test]
    fn recursive_assignment_needs_a_known_function() {
        let known = vec!["knapsack".to_string()];
        let line = "int take = val[n-1] + knapsack(W - wt[n-1], n - 1);";
        // `int take =` is not a declaration: no parenthesis follows the identifier.
        assert_eq!(
            classify_line(line, &ctx(all_traits(), &known)),
            LineIntent::RecursiveAssign {
                target: Some("take".to_string())
            }
        );

        let unknown = Vec::new();
        assert_eq!(classify_line(line, &ctx(all_traits(), &unknown)), LineIntent::Ignore);
    }

    #[test]
    fn return_statements_are_not_assignments() {
        let known = vec!["fib".to_string()];
        let intent = classify_line("return fib(n-1) + fib(n-2);", &ctx(all_traits(), &known));
        assert_eq!(intent, LineIntent::RecursiveReturn);
    }

    #[test]
    fn combine_return_requires_choose_best_in_source() {
        let known = Vec::new();
        let line = "return dp[n][W] = max(take, skip);";
        assert_eq!(classify_line(line, &ctx(all_traits(), &known)), LineIntent::CombineReturn);

        let plain = SourceTraits::default();
        assert_eq!(classify_line(line, &ctx(plain, &known)), LineIntent::Ignore);
    }

    #[test]
    fn earlier_rules_win() {
        let known = vec!["fib".to_string()];
        // Both a declaration and a base case; the declaration rule is first.
        let intent = classify_line("int fib(int n) { if (n == 0) return 0; }", &ctx(all_traits(), &known));
        assert_eq!(intent.tag(), IntentTag::FunctionDecl);
    }

    #[test]
    fn source_traits_detect_markers() {
        let traits = SourceTraits::scan("memo[i] = min(a, b)");
        assert!(traits.has_memoization);
        assert!(traits.has_choose_best);
        assert_eq!(SourceTraits::scan("plain text"), SourceTraits::default());
    }
}
