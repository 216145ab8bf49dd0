use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Cpp,
    Java,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Cpp => "cpp",
            Language::Java => "java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn detect_language_from_extension(extension: &str) -> Option<Language> {
    match extension {
        "py" => Some(Language::Python),
        "js" | "jsx" | "mjs" => Some(Language::JavaScript),
        "ts" | "tsx" => Some(Language::TypeScript),
        "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" => Some(Language::Cpp),
        "java" => Some(Language::Java),
        _ => None,
    }
}

pub fn detect_language(file_path: &Path) -> Option<Language> {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(detect_language_from_extension)
}

pub fn get_supported_extensions() -> Vec<&'static str> {
    vec![
        "py", "js", "jsx", "mjs", "ts", "tsx", "c", "h", "cpp", "cc", "cxx", "hpp", "java",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_extension_maps_to_a_language() {
        for ext in get_supported_extensions() {
            assert!(detect_language_from_extension(ext).is_some(), "{}", ext);
        }
    }

    #[test]
    fn detects_from_path() {
        assert_eq!(detect_language(Path::new("src/fib.py")), Some(Language::Python));
        assert_eq!(detect_language(Path::new("knapsack.cpp")), Some(Language::Cpp));
        assert_eq!(detect_language(Path::new("README.md")), None);
        assert_eq!(detect_language(Path::new("Makefile")), None);
    }
}
