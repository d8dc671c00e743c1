//! Language detection and enumeration.

use serde::{Deserialize, Serialize};

/// Supported source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Kotlin,
    Java,
    TypeScript,
    JavaScript,
}

impl Language {
    /// Detect language from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "kt" | "kts" => Some(Language::Kotlin),
            "java" => Some(Language::Java),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Detect language from a file path.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Default file extensions for this language.
    pub fn extensions(&self) -> &[&str] {
        match self {
            Language::Kotlin => &["kt", "kts"],
            Language::Java => &["java"],
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }

    /// Whether the language carries a textual package/module declaration.
    /// When it does not, a module path is inferred from the file path.
    pub fn has_package_declaration(&self) -> bool {
        matches!(self, Language::Kotlin | Language::Java)
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        match self {
            Language::Kotlin => "Kotlin",
            Language::Java => "Java",
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn detect_from_extension() {
        assert_eq!(Language::from_extension("kt"), Some(Language::Kotlin));
        assert_eq!(Language::from_extension("KT"), Some(Language::Kotlin));
        assert_eq!(Language::from_extension("java"), Some(Language::Java));
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("js"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("rb"), None);
    }

    #[test]
    fn detect_from_path() {
        assert_eq!(
            Language::from_path(Path::new("src/main/kotlin/App.kt")),
            Some(Language::Kotlin)
        );
        assert_eq!(
            Language::from_path(Path::new("src/User.java")),
            Some(Language::Java)
        );
        assert_eq!(Language::from_path(Path::new("README.md")), None);
    }

    #[test]
    fn package_declaration_presence() {
        assert!(Language::Kotlin.has_package_declaration());
        assert!(Language::Java.has_package_declaration());
        assert!(!Language::TypeScript.has_package_declaration());
        assert!(!Language::JavaScript.has_package_declaration());
    }
}
