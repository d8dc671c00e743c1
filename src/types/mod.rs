//! Shared value types used across all pipeline stages.

use serde::{Deserialize, Serialize};

/// A position span inside a source file.
///
/// Lines and columns are 1-based; the column is the visual column as an
/// editor would show it, not a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceLocation {
    pub fn new(
        file: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            file: file.into(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Identifies the call site this location belongs to: `file:line:column`.
    pub fn fingerprint(&self) -> String {
        format!("{}:{}:{}", self.file, self.start_line, self.start_column)
    }

    /// Sort key for source-order comparisons within one file.
    #[inline]
    pub fn position_key(&self) -> (u32, u32) {
        (self.start_line, self.start_column)
    }
}

/// Declared visibility, unified across the supported languages.
///
/// Java package-private and non-exported TypeScript module members both
/// map to `Internal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    Internal,
}

/// The kind of a class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn label(&self) -> &'static str {
        match self {
            ClassKind::Class => "Class",
            ClassKind::Interface => "Interface",
            ClassKind::Object => "Object",
            ClassKind::Enum => "Enum",
            ClassKind::Annotation => "Annotation",
        }
    }
}

/// Sentinel surface type used when an expression's type cannot be inferred.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Joins an optional package prefix with a simple name into an FQN.
pub fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}.{name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_includes_file_line_column() {
        let loc = SourceLocation::new("src/App.kt", 10, 5, 10, 20);
        assert_eq!(loc.fingerprint(), "src/App.kt:10:5");
    }

    #[test]
    fn position_key_orders_by_line_then_column() {
        let a = SourceLocation::new("f", 2, 9, 2, 12);
        let b = SourceLocation::new("f", 3, 1, 3, 4);
        let c = SourceLocation::new("f", 2, 11, 2, 14);
        assert!(a.position_key() < b.position_key());
        assert!(a.position_key() < c.position_key());
    }

    #[test]
    fn qualify_handles_missing_prefix() {
        assert_eq!(qualify(Some("com.example"), "User"), "com.example.User");
        assert_eq!(qualify(None, "User"), "User");
        assert_eq!(qualify(Some(""), "User"), "User");
    }
}
