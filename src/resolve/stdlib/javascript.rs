//! JavaScript standard-library tables.
//!
//! The runtime surface is the same as TypeScript's (same globals, same
//! Node built-ins); only the builtin-type set differs since JavaScript
//! has no type annotations beyond inferred literal types.

use super::StdlibProvider;
use super::typescript;
use std::collections::HashSet;
use std::sync::OnceLock;

static BUILTIN_TYPES: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn builtin_types() -> &'static HashSet<&'static str> {
    BUILTIN_TYPES
        .get_or_init(|| HashSet::from(["string", "number", "boolean", "object", "undefined"]))
}

/// Provider for JavaScript built-ins.
#[derive(Debug, Default)]
pub struct JavaScriptStdlib;

impl StdlibProvider for JavaScriptStdlib {
    fn lookup_function(&self, name: &str) -> Option<&'static str> {
        typescript::functions().get(name).copied()
    }

    fn lookup_class(&self, name: &str) -> Option<&'static str> {
        typescript::classes().get(name).copied()
    }

    fn lookup_static_method(&self, qualified: &str) -> Option<&'static str> {
        typescript::static_methods().get(qualified).copied()
    }

    fn is_builtin_type(&self, name: &str) -> bool {
        builtin_types().contains(name)
    }

    fn default_wildcard_imports(&self) -> &'static [&'static str] {
        &[]
    }

    fn synthetic_file(&self) -> &'static str {
        "<javascript-stdlib>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_runtime_tables_with_typescript() {
        assert_eq!(JavaScriptStdlib.lookup_function("parseInt"), Some("parseInt"));
        assert_eq!(
            JavaScriptStdlib.lookup_static_method("JSON.parse"),
            Some("JSON.parse")
        );
    }

    #[test]
    fn no_typescript_only_types() {
        assert!(!JavaScriptStdlib.is_builtin_type("unknown"));
        assert!(JavaScriptStdlib.is_builtin_type("number"));
    }
}
