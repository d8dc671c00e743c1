//! Kotlin standard-library tables.

use super::StdlibProvider;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static FUNCTIONS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static CLASSES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static STATIC_METHODS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static BUILTIN_TYPES: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn functions() -> &'static HashMap<&'static str, &'static str> {
    FUNCTIONS.get_or_init(|| {
        HashMap::from([
            ("println", "kotlin.io.println"),
            ("print", "kotlin.io.print"),
            ("readLine", "kotlin.io.readLine"),
            ("listOf", "kotlin.collections.listOf"),
            ("mutableListOf", "kotlin.collections.mutableListOf"),
            ("mapOf", "kotlin.collections.mapOf"),
            ("mutableMapOf", "kotlin.collections.mutableMapOf"),
            ("setOf", "kotlin.collections.setOf"),
            ("mutableSetOf", "kotlin.collections.mutableSetOf"),
            ("emptyList", "kotlin.collections.emptyList"),
            ("emptyMap", "kotlin.collections.emptyMap"),
            ("emptySet", "kotlin.collections.emptySet"),
            ("arrayOf", "kotlin.arrayOf"),
            ("arrayOfNulls", "kotlin.arrayOfNulls"),
            ("require", "kotlin.require"),
            ("requireNotNull", "kotlin.requireNotNull"),
            ("check", "kotlin.check"),
            ("checkNotNull", "kotlin.checkNotNull"),
            ("error", "kotlin.error"),
            ("TODO", "kotlin.TODO"),
            ("lazy", "kotlin.lazy"),
            ("run", "kotlin.run"),
            ("with", "kotlin.with"),
            ("repeat", "kotlin.repeat"),
            ("buildString", "kotlin.text.buildString"),
            ("buildList", "kotlin.collections.buildList"),
            ("buildMap", "kotlin.collections.buildMap"),
        ])
    })
}

fn classes() -> &'static HashMap<&'static str, &'static str> {
    CLASSES.get_or_init(|| {
        HashMap::from([
            ("String", "kotlin.String"),
            ("Int", "kotlin.Int"),
            ("Long", "kotlin.Long"),
            ("Short", "kotlin.Short"),
            ("Byte", "kotlin.Byte"),
            ("Float", "kotlin.Float"),
            ("Double", "kotlin.Double"),
            ("Boolean", "kotlin.Boolean"),
            ("Char", "kotlin.Char"),
            ("Unit", "kotlin.Unit"),
            ("Any", "kotlin.Any"),
            ("Nothing", "kotlin.Nothing"),
            ("Array", "kotlin.Array"),
            ("Pair", "kotlin.Pair"),
            ("Triple", "kotlin.Triple"),
            ("List", "kotlin.collections.List"),
            ("MutableList", "kotlin.collections.MutableList"),
            ("Map", "kotlin.collections.Map"),
            ("MutableMap", "kotlin.collections.MutableMap"),
            ("Set", "kotlin.collections.Set"),
            ("MutableSet", "kotlin.collections.MutableSet"),
            ("StringBuilder", "kotlin.text.StringBuilder"),
            ("Regex", "kotlin.text.Regex"),
            ("Exception", "kotlin.Exception"),
            ("RuntimeException", "kotlin.RuntimeException"),
            ("IllegalArgumentException", "kotlin.IllegalArgumentException"),
            ("IllegalStateException", "kotlin.IllegalStateException"),
            ("Throwable", "kotlin.Throwable"),
            ("Result", "kotlin.Result"),
            ("Sequence", "kotlin.sequences.Sequence"),
        ])
    })
}

fn static_methods() -> &'static HashMap<&'static str, &'static str> {
    STATIC_METHODS.get_or_init(|| {
        HashMap::from([
            ("Regex.fromLiteral", "kotlin.text.Regex.fromLiteral"),
            ("Result.success", "kotlin.Result.success"),
            ("Result.failure", "kotlin.Result.failure"),
        ])
    })
}

fn builtin_types() -> &'static HashSet<&'static str> {
    BUILTIN_TYPES.get_or_init(|| {
        HashSet::from([
            "Int", "Long", "Short", "Byte", "Float", "Double", "Boolean", "Char", "String",
            "Unit", "Any", "Nothing", "Array",
        ])
    })
}

/// Provider for Kotlin built-ins.
#[derive(Debug, Default)]
pub struct KotlinStdlib;

impl StdlibProvider for KotlinStdlib {
    fn lookup_function(&self, name: &str) -> Option<&'static str> {
        functions().get(name).copied()
    }

    fn lookup_class(&self, name: &str) -> Option<&'static str> {
        classes().get(name).copied()
    }

    fn lookup_static_method(&self, qualified: &str) -> Option<&'static str> {
        static_methods().get(qualified).copied()
    }

    fn is_builtin_type(&self, name: &str) -> bool {
        builtin_types().contains(name)
    }

    fn default_wildcard_imports(&self) -> &'static [&'static str] {
        &["kotlin", "kotlin.collections", "kotlin.io", "kotlin.text"]
    }

    fn synthetic_file(&self) -> &'static str {
        "<kotlin-stdlib>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn println_resolves_to_kotlin_io() {
        let stdlib = KotlinStdlib;
        assert_eq!(stdlib.lookup_function("println"), Some("kotlin.io.println"));
        assert_eq!(stdlib.lookup_function("nope"), None);
    }

    #[test]
    fn primitives_are_builtin_types() {
        let stdlib = KotlinStdlib;
        assert!(stdlib.is_builtin_type("Int"));
        assert!(stdlib.is_builtin_type("String"));
        assert!(!stdlib.is_builtin_type("User"));
    }

    #[test]
    fn known_symbols_cover_functions_and_classes() {
        let stdlib = KotlinStdlib;
        assert!(stdlib.is_known_symbol("listOf"));
        assert!(stdlib.is_known_symbol("Pair"));
        assert!(!stdlib.is_known_symbol("Frobnicator"));
    }
}
