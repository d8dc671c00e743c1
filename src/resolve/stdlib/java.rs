//! Java standard-library tables.
//!
//! Java has no free functions; only classes and static members.

use super::StdlibProvider;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static CLASSES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static STATIC_METHODS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static BUILTIN_TYPES: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn classes() -> &'static HashMap<&'static str, &'static str> {
    CLASSES.get_or_init(|| {
        HashMap::from([
            ("String", "java.lang.String"),
            ("Object", "java.lang.Object"),
            ("Integer", "java.lang.Integer"),
            ("Long", "java.lang.Long"),
            ("Short", "java.lang.Short"),
            ("Byte", "java.lang.Byte"),
            ("Float", "java.lang.Float"),
            ("Double", "java.lang.Double"),
            ("Boolean", "java.lang.Boolean"),
            ("Character", "java.lang.Character"),
            ("Math", "java.lang.Math"),
            ("System", "java.lang.System"),
            ("Thread", "java.lang.Thread"),
            ("StringBuilder", "java.lang.StringBuilder"),
            ("Exception", "java.lang.Exception"),
            ("RuntimeException", "java.lang.RuntimeException"),
            ("IllegalArgumentException", "java.lang.IllegalArgumentException"),
            ("IllegalStateException", "java.lang.IllegalStateException"),
            ("Throwable", "java.lang.Throwable"),
            ("Iterable", "java.lang.Iterable"),
            ("Runnable", "java.lang.Runnable"),
            ("ArrayList", "java.util.ArrayList"),
            ("LinkedList", "java.util.LinkedList"),
            ("HashMap", "java.util.HashMap"),
            ("HashSet", "java.util.HashSet"),
            ("List", "java.util.List"),
            ("Map", "java.util.Map"),
            ("Set", "java.util.Set"),
            ("Optional", "java.util.Optional"),
            ("Objects", "java.util.Objects"),
            ("Arrays", "java.util.Arrays"),
            ("Collections", "java.util.Collections"),
            ("Stream", "java.util.stream.Stream"),
        ])
    })
}

fn static_methods() -> &'static HashMap<&'static str, &'static str> {
    STATIC_METHODS.get_or_init(|| {
        HashMap::from([
            ("System.out.println", "java.lang.System.out.println"),
            ("System.out.print", "java.lang.System.out.print"),
            ("System.err.println", "java.lang.System.err.println"),
            ("System.currentTimeMillis", "java.lang.System.currentTimeMillis"),
            ("System.getenv", "java.lang.System.getenv"),
            ("String.valueOf", "java.lang.String.valueOf"),
            ("String.format", "java.lang.String.format"),
            ("String.join", "java.lang.String.join"),
            ("Math.max", "java.lang.Math.max"),
            ("Math.min", "java.lang.Math.min"),
            ("Math.abs", "java.lang.Math.abs"),
            ("Math.round", "java.lang.Math.round"),
            ("Integer.parseInt", "java.lang.Integer.parseInt"),
            ("Integer.valueOf", "java.lang.Integer.valueOf"),
            ("Long.parseLong", "java.lang.Long.parseLong"),
            ("Double.parseDouble", "java.lang.Double.parseDouble"),
            ("Thread.sleep", "java.lang.Thread.sleep"),
            ("Objects.requireNonNull", "java.util.Objects.requireNonNull"),
            ("Objects.equals", "java.util.Objects.equals"),
            ("Objects.hash", "java.util.Objects.hash"),
            ("List.of", "java.util.List.of"),
            ("Map.of", "java.util.Map.of"),
            ("Set.of", "java.util.Set.of"),
            ("Arrays.asList", "java.util.Arrays.asList"),
            ("Arrays.stream", "java.util.Arrays.stream"),
            ("Collections.emptyList", "java.util.Collections.emptyList"),
            ("Collections.unmodifiableList", "java.util.Collections.unmodifiableList"),
            ("Optional.of", "java.util.Optional.of"),
            ("Optional.ofNullable", "java.util.Optional.ofNullable"),
            ("Optional.empty", "java.util.Optional.empty"),
            ("Stream.of", "java.util.stream.Stream.of"),
        ])
    })
}

fn builtin_types() -> &'static HashSet<&'static str> {
    BUILTIN_TYPES.get_or_init(|| {
        HashSet::from([
            "int", "long", "short", "byte", "float", "double", "boolean", "char", "void",
            "String", "Object", "Integer", "Long", "Double", "Boolean", "Character",
        ])
    })
}

/// Provider for Java built-ins.
#[derive(Debug, Default)]
pub struct JavaStdlib;

impl StdlibProvider for JavaStdlib {
    fn lookup_function(&self, _name: &str) -> Option<&'static str> {
        None
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
        &["java.lang"]
    }

    fn synthetic_file(&self) -> &'static str {
        "<java-stdlib>"
    }
}
