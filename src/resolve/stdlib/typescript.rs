//! TypeScript standard-library tables.
//!
//! Covers the ECMAScript globals plus the Node built-ins the indexer
//! most often sees. Synthetic FQNs keep the surface form (`console.log`,
//! `Buffer.from`).

use super::StdlibProvider;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static FUNCTIONS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static CLASSES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static STATIC_METHODS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
static BUILTIN_TYPES: OnceLock<HashSet<&'static str>> = OnceLock::new();

pub(super) fn functions() -> &'static HashMap<&'static str, &'static str> {
    FUNCTIONS.get_or_init(|| {
        HashMap::from([
            ("parseInt", "parseInt"),
            ("parseFloat", "parseFloat"),
            ("isNaN", "isNaN"),
            ("isFinite", "isFinite"),
            ("encodeURIComponent", "encodeURIComponent"),
            ("decodeURIComponent", "decodeURIComponent"),
            ("setTimeout", "setTimeout"),
            ("setInterval", "setInterval"),
            ("clearTimeout", "clearTimeout"),
            ("clearInterval", "clearInterval"),
            ("queueMicrotask", "queueMicrotask"),
            ("structuredClone", "structuredClone"),
            ("fetch", "fetch"),
            ("require", "require"),
        ])
    })
}

pub(super) fn classes() -> &'static HashMap<&'static str, &'static str> {
    CLASSES.get_or_init(|| {
        HashMap::from([
            ("Array", "Array"),
            ("Object", "Object"),
            ("String", "String"),
            ("Number", "Number"),
            ("Boolean", "Boolean"),
            ("Map", "Map"),
            ("Set", "Set"),
            ("WeakMap", "WeakMap"),
            ("WeakSet", "WeakSet"),
            ("Promise", "Promise"),
            ("Date", "Date"),
            ("RegExp", "RegExp"),
            ("Error", "Error"),
            ("TypeError", "TypeError"),
            ("RangeError", "RangeError"),
            ("SyntaxError", "SyntaxError"),
            ("URL", "URL"),
            ("URLSearchParams", "URLSearchParams"),
            ("Buffer", "Buffer"),
            ("Symbol", "Symbol"),
            ("Proxy", "Proxy"),
            ("AbortController", "AbortController"),
            ("TextEncoder", "TextEncoder"),
            ("TextDecoder", "TextDecoder"),
        ])
    })
}

pub(super) fn static_methods() -> &'static HashMap<&'static str, &'static str> {
    STATIC_METHODS.get_or_init(|| {
        HashMap::from([
            ("console.log", "console.log"),
            ("console.warn", "console.warn"),
            ("console.error", "console.error"),
            ("console.info", "console.info"),
            ("console.debug", "console.debug"),
            ("console.trace", "console.trace"),
            ("JSON.parse", "JSON.parse"),
            ("JSON.stringify", "JSON.stringify"),
            ("Math.max", "Math.max"),
            ("Math.min", "Math.min"),
            ("Math.abs", "Math.abs"),
            ("Math.floor", "Math.floor"),
            ("Math.ceil", "Math.ceil"),
            ("Math.round", "Math.round"),
            ("Math.random", "Math.random"),
            ("Object.keys", "Object.keys"),
            ("Object.values", "Object.values"),
            ("Object.entries", "Object.entries"),
            ("Object.assign", "Object.assign"),
            ("Object.freeze", "Object.freeze"),
            ("Object.fromEntries", "Object.fromEntries"),
            ("Array.from", "Array.from"),
            ("Array.of", "Array.of"),
            ("Array.isArray", "Array.isArray"),
            ("Promise.all", "Promise.all"),
            ("Promise.allSettled", "Promise.allSettled"),
            ("Promise.race", "Promise.race"),
            ("Promise.resolve", "Promise.resolve"),
            ("Promise.reject", "Promise.reject"),
            ("Number.parseInt", "Number.parseInt"),
            ("Number.parseFloat", "Number.parseFloat"),
            ("Number.isInteger", "Number.isInteger"),
            ("Date.now", "Date.now"),
            ("Date.parse", "Date.parse"),
            ("Buffer.from", "Buffer.from"),
            ("Buffer.alloc", "Buffer.alloc"),
            ("Buffer.concat", "Buffer.concat"),
        ])
    })
}

fn builtin_types() -> &'static HashSet<&'static str> {
    BUILTIN_TYPES.get_or_init(|| {
        HashSet::from([
            "string", "number", "boolean", "object", "any", "unknown", "never", "void", "null",
            "undefined", "bigint", "symbol",
        ])
    })
}

/// Provider for TypeScript built-ins.
#[derive(Debug, Default)]
pub struct TypeScriptStdlib;

impl StdlibProvider for TypeScriptStdlib {
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
        &[]
    }

    fn synthetic_file(&self) -> &'static str {
        "<typescript-stdlib>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_log_keeps_surface_fqn() {
        assert_eq!(
            TypeScriptStdlib.lookup_static_method("console.log"),
            Some("console.log")
        );
        assert_eq!(
            TypeScriptStdlib.lookup_static_method("Buffer.from"),
            Some("Buffer.from")
        );
    }

    #[test]
    fn lowercase_primitives_are_builtin() {
        assert!(TypeScriptStdlib.is_builtin_type("string"));
        assert!(TypeScriptStdlib.is_builtin_type("unknown"));
        assert!(!TypeScriptStdlib.is_builtin_type("User"));
    }
}
