//! Surface-type resolution.
//!
//! Turns a type as written in source (`Users`, `Map<String, User>`,
//! `StringUtils`) into an FQN, using the call strategies adapted for
//! types: explicit dotted path, named import, same package, wildcard
//! imports, stdlib. Outer generics and nullability are stripped for
//! lookup only; a single type-alias step is followed with cycle
//! detection.

use crate::parsing::ast::type_lookup_key;
use crate::resolve::context::FileContext;
use crate::resolve::stdlib::provider_for;
use crate::symbols::SymbolTable;
use crate::types::qualify;
use std::collections::HashSet;

/// Resolve a surface type to the FQN of an indexed type, or a stdlib
/// synthetic FQN. `None` when nothing matches; callers that need to
/// preserve shape (the hierarchy builder) fall back to the verbatim
/// surface string.
pub fn resolve_type(surface: &str, ctx: &FileContext, table: &SymbolTable) -> Option<String> {
    let mut seen = HashSet::new();
    resolve_type_inner(surface, ctx, table, &mut seen)
}

fn resolve_type_inner(
    surface: &str,
    ctx: &FileContext,
    table: &SymbolTable,
    seen: &mut HashSet<String>,
) -> Option<String> {
    let key = type_lookup_key(surface);
    if key.is_empty() || !seen.insert(key.to_string()) {
        // Alias cycle; stop where we are.
        return None;
    }

    let resolved = lookup_type_key(key, ctx, table)?;

    // Follow a type alias one step so member lookup lands on the real
    // type. Deeper chains stay where the single step leads.
    if let Some(alias) = table.get(&resolved).and_then(|s| s.as_type_alias()) {
        let target = alias.aliased_type.clone();
        if let Some(followed) = resolve_type_inner(&target, ctx, table, seen) {
            return Some(followed);
        }
    }
    Some(resolved)
}

fn lookup_type_key(key: &str, ctx: &FileContext, table: &SymbolTable) -> Option<String> {
    // Already a known dotted path.
    if key.contains('.') && table.contains(key) {
        return Some(key.to_string());
    }

    // Named import.
    if let Some(binding) = ctx.binding(key) {
        return Some(binding.target.clone());
    }

    // Same package (or file scope for package-less files).
    let local = qualify(ctx.package(), key);
    if table.contains(&local) {
        return Some(local);
    }

    // Wildcard imports, file order then language defaults.
    for package in &ctx.wildcard_packages {
        let candidate = format!("{package}.{key}");
        if table.contains(&candidate) {
            return Some(candidate);
        }
    }

    // Stdlib built-ins get their synthetic FQN.
    let stdlib = provider_for(ctx.language());
    if let Some(fqn) = stdlib.lookup_class(key) {
        return Some(fqn.to_string());
    }
    if stdlib.is_builtin_type(key) {
        return Some(key.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{Language, ParsedClass, ParsedFile, ParsedImport, ParsedTypeAlias};
    use crate::symbols::build_symbol_table;
    use crate::types::{ClassKind, SourceLocation, Visibility};

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("a.kt", line, 1, line, 30)
    }

    fn fixture() -> Vec<ParsedFile> {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.example".into());
        file.classes
            .push(ParsedClass::new("UserList", ClassKind::Class, loc(1)));
        file.type_aliases.push(ParsedTypeAlias {
            name: "Users".into(),
            aliased_type: "UserList".into(),
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            location: loc(2),
        });

        let mut other = ParsedFile::new("b.kt", Language::Kotlin);
        other.package_name = Some("com.lib".into());
        other
            .classes
            .push(ParsedClass::new("Helper", ClassKind::Class, loc(1)));
        vec![file, other]
    }

    #[test]
    fn same_package_type_resolves() {
        let files = fixture();
        let (table, _) = build_symbol_table(&files);
        let ctx = FileContext::new(&files[0]);
        assert_eq!(
            resolve_type("UserList", &ctx, &table).as_deref(),
            Some("com.example.UserList")
        );
    }

    #[test]
    fn generics_and_nullability_do_not_block_lookup() {
        let files = fixture();
        let (table, _) = build_symbol_table(&files);
        let ctx = FileContext::new(&files[0]);
        assert_eq!(
            resolve_type("UserList?", &ctx, &table).as_deref(),
            Some("com.example.UserList")
        );
    }

    #[test]
    fn alias_is_followed_one_step() {
        let files = fixture();
        let (table, _) = build_symbol_table(&files);
        let ctx = FileContext::new(&files[0]);
        assert_eq!(
            resolve_type("Users", &ctx, &table).as_deref(),
            Some("com.example.UserList")
        );
    }

    #[test]
    fn alias_cycle_stops() {
        let mut file = ParsedFile::new("c.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        file.type_aliases.push(ParsedTypeAlias {
            name: "A".into(),
            aliased_type: "B".into(),
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            location: loc(1),
        });
        file.type_aliases.push(ParsedTypeAlias {
            name: "B".into(),
            aliased_type: "A".into(),
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            location: loc(2),
        });
        let files = vec![file];
        let (table, _) = build_symbol_table(&files);
        let ctx = FileContext::new(&files[0]);
        // Resolution terminates and lands on one of the alias FQNs.
        let resolved = resolve_type("A", &ctx, &table).unwrap();
        assert!(resolved == "p.A" || resolved == "p.B");
    }

    #[test]
    fn import_binding_wins_over_stdlib() {
        let mut file = ParsedFile::new("d.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        let mut import = ParsedImport::new("com.lib.Helper");
        import.imported_name = Some("Helper".into());
        file.imports.push(import);

        let mut files = fixture();
        files.push(file);
        let (table, _) = build_symbol_table(&files);
        let ctx = FileContext::new(&files[2]);
        assert_eq!(
            resolve_type("Helper", &ctx, &table).as_deref(),
            Some("com.lib.Helper")
        );
    }

    #[test]
    fn stdlib_type_gets_synthetic_fqn() {
        let files = fixture();
        let (table, _) = build_symbol_table(&files);
        let ctx = FileContext::new(&files[0]);
        assert_eq!(
            resolve_type("String", &ctx, &table).as_deref(),
            Some("kotlin.String")
        );
    }
}
