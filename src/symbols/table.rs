//! The global symbol table and its builder.
//!
//! Five indices over every declaration in the project. Built once from
//! the full set of parsed files, then frozen; resolution reads it as a
//! shared value.
//!
//! Determinism: files are processed in path order and declarations in
//! source order, so the list-valued indices are reproducible. `by_fqn`
//! is last-writer-wins on duplicate FQNs while the lists keep every
//! insertion in order (overload stability).

use crate::error::{Diagnostic, DiagnosticKind};
use crate::parsing::{
    ParsedClass, ParsedFile, ParsedFunction, ParsedProperty, ParsedTypeAlias,
};
use crate::symbols::hierarchy::{self, DirectSupers};
use crate::symbols::{
    ClassSymbol, FunctionSymbol, ParamSig, PropertySymbol, Symbol, SymbolHeader, TypeAliasSymbol,
};
use crate::types::{ClassKind, qualify};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Read-only after build; see module docs.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    pub(crate) by_fqn: IndexMap<String, Symbol>,
    pub(crate) by_name: HashMap<String, Vec<Symbol>>,
    pub(crate) functions_by_name: HashMap<String, Vec<FunctionSymbol>>,
    pub(crate) by_package: HashMap<String, Vec<Symbol>>,
    pub(crate) type_hierarchy: HashMap<String, Vec<String>>,
    pub(crate) direct_supers: HashMap<String, DirectSupers>,
}

impl SymbolTable {
    pub fn get(&self, fqn: &str) -> Option<&Symbol> {
        self.by_fqn.get(fqn)
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.by_fqn.contains_key(fqn)
    }

    pub fn symbols_named(&self, name: &str) -> &[Symbol] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn functions_named(&self, name: &str) -> &[FunctionSymbol] {
        self.functions_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn package_symbols(&self, package: &str) -> &[Symbol] {
        self.by_package
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Transitive ancestors of a type FQN, nearest-first.
    pub fn ancestors(&self, fqn: &str) -> &[String] {
        self.type_hierarchy
            .get(fqn)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolved direct super class / interfaces of a type FQN.
    pub fn direct_supers(&self, fqn: &str) -> Option<&DirectSupers> {
        self.direct_supers.get(fqn)
    }

    pub fn len(&self) -> usize {
        self.by_fqn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fqn.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.by_fqn.iter()
    }

    pub fn hierarchy(&self) -> &HashMap<String, Vec<String>> {
        &self.type_hierarchy
    }

    fn insert(&mut self, symbol: Symbol, diagnostics: &mut Vec<Diagnostic>) {
        let fqn = symbol.fqn().to_string();
        let name = symbol.name().to_string();

        if let Some(existing) = self.by_fqn.get(&fqn) {
            // Same-FQN functions are expected: overloads and secondary
            // constructors. Anything else is a real collision.
            let both_functions =
                existing.as_function().is_some() && symbol.as_function().is_some();
            if !both_functions {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateFqn,
                    symbol.header().file.clone(),
                    format!("duplicate FQN '{fqn}'; later declaration wins lookup"),
                ));
            }
        }

        if let Symbol::Function(f) = &symbol {
            self.functions_by_name
                .entry(name.clone())
                .or_default()
                .push(f.clone());
        }
        self.by_name.entry(name).or_default().push(symbol.clone());
        if let Some(package) = symbol.package() {
            self.by_package
                .entry(package.to_string())
                .or_default()
                .push(symbol.clone());
        }
        self.by_fqn.insert(fqn, symbol);
    }
}

/// Build the table from every parsed file. Order-independent for
/// `by_fqn`; list indices are ordered by (file path, source position).
pub fn build_symbol_table(files: &[ParsedFile]) -> (SymbolTable, Vec<Diagnostic>) {
    let mut table = SymbolTable::default();
    let mut diagnostics = Vec::new();

    let mut ordered: Vec<&ParsedFile> = files.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    for file in &ordered {
        index_file(file, &mut table, &mut diagnostics);
    }

    hierarchy::build(&mut table, &ordered, &mut diagnostics);
    (table, diagnostics)
}

fn index_file(file: &ParsedFile, table: &mut SymbolTable, diagnostics: &mut Vec<Diagnostic>) {
    let package = file.package_name.as_deref();

    for function in &file.functions {
        index_function(function, package, None, file, table, diagnostics);
    }
    for property in &file.properties {
        index_property(property, package, None, file, table, diagnostics);
    }
    for class in &file.classes {
        index_class(class, package, package, file, table, diagnostics);
    }
    for alias in &file.type_aliases {
        index_type_alias(alias, package, file, table, diagnostics);
    }
    for destructuring in &file.destructurings {
        for (position, component) in destructuring.components.iter().enumerate() {
            if component == "_" {
                continue;
            }
            let type_name = destructuring
                .component_types
                .as_ref()
                .and_then(|types| types.get(position))
                .filter(|t| !t.is_empty())
                .cloned();
            let mut header = SymbolHeader::new(
                component.clone(),
                qualify(package, component),
                file.path.clone(),
            );
            header.location = Some(destructuring.location.clone());
            header.package = package.map(str::to_string);
            table.insert(
                Symbol::Property(PropertySymbol {
                    header,
                    type_name,
                    is_immutable: destructuring.is_immutable,
                }),
                diagnostics,
            );
        }
    }
    for object in &file.object_expressions {
        let name = format!("<anonymous>@{}", object.location.start_line);
        let fqn = qualify(package, &name);
        let mut header = SymbolHeader::new(name, fqn.clone(), file.path.clone());
        header.location = Some(object.location.clone());
        header.package = package.map(str::to_string);
        table.insert(
            Symbol::Class(ClassSymbol {
                header,
                kind: ClassKind::Object,
                super_class: object.super_types.first().cloned(),
                interfaces: object.super_types.iter().skip(1).cloned().collect(),
                is_data: false,
                is_sealed: false,
                is_abstract: false,
            }),
            diagnostics,
        );
        for function in &object.functions {
            index_function(function, package, Some(&fqn), file, table, diagnostics);
        }
        for property in &object.properties {
            index_property(property, package, Some(&fqn), file, table, diagnostics);
        }
    }
}

fn index_class(
    class: &ParsedClass,
    package: Option<&str>,
    prefix: Option<&str>,
    file: &ParsedFile,
    table: &mut SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let fqn = qualify(prefix, &class.name);

    let mut header = SymbolHeader::new(class.name.clone(), fqn.clone(), file.path.clone());
    header.location = Some(class.location.clone());
    header.package = package.map(str::to_string);
    header.parent_fqn = prefix
        .filter(|p| Some(*p) != package)
        .map(str::to_string);
    table.insert(
        Symbol::Class(ClassSymbol {
            header,
            kind: class.kind,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            is_data: class.modifiers.is_data,
            is_sealed: class.modifiers.is_sealed,
            is_abstract: class.modifiers.is_abstract,
        }),
        diagnostics,
    );

    for property in &class.properties {
        index_property(property, package, Some(&fqn), file, table, diagnostics);
    }
    for function in &class.functions {
        index_function(function, package, Some(&fqn), file, table, diagnostics);
    }
    for nested in &class.nested_classes {
        index_class(nested, package, Some(&fqn), file, table, diagnostics);
    }
    if let Some(companion) = &class.companion {
        index_class(companion, package, Some(&fqn), file, table, diagnostics);
    }

    // Constructors all index as `C.<init>`; a concrete class with no
    // declared constructor still gets the implicit zero-argument one.
    if let Some(primary) = &class.primary_constructor {
        index_function(primary, package, Some(&fqn), file, table, diagnostics);
    }
    for ctor in &class.secondary_constructors {
        index_function(ctor, package, Some(&fqn), file, table, diagnostics);
    }
    if class.primary_constructor.is_none()
        && class.secondary_constructors.is_empty()
        && class.kind == ClassKind::Class
    {
        let mut implicit = ParsedFunction::new("<init>", class.location.clone());
        implicit.visibility = class.visibility;
        index_function(&implicit, package, Some(&fqn), file, table, diagnostics);
    }
}

fn index_function(
    function: &ParsedFunction,
    package: Option<&str>,
    declaring_type: Option<&str>,
    file: &ParsedFile,
    table: &mut SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Overload signatures first so the implementation wins `by_fqn`.
    for overload in &function.overloads {
        index_function(overload, package, declaring_type, file, table, diagnostics);
    }

    let prefix = declaring_type.or(package);
    let fqn = qualify(prefix, &function.name);
    let mut header = SymbolHeader::new(function.name.clone(), fqn, file.path.clone());
    header.location = Some(function.location.clone());
    header.package = package.map(str::to_string);
    header.parent_fqn = declaring_type.map(str::to_string);

    table.insert(
        Symbol::Function(FunctionSymbol {
            header,
            parameters: function
                .parameters
                .iter()
                .map(|p| ParamSig {
                    name: p.name.clone(),
                    type_name: p.type_name.clone(),
                    has_default: p.default_value.is_some(),
                    is_variadic: p.is_variadic,
                })
                .collect(),
            return_type: function.return_type.clone(),
            declaring_type: declaring_type.map(str::to_string),
            is_extension: function.modifiers.is_extension,
            receiver_type: function.receiver_type.clone(),
        }),
        diagnostics,
    );
}

fn index_property(
    property: &ParsedProperty,
    package: Option<&str>,
    declaring_type: Option<&str>,
    file: &ParsedFile,
    table: &mut SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let prefix = declaring_type.or(package);
    let mut header = SymbolHeader::new(
        property.name.clone(),
        qualify(prefix, &property.name),
        file.path.clone(),
    );
    header.location = Some(property.location.clone());
    header.package = package.map(str::to_string);
    header.parent_fqn = declaring_type.map(str::to_string);

    // A property with no declared type but a constructor-call
    // initializer still has a usable receiver type.
    let type_name = property.type_name.clone().or_else(|| {
        property
            .initializer
            .as_deref()
            .and_then(crate::parsing::ast::constructor_type_from_initializer)
    });

    table.insert(
        Symbol::Property(PropertySymbol {
            header,
            type_name,
            is_immutable: property.is_immutable,
        }),
        diagnostics,
    );
}

fn index_type_alias(
    alias: &ParsedTypeAlias,
    package: Option<&str>,
    file: &ParsedFile,
    table: &mut SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut header = SymbolHeader::new(
        alias.name.clone(),
        qualify(package, &alias.name),
        file.path.clone(),
    );
    header.location = Some(alias.location.clone());
    header.package = package.map(str::to_string);
    table.insert(
        Symbol::TypeAlias(TypeAliasSymbol {
            header,
            aliased_type: alias.aliased_type.clone(),
        }),
        diagnostics,
    );
}

/// Match an FQN against a glob pattern supporting `*` and `?`.
pub fn glob_match(pattern: &str, candidate: &str) -> bool {
    fn inner(p: &[u8], c: &[u8]) -> bool {
        match (p.first(), c.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                inner(&p[1..], c) || (!c.is_empty() && inner(p, &c[1..]))
            }
            (Some(b'?'), Some(_)) => inner(&p[1..], &c[1..]),
            (Some(a), Some(b)) if a == b => inner(&p[1..], &c[1..]),
            _ => false,
        }
    }
    inner(pattern.as_bytes(), candidate.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{Language, ParsedDestructuring, ParsedParameter};
    use crate::types::SourceLocation;

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("test.kt", line, 1, line, 40)
    }

    fn class_file() -> ParsedFile {
        let mut file = ParsedFile::new("test.kt", Language::Kotlin);
        file.package_name = Some("com.example".into());

        let mut class = ParsedClass::new("User", ClassKind::Class, loc(2));
        let mut ctor = ParsedFunction::new("<init>", loc(2));
        ctor.parameters.push(ParsedParameter::new("name"));
        class.primary_constructor = Some(Box::new(ctor));

        let mut method = ParsedFunction::new("rename", loc(3));
        method.parameters.push(ParsedParameter::new("to"));
        class.functions.push(method);

        let mut property = ParsedProperty::new("name", loc(2));
        property.type_name = Some("String".into());
        class.properties.push(property);

        file.classes.push(class);
        file
    }

    #[test]
    fn indexes_class_members_under_class_fqn() {
        let (table, diagnostics) = build_symbol_table(&[class_file()]);
        assert!(diagnostics.is_empty());
        assert!(table.contains("com.example.User"));
        assert!(table.contains("com.example.User.rename"));
        assert!(table.contains("com.example.User.name"));
        assert!(table.contains("com.example.User.<init>"));

        let method = table.get("com.example.User.rename").unwrap();
        assert_eq!(
            method.header().parent_fqn.as_deref(),
            Some("com.example.User")
        );
    }

    #[test]
    fn every_fqn_symbol_is_also_in_by_name() {
        let (table, _) = build_symbol_table(&[class_file()]);
        for (_, symbol) in table.iter() {
            assert!(
                table
                    .symbols_named(symbol.name())
                    .iter()
                    .any(|s| s.fqn() == symbol.fqn()),
                "{} missing from by_name",
                symbol.fqn()
            );
        }
    }

    #[test]
    fn package_index_holds_package_members() {
        let (table, _) = build_symbol_table(&[class_file()]);
        let names: Vec<_> = table
            .package_symbols("com.example")
            .iter()
            .map(|s| s.fqn())
            .collect();
        assert!(names.contains(&"com.example.User"));
    }

    #[test]
    fn secondary_constructors_share_the_init_fqn() {
        let mut file = ParsedFile::new("test.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        let mut class = ParsedClass::new("W", ClassKind::Class, loc(1));
        let mut one = ParsedFunction::new("<init>", loc(2));
        one.parameters.push(ParsedParameter::new("a"));
        let mut two = ParsedFunction::new("<init>", loc(3));
        two.parameters.push(ParsedParameter::new("a"));
        two.parameters.push(ParsedParameter::new("b"));
        class.secondary_constructors.push(one);
        class.secondary_constructors.push(two);
        file.classes.push(class);

        let (table, _) = build_symbol_table(&[file]);
        let ctors: Vec<_> = table
            .functions_named("<init>")
            .iter()
            .filter(|f| f.declaring_type.as_deref() == Some("p.W"))
            .collect();
        assert_eq!(ctors.len(), 2);
        assert_eq!(ctors[0].parameters.len(), 1);
        assert_eq!(ctors[1].parameters.len(), 2);
    }

    #[test]
    fn companion_members_are_grandchildren() {
        let mut file = ParsedFile::new("test.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        let mut class = ParsedClass::new("C", ClassKind::Class, loc(1));
        let mut companion = ParsedClass::new("Companion", ClassKind::Object, loc(2));
        companion.functions.push(ParsedFunction::new("make", loc(3)));
        class.companion = Some(Box::new(companion));
        file.classes.push(class);

        let (table, _) = build_symbol_table(&[file]);
        assert!(table.contains("p.C.Companion"));
        assert!(table.contains("p.C.Companion.make"));
    }

    #[test]
    fn destructuring_components_become_properties() {
        let mut file = ParsedFile::new("test.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        file.destructurings.push(ParsedDestructuring {
            components: vec!["host".into(), "_".into(), "port".into()],
            component_types: None,
            is_immutable: true,
            location: loc(4),
        });

        let (table, _) = build_symbol_table(&[file]);
        assert!(table.contains("p.host"));
        assert!(table.contains("p.port"));
        assert!(!table.contains("p._"));
    }

    #[test]
    fn duplicate_fqn_last_writer_wins_but_lists_keep_both() {
        let mut file_a = ParsedFile::new("a.kt", Language::Kotlin);
        file_a.package_name = Some("p".into());
        let mut prop = ParsedProperty::new("x", loc(1));
        prop.type_name = Some("Int".into());
        file_a.properties.push(prop);

        let mut file_b = ParsedFile::new("b.kt", Language::Kotlin);
        file_b.package_name = Some("p".into());
        let mut prop = ParsedProperty::new("x", loc(1));
        prop.type_name = Some("String".into());
        file_b.properties.push(prop);

        let (table, diagnostics) = build_symbol_table(&[file_b.clone(), file_a.clone()]);
        // b.kt sorts after a.kt, so its declaration wins by_fqn.
        let winner = table.get("p.x").unwrap().as_property().unwrap();
        assert_eq!(winner.type_name.as_deref(), Some("String"));
        assert_eq!(table.symbols_named("x").len(), 2);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::DuplicateFqn)
        );

        // Input order does not change the winner.
        let (table2, _) = build_symbol_table(&[file_a, file_b]);
        let winner2 = table2.get("p.x").unwrap().as_property().unwrap();
        assert_eq!(winner2.type_name.as_deref(), Some("String"));
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("com.example.*", "com.example.User"));
        assert!(glob_match("*.User", "com.example.User"));
        assert!(glob_match("com.?xample.User", "com.example.User"));
        assert!(!glob_match("com.example", "com.example.User"));
    }
}
