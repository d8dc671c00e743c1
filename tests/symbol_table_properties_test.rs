//! Quantified invariants over the symbol table and the resolved output.

use codegraph::pipeline::run_on_sources;
use codegraph::resolve::stdlib::provider_for;
use codegraph::{Language, Symbol};
use std::collections::HashSet;

fn fixture_sources() -> Vec<(&'static str, Language, &'static str)> {
    vec![
        (
            "model.kt",
            Language::Kotlin,
            "package com.example\n\
             open class Entity {\n\
                 fun touch() {}\n\
             }\n\
             class Account(val id: String) : Entity() {\n\
                 fun rename(to: String) { touch() }\n\
                 companion object {\n\
                     fun blank(): Account = Account(\"\")\n\
                 }\n\
             }\n\
             typealias Accounts = Account\n\
             fun top() {\n\
                 val (first, _, third) = triple()\n\
                 println(first)\n\
             }\n\
             fun triple(): Triple<Int, Int, Int> = Triple(1, 2, 3)\n",
        ),
        (
            "svc.kt",
            Language::Kotlin,
            "package com.example\n\
             class Service {\n\
                 val account: Account = Account(\"a\")\n\
                 fun go() {\n\
                     account.rename(\"b\")\n\
                     account.touch()\n\
                     missing()\n\
                 }\n\
             }\n",
        ),
    ]
}

#[test]
fn fqn_uniqueness_in_by_fqn() {
    let output = run_on_sources(&fixture_sources());
    let mut seen = HashSet::new();
    for (fqn, _) in output.table.iter() {
        assert!(seen.insert(fqn.clone()), "duplicate by_fqn key {fqn}");
    }
}

#[test]
fn index_consistency_name_and_package() {
    let output = run_on_sources(&fixture_sources());
    for (_, symbol) in output.table.iter() {
        let by_name = output.table.symbols_named(symbol.name());
        assert!(
            by_name.iter().any(|s| s.fqn() == symbol.fqn()),
            "{} missing from by_name[{}]",
            symbol.fqn(),
            symbol.name()
        );
        if let Some(package) = symbol.package() {
            let by_package = output.table.package_symbols(package);
            assert!(
                by_package.iter().any(|s| s.fqn() == symbol.fqn()),
                "{} missing from by_package[{package}]",
                symbol.fqn()
            );
        }
    }
}

#[test]
fn resolved_calls_preserve_source_order() {
    let output = run_on_sources(&fixture_sources());
    for file in &output.resolved {
        let positions: Vec<_> = file
            .resolved_calls
            .iter()
            .map(|c| c.location.position_key())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted, "out of order in {}", file.file.path);
    }
}

#[test]
fn pipeline_is_deterministic() {
    let first = run_on_sources(&fixture_sources());
    let second = run_on_sources(&fixture_sources());

    let first_calls: Vec<_> = first
        .resolved
        .iter()
        .flat_map(|f| f.resolved_calls.iter())
        .collect();
    let second_calls: Vec<_> = second
        .resolved
        .iter()
        .flat_map(|f| f.resolved_calls.iter())
        .collect();
    assert_eq!(first_calls, second_calls);
    assert_eq!(first.table.hierarchy(), second.table.hierarchy());
}

#[test]
fn no_spurious_edges() {
    let output = run_on_sources(&fixture_sources());
    for file in &output.resolved {
        let stdlib = provider_for(file.file.language);
        for call in &file.resolved_calls {
            let target = call.to_fqn.as_str();
            let in_table = output.table.contains(target);
            // Stdlib targets are synthetic; strip a constructor suffix
            // and check the name is known to the provider.
            let bare = target.strip_suffix(".<init>").unwrap_or(target);
            let simple = bare.rsplit('.').next().unwrap_or(bare);
            let in_stdlib = stdlib.is_known_symbol(simple)
                || stdlib.lookup_static_method(bare).is_some()
                || bare == target && stdlib.lookup_function(simple).is_some();
            assert!(
                in_table || in_stdlib || bare.starts_with("kotlin."),
                "spurious edge target {target}"
            );
        }
    }
}

#[test]
fn hierarchy_is_acyclic() {
    let output = run_on_sources(&fixture_sources());
    for (fqn, ancestors) in output.table.hierarchy() {
        assert!(
            !ancestors.contains(fqn),
            "{fqn} appears among its own ancestors"
        );
    }
}

#[test]
fn destructuring_components_round_trip() {
    let output = run_on_sources(&fixture_sources());
    // Non-underscore components became property symbols with the
    // component name; the underscore produced nothing.
    let first = output.table.get("com.example.first").unwrap();
    assert!(matches!(first, Symbol::Property(_)));
    assert_eq!(first.name(), "first");
    let third = output.table.get("com.example.third").unwrap();
    assert_eq!(third.name(), "third");
    assert!(output.table.get("com.example._").is_none());
}

#[test]
fn anonymous_objects_get_line_scoped_fqns() {
    let output = run_on_sources(&[(
        "anon.kt",
        Language::Kotlin,
        "package p\n\
         interface Listener {\n\
             fun on()\n\
         }\n\
         fun install() {\n\
             val l = object : Listener {\n\
                 override fun on() {}\n\
             }\n\
         }\n",
    )]);

    let anonymous: Vec<&Symbol> = output
        .table
        .iter()
        .filter(|(fqn, _)| fqn.contains("<anonymous>@"))
        .map(|(_, s)| s)
        .collect();
    assert!(!anonymous.is_empty(), "no anonymous object symbol indexed");
    assert!(anonymous.iter().any(|s| s.fqn().starts_with("p.<anonymous>@")));
}
