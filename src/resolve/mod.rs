//! Stage C: the call resolver.
//!
//! Per-file function from the parsed model and the frozen symbol table
//! to a [`ResolvedFile`]. Files resolve independently on a rayon pool;
//! the table is shared read-only. An unresolvable call is a first-class
//! outcome: it is dropped from the output and counted, never an error.

pub mod context;
pub mod overloads;
pub mod stdlib;
pub mod strategies;
pub mod type_resolution;

pub use context::{FileContext, ResolutionContext};

use crate::parsing::{ParsedClass, ParsedFile, ParsedFunction};
use crate::symbols::{Symbol, SymbolTable, table::glob_match};
use crate::types::{SourceLocation, qualify};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One resolved call edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCall {
    /// FQN of the enclosing function or top-level declaration.
    pub from_fqn: String,
    /// FQN of the resolved target.
    pub to_fqn: String,
    pub location: SourceLocation,
    /// `file:line:column` of the original call site.
    pub call_site_fingerprint: String,
}

/// A parsed file augmented with its resolved calls, in call-site order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub file: ParsedFile,
    pub resolved_calls: Vec<ResolvedCall>,
}

impl ResolvedFile {
    /// Total number of call sites the parser captured for this file.
    pub fn total_calls(&self) -> usize {
        count_file_calls(&self.file)
    }

    /// The call sites that did not resolve: everything the parser
    /// captured minus the resolved fingerprints.
    pub fn unresolved_calls(&self) -> Vec<&crate::parsing::ParsedCall> {
        let resolved: std::collections::HashSet<&str> = self
            .resolved_calls
            .iter()
            .map(|c| c.call_site_fingerprint.as_str())
            .collect();
        let mut unresolved = Vec::new();
        collect_file_calls(&self.file, &mut unresolved);
        unresolved.retain(|call| !resolved.contains(call.location.fingerprint().as_str()));
        unresolved
    }
}

/// Aggregate resolution counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl ResolutionStats {
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total as f64
        }
    }
}

/// Resolve every file against the table. Parallel per file.
pub fn resolve_files(files: &[ParsedFile], table: &SymbolTable) -> Vec<ResolvedFile> {
    files
        .par_iter()
        .map(|file| resolve_file(file, table))
        .collect()
}

/// Resolve a single file.
pub fn resolve_file(file: &ParsedFile, table: &SymbolTable) -> ResolvedFile {
    let file_ctx = FileContext::new(file);
    let package = file.package_name.as_deref();
    let mut resolved = Vec::new();

    for function in &file.functions {
        let from = qualify(package, &function.name);
        resolve_function_calls(function, &file_ctx, from, None, table, &mut resolved);
    }
    for class in &file.classes {
        resolve_class_calls(class, package, &file_ctx, table, &mut resolved);
    }
    for object in &file.object_expressions {
        let anon = qualify(
            package,
            &format!("<anonymous>@{}", object.location.start_line),
        );
        for function in &object.functions {
            let from = format!("{anon}.{}", function.name);
            resolve_function_calls(
                function,
                &file_ctx,
                from,
                Some(anon.clone()),
                table,
                &mut resolved,
            );
        }
    }

    resolved.sort_by_key(|call| call.location.position_key());
    ResolvedFile {
        file: file.clone(),
        resolved_calls: resolved,
    }
}

fn resolve_class_calls(
    class: &ParsedClass,
    prefix: Option<&str>,
    file_ctx: &FileContext<'_>,
    table: &SymbolTable,
    out: &mut Vec<ResolvedCall>,
) {
    let class_fqn = qualify(prefix, &class.name);

    for function in &class.functions {
        let from = format!("{class_fqn}.{}", function.name);
        resolve_function_calls(
            function,
            file_ctx,
            from,
            Some(class_fqn.clone()),
            table,
            out,
        );
    }
    let constructors = class
        .primary_constructor
        .as_deref()
        .into_iter()
        .chain(class.secondary_constructors.iter());
    for ctor in constructors {
        let from = format!("{class_fqn}.<init>");
        resolve_function_calls(ctor, file_ctx, from, Some(class_fqn.clone()), table, out);
    }
    for nested in &class.nested_classes {
        resolve_class_calls(nested, Some(&class_fqn), file_ctx, table, out);
    }
    if let Some(companion) = &class.companion {
        resolve_class_calls(companion, Some(&class_fqn), file_ctx, table, out);
    }
}

fn resolve_function_calls(
    function: &ParsedFunction,
    file_ctx: &FileContext<'_>,
    from_fqn: String,
    current_class: Option<String>,
    table: &SymbolTable,
    out: &mut Vec<ResolvedCall>,
) {
    let ctx =
        ResolutionContext::for_function(file_ctx, function, from_fqn.clone(), current_class);
    for call in &function.calls {
        if let Some(to_fqn) = strategies::resolve_call(call, &ctx, table) {
            out.push(ResolvedCall {
                from_fqn: from_fqn.clone(),
                to_fqn,
                location: call.location.clone(),
                call_site_fingerprint: call.location.fingerprint(),
            });
        }
    }
}

/// Aggregate stats over resolved files.
pub fn stats(resolved: &[ResolvedFile]) -> ResolutionStats {
    let total: usize = resolved.iter().map(ResolvedFile::total_calls).sum();
    let resolved_count: usize = resolved.iter().map(|f| f.resolved_calls.len()).sum();
    ResolutionStats {
        total,
        resolved: resolved_count,
        unresolved: total.saturating_sub(resolved_count),
    }
}

/// Direct FQN lookup, for inspection tooling.
pub fn lookup<'a>(table: &'a SymbolTable, fqn: &str) -> Option<&'a Symbol> {
    table.get(fqn)
}

/// All symbols whose FQN matches a glob pattern (`*` and `?`).
pub fn find_symbols<'a>(table: &'a SymbolTable, pattern: &str) -> Vec<&'a Symbol> {
    table
        .iter()
        .filter(|(fqn, _)| glob_match(pattern, fqn))
        .map(|(_, symbol)| symbol)
        .collect()
}

fn collect_class_calls<'a>(class: &'a ParsedClass, out: &mut Vec<&'a crate::parsing::ParsedCall>) {
    for function in &class.functions {
        out.extend(function.calls.iter());
    }
    if let Some(ctor) = class.primary_constructor.as_deref() {
        out.extend(ctor.calls.iter());
    }
    for ctor in &class.secondary_constructors {
        out.extend(ctor.calls.iter());
    }
    for nested in &class.nested_classes {
        collect_class_calls(nested, out);
    }
    if let Some(companion) = class.companion.as_deref() {
        collect_class_calls(companion, out);
    }
}

fn collect_file_calls<'a>(file: &'a ParsedFile, out: &mut Vec<&'a crate::parsing::ParsedCall>) {
    for function in &file.functions {
        out.extend(function.calls.iter());
    }
    for class in &file.classes {
        collect_class_calls(class, out);
    }
    for object in &file.object_expressions {
        for function in &object.functions {
            out.extend(function.calls.iter());
        }
    }
}

fn count_function_calls(function: &ParsedFunction) -> usize {
    function.calls.len()
}

fn count_class_calls(class: &ParsedClass) -> usize {
    let mut count: usize = class.functions.iter().map(count_function_calls).sum();
    count += class
        .primary_constructor
        .as_deref()
        .map(count_function_calls)
        .unwrap_or(0);
    count += class
        .secondary_constructors
        .iter()
        .map(count_function_calls)
        .sum::<usize>();
    count += class.nested_classes.iter().map(count_class_calls).sum::<usize>();
    count += class
        .companion
        .as_deref()
        .map(count_class_calls)
        .unwrap_or(0);
    count
}

fn count_file_calls(file: &ParsedFile) -> usize {
    let mut count: usize = file.functions.iter().map(count_function_calls).sum();
    count += file.classes.iter().map(count_class_calls).sum::<usize>();
    count += file
        .object_expressions
        .iter()
        .map(|o| o.functions.iter().map(count_function_calls).sum::<usize>())
        .sum::<usize>();
    count
}
